//! Quorum ledger
//!
//! Tracks, per id, which channels delivered a transfer or message and moves
//! the record through its lifecycle:
//!
//! ```text
//! Unseen -> Pending -> Executable -> Executed
//!                 \          \
//!                  `----------`--> Cancelled (messages, vetoer only)
//! ```
//!
//! The first delivery fixes `threshold` and `origin_chain_id`. A channel counts
//! at most once per id; a repeated delivery is rejected instead of ignored.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Storage};

use crate::error::ContractError;
use crate::state::{
    ReceivedMessage, ReceivedTransfer, DELIVERIES, RECEIVED_MESSAGES, RECEIVED_TRANSFERS,
};

/// Lifecycle state reported by queries
#[cw_serde]
pub enum DeliveryState {
    Unseen,
    Pending,
    Executable,
    Executed,
    Cancelled,
    Expired,
}

/// Result of recording one delivery
#[derive(Debug, PartialEq)]
pub struct Delivery<T> {
    pub record: T,
    /// True only on the delivery that took the record to its threshold
    pub quorum_reached: bool,
}

// ============================================================================
// Deliveries
// ============================================================================

/// Record a transfer delivery from `channel`.
///
/// `first_copy` is only used when the id is unseen.
pub fn deliver_transfer(
    storage: &mut dyn Storage,
    id: &[u8; 32],
    channel: &Addr,
    first_copy: ReceivedTransfer,
) -> Result<Delivery<ReceivedTransfer>, ContractError> {
    ensure_new_channel(storage, id, channel)?;

    let mut record = match RECEIVED_TRANSFERS.may_load(storage, id)? {
        Some(existing) if existing.executed => {
            return Err(ContractError::TransferAlreadyExecuted)
        }
        Some(existing) => existing,
        None => ReceivedTransfer {
            received_so_far: 0,
            executed: false,
            ..first_copy
        },
    };

    let was_reached = record.received_so_far >= record.threshold;
    record.received_so_far += 1;

    DELIVERIES.save(storage, (id.as_slice(), channel), &true)?;
    RECEIVED_TRANSFERS.save(storage, id, &record)?;

    Ok(Delivery {
        quorum_reached: !was_reached && record.received_so_far >= record.threshold,
        record,
    })
}

/// Record a message delivery from `channel`.
///
/// On the delivery that reaches quorum, `executable_at` is stamped as
/// `now + timelock`; later deliveries leave it untouched.
pub fn deliver_message(
    storage: &mut dyn Storage,
    id: &[u8; 32],
    channel: &Addr,
    now: u64,
    timelock: u64,
    first_copy: ReceivedMessage,
) -> Result<Delivery<ReceivedMessage>, ContractError> {
    ensure_new_channel(storage, id, channel)?;

    let mut record = match RECEIVED_MESSAGES.may_load(storage, id)? {
        Some(existing) if existing.executed => {
            return Err(ContractError::MessageAlreadyExecuted)
        }
        Some(existing) if existing.cancelled => return Err(ContractError::MessageCancelled),
        Some(existing) => existing,
        None => ReceivedMessage {
            received_so_far: 0,
            executable_at: None,
            executed: false,
            cancelled: false,
            ..first_copy
        },
    };

    let was_reached = record.received_so_far >= record.threshold;
    record.received_so_far += 1;

    let quorum_reached = !was_reached && record.received_so_far >= record.threshold;
    if quorum_reached && record.executable_at.is_none() {
        record.executable_at = Some(now.saturating_add(timelock));
    }

    DELIVERIES.save(storage, (id.as_slice(), channel), &true)?;
    RECEIVED_MESSAGES.save(storage, id, &record)?;

    Ok(Delivery {
        record,
        quorum_reached,
    })
}

fn ensure_new_channel(
    storage: &dyn Storage,
    id: &[u8; 32],
    channel: &Addr,
) -> Result<(), ContractError> {
    if DELIVERIES.has(storage, (id.as_slice(), channel)) {
        return Err(ContractError::DuplicateDelivery {
            channel: channel.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Terminal Transitions
// ============================================================================

/// Move a transfer to Executed. The record is saved before the caller emits
/// any payout message.
pub fn mark_transfer_executed(
    storage: &mut dyn Storage,
    id: &[u8; 32],
) -> Result<ReceivedTransfer, ContractError> {
    let mut record = RECEIVED_TRANSFERS
        .may_load(storage, id)?
        .ok_or(ContractError::TransferNotFound)?;

    if record.executed {
        return Err(ContractError::TransferAlreadyExecuted);
    }
    if record.received_so_far < record.threshold {
        return Err(ContractError::QuorumNotReached {
            received: record.received_so_far,
            threshold: record.threshold,
        });
    }

    record.executed = true;
    RECEIVED_TRANSFERS.save(storage, id, &record)?;
    Ok(record)
}

/// Move a message to Executed once quorum, timelock and deadline allow it.
pub fn mark_message_executed(
    storage: &mut dyn Storage,
    id: &[u8; 32],
    now: u64,
) -> Result<ReceivedMessage, ContractError> {
    let mut record = RECEIVED_MESSAGES
        .may_load(storage, id)?
        .ok_or(ContractError::MessageNotFound)?;

    if record.executed {
        return Err(ContractError::MessageAlreadyExecuted);
    }
    if record.cancelled {
        return Err(ContractError::MessageCancelled);
    }
    let executable_at = match record.executable_at {
        Some(at) if record.received_so_far >= record.threshold => at,
        _ => {
            return Err(ContractError::QuorumNotReached {
                received: record.received_so_far,
                threshold: record.threshold,
            })
        }
    };
    if now >= record.expires_at {
        return Err(ContractError::MessageExpired {
            expired_at: record.expires_at,
        });
    }
    if now < executable_at {
        return Err(ContractError::TimelockActive {
            remaining_seconds: executable_at - now,
        });
    }

    record.executed = true;
    RECEIVED_MESSAGES.save(storage, id, &record)?;
    Ok(record)
}

/// Veto a message that has been delivered at least once.
pub fn cancel_message(
    storage: &mut dyn Storage,
    id: &[u8; 32],
) -> Result<ReceivedMessage, ContractError> {
    let mut record = RECEIVED_MESSAGES
        .may_load(storage, id)?
        .ok_or(ContractError::MessageNotReceived)?;

    if record.received_so_far == 0 {
        return Err(ContractError::MessageNotReceived);
    }
    if record.executed {
        return Err(ContractError::MessageAlreadyExecuted);
    }
    if record.cancelled {
        return Err(ContractError::MessageCancelled);
    }

    record.cancelled = true;
    RECEIVED_MESSAGES.save(storage, id, &record)?;
    Ok(record)
}

// ============================================================================
// Views
// ============================================================================

pub fn transfer_state(record: Option<&ReceivedTransfer>) -> DeliveryState {
    match record {
        None => DeliveryState::Unseen,
        Some(r) if r.executed => DeliveryState::Executed,
        Some(r) if r.received_so_far >= r.threshold => DeliveryState::Executable,
        Some(_) => DeliveryState::Pending,
    }
}

pub fn message_state(record: Option<&ReceivedMessage>, now: u64) -> DeliveryState {
    match record {
        None => DeliveryState::Unseen,
        Some(r) if r.executed => DeliveryState::Executed,
        Some(r) if r.cancelled => DeliveryState::Cancelled,
        Some(r) if now >= r.expires_at => DeliveryState::Expired,
        Some(r) if r.received_so_far >= r.threshold => DeliveryState::Executable,
        Some(_) => DeliveryState::Pending,
    }
}

// ============================================================================
// Tests
// ============================================================================
