//! State definitions for the bridge controller
//!
//! This module defines the stored configuration, the origin-side transfer and
//! message records, the destination-side quorum records and the reply
//! contexts used by the execution engine.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Core Configuration
// ============================================================================

/// How a CW20 token exposes burning to the controller
#[cw_serde]
pub enum TokenStandard {
    /// Controller is the minter and burns through `BurnFrom` (allowance)
    Mintable,
    /// Token only offers `Burn { amount }` on the caller's own balance; the
    /// controller pulls funds in first and verifies the burned amount
    AmountBurn,
}

/// Value-backing strategy of this controller
#[cw_serde]
pub enum BackingMode {
    /// No value moves; only messages are bridged
    MessageOnly,
    /// Burn on send, mint on receive
    MintBurn { token: Addr, standard: TokenStandard },
    /// Escrow on send, release on receive; optionally yield-backed
    LockRelease {
        token: Addr,
        strategy: Option<Addr>,
    },
}

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Whether the controller is currently paused
    pub paused: bool,
    /// Chain id of the chain this controller lives on
    pub local_chain_id: u64,
    /// Asset backing strategy
    pub backing: BackingMode,
    /// Native denom used for per-channel fees
    pub fee_denom: String,
    /// Shared channel registry (None = use the local whitelist)
    pub registry: Option<Addr>,
    /// Lockbox used by the unwrap path (mint backing only)
    pub lockbox: Option<Addr>,
    /// Fee collector funded by multi-channel transfers
    pub fee_collector: Option<Addr>,
    /// Distinct channels required for multi-channel transfers and messages
    pub min_channels: u32,
    /// Delay between a message reaching quorum and becoming executable
    pub message_timelock: u64,
    /// Lifetime of outgoing messages, in seconds from send
    pub message_ttl: u64,
}

/// Controller statistics
#[cw_serde]
#[derive(Default)]
pub struct Stats {
    pub transfers_sent: u64,
    pub transfers_received: u64,
    pub transfers_executed: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub messages_executed: u64,
    pub messages_cancelled: u64,
}

// ============================================================================
// Records
// ============================================================================

/// One call executed by a bridged message
#[cw_serde]
pub struct Call {
    /// Contract to call on the destination chain
    pub target: String,
    /// JSON execute message passed to `target`
    pub msg: Binary,
}

/// Outgoing value transfer, immutable once created
#[cw_serde]
pub struct Transfer {
    pub id: [u8; 32],
    pub recipient: String,
    pub amount: Uint128,
    pub unwrap: bool,
    pub threshold: u32,
    pub dest_chain_id: u64,
}

/// Outgoing message, immutable once created
#[cw_serde]
pub struct Message {
    pub id: [u8; 32],
    pub calls: Vec<Call>,
    pub threshold: u32,
    pub dest_chain_id: u64,
    pub expires_at: u64,
}

/// Destination-side projection of a transfer
#[cw_serde]
pub struct ReceivedTransfer {
    pub recipient: String,
    pub amount: Uint128,
    pub unwrap: bool,
    /// Distinct channels that delivered this id
    pub received_so_far: u32,
    pub threshold: u32,
    pub origin_chain_id: u64,
    pub executed: bool,
}

/// Destination-side projection of a message
#[cw_serde]
pub struct ReceivedMessage {
    pub calls: Vec<Call>,
    pub received_so_far: u32,
    pub threshold: u32,
    pub origin_chain_id: u64,
    /// Stamped once, on the delivery that reaches quorum
    pub executable_at: Option<u64>,
    pub expires_at: u64,
    pub executed: bool,
    pub cancelled: bool,
}

/// Reply context for the unwrap path
#[cw_serde]
pub struct PendingUnwrap {
    pub token: Addr,
    pub recipient: Addr,
    pub amount: Uint128,
    pub lockbox: Addr,
    /// Identifier of the lockbox's underlying asset
    pub underlying: String,
}

/// Reply context for amount-only burns
#[cw_serde]
pub struct PendingBurnCheck {
    pub token: Addr,
    /// Controller balance expected once the burn has landed
    pub expected_balance: Uint128,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:quorum-bridge-controller";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default message timelock in seconds (1 hour)
pub const DEFAULT_MESSAGE_TIMELOCK: u64 = 3_600;

/// Default message lifetime in seconds (7 days)
pub const DEFAULT_MESSAGE_TTL: u64 = 604_800;

/// Reply id for the amount-only burn verification
pub const BURN_CHECK_REPLY_ID: u64 = 1;

/// Reply id for the lockbox unwrap attempt
pub const UNWRAP_REPLY_ID: u64 = 2;

/// Reply ids of message calls are `MESSAGE_CALL_REPLY_BASE + index`
pub const MESSAGE_CALL_REPLY_BASE: u64 = 1_000;

// ============================================================================
// Core State Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Controller statistics
pub const STATS: Item<Stats> = Item::new("stats");

/// Outgoing nonce counter, shared by transfers and messages
pub const NONCE: Item<u64> = Item::new("nonce");

/// Counterpart controller per remote chain
/// Key: chain id, Value: controller address on that chain
pub const CONTROLLERS: Map<u64, String> = Map::new("controllers");

/// Destinations paused independently of the global flag
pub const PAUSED_DESTINATIONS: Map<u64, bool> = Map::new("paused_destinations");

/// Local whitelist of single-channel adapters
pub const CHANNELS: Map<&Addr, bool> = Map::new("channels");

/// Adapters allowed on the multi-channel path
pub const MULTI_CHANNEL_ADAPTERS: Map<&Addr, bool> = Map::new("multi_channel_adapters");

/// Managers (rate limits, destination pauses)
pub const MANAGERS: Map<&Addr, bool> = Map::new("managers");

/// Vetoers (message cancellation)
pub const VETOERS: Map<&Addr, bool> = Map::new("vetoers");

// ============================================================================
// Transfer & Message State
// ============================================================================

/// Outgoing transfers by id
pub const TRANSFERS: Map<&[u8], Transfer> = Map::new("transfers");

/// Outgoing messages by id
pub const MESSAGES: Map<&[u8], Message> = Map::new("messages");

/// Incoming transfers by id
pub const RECEIVED_TRANSFERS: Map<&[u8], ReceivedTransfer> = Map::new("received_transfers");

/// Incoming messages by id
pub const RECEIVED_MESSAGES: Map<&[u8], ReceivedMessage> = Map::new("received_messages");

/// Per-channel delivery record, never reset
/// Key: (id, channel), Value: true once delivered
pub const DELIVERIES: Map<(&[u8], &Addr), bool> = Map::new("deliveries");

/// Unwrap in flight (cleared by the reply)
pub const PENDING_UNWRAP: Item<PendingUnwrap> = Item::new("pending_unwrap");

/// Burn verification in flight (cleared by the reply)
pub const PENDING_BURN_CHECK: Item<PendingBurnCheck> = Item::new("pending_burn_check");
