//! Error types for the bridge controller
//!
//! Variants are grouped by failure class: configuration, authorization,
//! capacity, protocol state and downstream calls.

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only a manager can perform this action")]
    UnauthorizedManager,

    #[error("Unauthorized: caller is not a vetoer")]
    NotVetoer,

    #[error("Unauthorized channel: {channel}")]
    UnauthorizedChannel { channel: String },

    #[error("Channel is not a multi-channel adapter: {channel}")]
    NotMultiChannelAdapter { channel: String },

    #[error("Unknown origin controller {sender} for chain {chain_id}")]
    UnknownOriginController { chain_id: u64, sender: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Controller is paused")]
    ControllerPaused,

    #[error("Destination chain is paused: {chain_id}")]
    DestinationPaused { chain_id: u64 },

    #[error("Chain not supported: {chain_id}")]
    ChainNotSupported { chain_id: u64 },

    #[error("Transfers are disabled on a message-only controller")]
    TransfersDisabled,

    #[error("Array length mismatch: {reason}")]
    ArrayLengthMismatch { reason: String },

    #[error("Duplicate channel in dispatch: {channel}")]
    DuplicateChannel { channel: String },

    #[error("Insufficient channels: got {got}, need {required}")]
    InsufficientChannels { got: u32, required: u32 },

    #[error("Invalid threshold: {reason}")]
    InvalidThreshold { reason: String },

    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Fee mismatch: channel fees total {expected}, attached {got}")]
    FeeMismatch { expected: Uint128, got: Uint128 },

    #[error("Invalid id length: expected 32 bytes, got {got}")]
    InvalidIdLength { got: usize },

    #[error("Message has no calls")]
    EmptyCalls,

    #[error("Yield strategy not configured")]
    StrategyNotConfigured,

    #[error("Yield strategy requires lock/release backing")]
    StrategyRequiresLockRelease,

    // ========================================================================
    // Capacity Errors
    // ========================================================================

    #[error("Rate limit exceeded: {side} limit for {channel} is {limit}, requested {requested}")]
    RateLimitExceeded {
        side: String,
        channel: String,
        limit: Uint128,
        requested: Uint128,
    },

    #[error("Insufficient liquidity: {available} on hand, {requested} requested, no strategy")]
    InsufficientLiquidity {
        available: Uint128,
        requested: Uint128,
    },

    #[error("Strategy insufficient: deficit {deficit}, strategy principal {principal}")]
    StrategyInsufficient {
        deficit: Uint128,
        principal: Uint128,
    },

    // ========================================================================
    // Protocol / State Errors
    // ========================================================================

    #[error("Transfer not found")]
    TransferNotFound,

    #[error("Message not found")]
    MessageNotFound,

    #[error("Duplicate delivery from channel {channel}")]
    DuplicateDelivery { channel: String },

    #[error("Transfer already executed")]
    TransferAlreadyExecuted,

    #[error("Message already executed")]
    MessageAlreadyExecuted,

    #[error("Message cancelled")]
    MessageCancelled,

    #[error("Message not received")]
    MessageNotReceived,

    #[error("Quorum not reached: {received} of {threshold} channels delivered")]
    QuorumNotReached { received: u32, threshold: u32 },

    #[error("Message timelock active: {remaining_seconds} seconds remaining")]
    TimelockActive { remaining_seconds: u64 },

    #[error("Message expired at {expired_at}")]
    MessageExpired { expired_at: u64 },

    #[error("Resend shape mismatch: threshold {threshold} with {channels} channel(s)")]
    ResendShapeMismatch { threshold: u32, channels: u32 },

    #[error("Asset recovery only available when controller is paused")]
    RecoveryNotAvailable,

    // ========================================================================
    // Downstream Errors
    // ========================================================================

    #[error("Burn mismatch: expected balance {expected}, found {actual}")]
    BurnMismatch { expected: Uint128, actual: Uint128 },

    #[error("Message call {index} failed: {reason}")]
    MessageCallFailed { index: u64, reason: String },

    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },
}
