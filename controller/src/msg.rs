//! Message types for the bridge controller
//!
//! This module defines all messages for instantiation, execution, and queries.

use common::AssetInfo;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Uint128};

use crate::quorum::DeliveryState;
use crate::rate_limit::BridgeLimitState;
use crate::state::{
    BackingMode, Call, Message, ReceivedMessage, ReceivedTransfer, TokenStandard, Transfer,
};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Backing mode as supplied at instantiation (addresses unvalidated)
#[cw_serde]
pub enum BackingModeMsg {
    MessageOnly,
    MintBurn {
        token: String,
        standard: TokenStandard,
    },
    LockRelease {
        token: String,
        strategy: Option<String>,
    },
}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// Chain id of the chain this controller is deployed on
    pub local_chain_id: u64,
    /// Asset backing of this controller
    pub backing: BackingModeMsg,
    /// Native denom in which channel fees are paid
    pub fee_denom: String,
    /// Shared channel registry (None = local whitelist)
    pub registry: Option<String>,
    /// Lockbox for the unwrap path
    pub lockbox: Option<String>,
    /// Fee collector for multi-channel transfers
    pub fee_collector: Option<String>,
    /// Distinct channels required on the multi-channel path (default 2)
    pub min_channels: Option<u32>,
    /// Seconds between message quorum and execution (default 1 hour)
    pub message_timelock: Option<u64>,
    /// Lifetime of outgoing messages in seconds (default 7 days)
    pub message_ttl: Option<u64>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Channel selection for a resend
#[cw_serde]
pub enum Route {
    /// One whitelisted channel
    Single {
        channel: String,
        fee: Uint128,
        options: Binary,
    },
    /// Several distinct multi-channel adapters
    Multi {
        channels: Vec<String>,
        fees: Vec<Uint128>,
        options: Vec<Binary>,
    },
}

impl Route {
    pub fn is_multi(&self) -> bool {
        matches!(self, Route::Multi { .. })
    }

    pub fn channel_count(&self) -> usize {
        match self {
            Route::Single { .. } => 1,
            Route::Multi { channels, .. } => channels.len(),
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Uint128>, Vec<Binary>) {
        match self {
            Route::Single {
                channel,
                fee,
                options,
            } => (vec![channel], vec![fee], vec![options]),
            Route::Multi {
                channels,
                fees,
                options,
            } => (channels, fees, options),
        }
    }
}

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Outgoing
    // ========================================================================
    /// Bridge `amount` through one channel.
    ///
    /// The sender must have granted the controller a CW20 allowance of at
    /// least `amount`. The channel fee is attached in the fee denom.
    SendTransfer {
        recipient: String,
        amount: Uint128,
        unwrap: bool,
        dest_chain_id: u64,
        channel: String,
        fee: Uint128,
        options: Binary,
    },

    /// Bridge `amount` through several multi-channel adapters. The destination
    /// pays out once `min_channels` distinct adapters have delivered.
    SendTransferMulti {
        recipient: String,
        amount: Uint128,
        unwrap: bool,
        dest_chain_id: u64,
        channels: Vec<String>,
        fees: Vec<Uint128>,
        options: Vec<Binary>,
    },

    /// Send a batch of calls through one channel
    SendMessage {
        calls: Vec<Call>,
        dest_chain_id: u64,
        channel: String,
        fee: Uint128,
        options: Binary,
    },

    /// Send a batch of calls through several multi-channel adapters
    SendMessageMulti {
        calls: Vec<Call>,
        dest_chain_id: u64,
        channels: Vec<String>,
        fees: Vec<Uint128>,
        options: Vec<Binary>,
    },

    /// Re-dispatch a stored transfer. No nonce or rate limit is consumed.
    ResendTransfer { id: Binary, route: Route },

    /// Re-dispatch a stored message
    ResendMessage { id: Binary, route: Route },

    // ========================================================================
    // Incoming
    // ========================================================================
    /// Called by a channel adapter with a payload from `origin_sender`, the
    /// controller registered for `origin_chain_id`.
    Receive {
        payload: Binary,
        origin_chain_id: u64,
        origin_sender: String,
    },

    /// Pay out a multi-channel transfer that reached quorum.
    ///
    /// Authorization: Anyone
    ExecuteTransfer { id: Binary },

    /// Run the calls of a message whose timelock has passed.
    ///
    /// Authorization: Anyone
    ExecuteMessage { id: Binary },

    /// Veto a received message before execution
    ///
    /// Authorization: Vetoer
    CancelMessage { id: Binary },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Register (or replace) the counterpart controller on `chain_id`
    SetControllerForChain { chain_id: u64, controller: String },

    /// Enable or disable single-channel adapters in the local whitelist
    SetChannels {
        channels: Vec<String>,
        enabled: Vec<bool>,
    },

    /// Enable or disable adapters on the multi-channel path
    SetMultiChannelAdapters {
        adapters: Vec<String>,
        enabled: Vec<bool>,
    },

    /// Set the quorum threshold of multi-channel sends (at least 2)
    SetMinChannels { min_channels: u32 },

    /// Delegate single-channel authorization to a registry (None = local)
    SetRegistry { registry: Option<String> },

    SetLockbox { lockbox: Option<String> },

    SetFeeCollector { fee_collector: Option<String> },

    /// Attach or detach the yield strategy (lock/release backing only)
    SetYieldStrategy { strategy: Option<String> },

    /// Move escrowed tokens into the yield strategy
    InvestInStrategy { amount: Uint128 },

    SetMessageTimelock { seconds: u64 },

    SetMessageTtl { seconds: u64 },

    AddManager { address: String },

    RemoveManager { address: String },

    AddVetoer { address: String },

    RemoveVetoer { address: String },

    /// Pause sending, receiving and execution
    Pause {},

    Unpause {},

    /// Recover stuck assets (only while paused)
    RecoverAsset {
        asset: AssetInfo,
        amount: Uint128,
        recipient: String,
    },

    // ========================================================================
    // Manager Operations
    // ========================================================================
    /// Set the daily minting (inbound) and burning (outbound) limits of a
    /// channel, or of the multi-channel pool when `channel` is None.
    ///
    /// Authorization: Manager or admin
    SetRateLimits {
        channel: Option<String>,
        minting_limit: Uint128,
        burning_limit: Uint128,
    },

    /// Stop dispatch to one destination chain
    ///
    /// Authorization: Manager or admin
    PauseDestination { chain_id: u64 },

    /// Authorization: Manager or admin
    UnpauseDestination { chain_id: u64 },
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    // ========================================================================
    // Core Queries
    // ========================================================================
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns controller statistics
    #[returns(StatsResponse)]
    Stats {},

    /// Returns the nonce of the next outgoing transfer or message
    #[returns(NonceResponse)]
    CurrentNonce {},

    /// Compute the id a send to `dest_chain_id` with `nonce` would get
    #[returns(ComputeIdResponse)]
    ComputeId { dest_chain_id: u64, nonce: u64 },

    // ========================================================================
    // Records
    // ========================================================================
    /// Outgoing transfer by id
    #[returns(TransferResponse)]
    Transfer { id: Binary },

    /// Outgoing message by id
    #[returns(MessageResponse)]
    Message { id: Binary },

    #[returns(ReceivedTransferResponse)]
    ReceivedTransfer { id: Binary },

    #[returns(ReceivedMessageResponse)]
    ReceivedMessage { id: Binary },

    /// Whether `channel` has delivered `id`
    #[returns(DeliveredResponse)]
    Delivered { id: Binary, channel: String },

    #[returns(StatusResponse)]
    TransferStatus { id: Binary },

    #[returns(StatusResponse)]
    MessageStatus { id: Binary },

    // ========================================================================
    // Routing
    // ========================================================================
    #[returns(ControllerResponse)]
    ControllerForChain { chain_id: u64 },

    #[returns(DestinationPausedResponse)]
    DestinationPaused { chain_id: u64 },

    /// Whether `address` is an authorized single channel (registry aware)
    #[returns(IsChannelResponse)]
    IsChannel { address: String },

    /// Local single-channel whitelist
    #[returns(AddressesResponse)]
    Channels {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(AddressesResponse)]
    MultiChannelAdapters {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    // ========================================================================
    // Rate Limits
    // ========================================================================
    /// Stored limit state of a channel (None = multi-channel pool)
    #[returns(RateLimitsResponse)]
    RateLimits { channel: Option<String> },

    #[returns(CurrentLimitResponse)]
    MintingCurrentLimit { channel: Option<String> },

    #[returns(CurrentLimitResponse)]
    BurningCurrentLimit { channel: Option<String> },

    // ========================================================================
    // Roles
    // ========================================================================
    #[returns(AddressesResponse)]
    Managers {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    #[returns(AddressesResponse)]
    Vetoers {
        start_after: Option<String>,
        limit: Option<u32>,
    },
}

// ============================================================================
// Response Types
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub local_chain_id: u64,
    pub backing: BackingMode,
    pub fee_denom: String,
    pub registry: Option<Addr>,
    pub lockbox: Option<Addr>,
    pub fee_collector: Option<Addr>,
    pub min_channels: u32,
    pub message_timelock: u64,
    pub message_ttl: u64,
}

#[cw_serde]
pub struct StatsResponse {
    pub transfers_sent: u64,
    pub transfers_received: u64,
    pub transfers_executed: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub messages_executed: u64,
    pub messages_cancelled: u64,
}

#[cw_serde]
pub struct NonceResponse {
    pub nonce: u64,
}

#[cw_serde]
pub struct ComputeIdResponse {
    pub id: Binary,
    /// 0x-prefixed hex of `id`
    pub id_hex: String,
}

#[cw_serde]
pub struct TransferResponse {
    pub transfer: Option<Transfer>,
}

#[cw_serde]
pub struct MessageResponse {
    pub message: Option<Message>,
}

#[cw_serde]
pub struct ReceivedTransferResponse {
    pub transfer: Option<ReceivedTransfer>,
}

#[cw_serde]
pub struct ReceivedMessageResponse {
    pub message: Option<ReceivedMessage>,
}

#[cw_serde]
pub struct DeliveredResponse {
    pub delivered: bool,
}

#[cw_serde]
pub struct StatusResponse {
    pub state: DeliveryState,
}

#[cw_serde]
pub struct ControllerResponse {
    pub chain_id: u64,
    pub controller: Option<String>,
}

#[cw_serde]
pub struct DestinationPausedResponse {
    pub chain_id: u64,
    pub paused: bool,
}

#[cw_serde]
pub struct IsChannelResponse {
    pub authorized: bool,
    pub multi_channel: bool,
}

#[cw_serde]
pub struct AddressesResponse {
    pub addresses: Vec<Addr>,
}

#[cw_serde]
pub struct RateLimitsResponse {
    /// Channel address or the multi-channel pool key
    pub key: String,
    pub minting: BridgeLimitState,
    pub burning: BridgeLimitState,
    pub minting_current: Uint128,
    pub burning_current: Uint128,
}

#[cw_serde]
pub struct CurrentLimitResponse {
    pub key: String,
    pub current_limit: Uint128,
}
