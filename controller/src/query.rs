//! Query handlers for the bridge controller.
//!
//! This module contains all query message handlers for retrieving contract state.

use cosmwasm_std::{Addr, Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::{Bound, Map};

use crate::auth::{is_authorized_channel, is_multi_channel_adapter};
use crate::identifier::{bytes32_to_hex, compute_id, parse_id};
use crate::msg::{
    AddressesResponse, ComputeIdResponse, ConfigResponse, ControllerResponse,
    CurrentLimitResponse, DeliveredResponse, DestinationPausedResponse, IsChannelResponse,
    MessageResponse, NonceResponse, RateLimitsResponse, ReceivedMessageResponse,
    ReceivedTransferResponse, StatsResponse, StatusResponse, TransferResponse,
};
use crate::quorum::{message_state, transfer_state};
use crate::rate_limit::{current_limit, limit_key, load_limit, LimitSide};
use crate::state::{
    CHANNELS, CONFIG, CONTROLLERS, DELIVERIES, MANAGERS, MESSAGES, MULTI_CHANNEL_ADAPTERS, NONCE,
    PAUSED_DESTINATIONS, RECEIVED_MESSAGES, RECEIVED_TRANSFERS, STATS, TRANSFERS, VETOERS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

// ============================================================================
// Core Queries
// ============================================================================

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        local_chain_id: config.local_chain_id,
        backing: config.backing,
        fee_denom: config.fee_denom,
        registry: config.registry,
        lockbox: config.lockbox,
        fee_collector: config.fee_collector,
        min_channels: config.min_channels,
        message_timelock: config.message_timelock,
        message_ttl: config.message_ttl,
    })
}

/// Query controller statistics.
pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let stats = STATS.load(deps.storage)?;
    Ok(StatsResponse {
        transfers_sent: stats.transfers_sent,
        transfers_received: stats.transfers_received,
        transfers_executed: stats.transfers_executed,
        messages_sent: stats.messages_sent,
        messages_received: stats.messages_received,
        messages_executed: stats.messages_executed,
        messages_cancelled: stats.messages_cancelled,
    })
}

/// Query the nonce the next send will use.
pub fn query_current_nonce(deps: Deps) -> StdResult<NonceResponse> {
    let nonce = NONCE.may_load(deps.storage)?.unwrap_or_default();
    Ok(NonceResponse { nonce })
}

/// Compute the id of a send from this controller, without touching state.
pub fn query_compute_id(
    deps: Deps,
    dest_chain_id: u64,
    nonce: u64,
) -> StdResult<ComputeIdResponse> {
    let config = CONFIG.load(deps.storage)?;
    let id = compute_id(dest_chain_id, config.local_chain_id, nonce);
    Ok(ComputeIdResponse {
        id: Binary::from(id.to_vec()),
        id_hex: bytes32_to_hex(&id),
    })
}

// ============================================================================
// Records
// ============================================================================

pub fn query_transfer(deps: Deps, id: Binary) -> StdResult<TransferResponse> {
    let id = id_bytes(&id)?;
    Ok(TransferResponse {
        transfer: TRANSFERS.may_load(deps.storage, &id)?,
    })
}

pub fn query_message(deps: Deps, id: Binary) -> StdResult<MessageResponse> {
    let id = id_bytes(&id)?;
    Ok(MessageResponse {
        message: MESSAGES.may_load(deps.storage, &id)?,
    })
}

pub fn query_received_transfer(deps: Deps, id: Binary) -> StdResult<ReceivedTransferResponse> {
    let id = id_bytes(&id)?;
    Ok(ReceivedTransferResponse {
        transfer: RECEIVED_TRANSFERS.may_load(deps.storage, &id)?,
    })
}

pub fn query_received_message(deps: Deps, id: Binary) -> StdResult<ReceivedMessageResponse> {
    let id = id_bytes(&id)?;
    Ok(ReceivedMessageResponse {
        message: RECEIVED_MESSAGES.may_load(deps.storage, &id)?,
    })
}

/// Whether `channel` has already delivered `id`.
pub fn query_delivered(deps: Deps, id: Binary, channel: String) -> StdResult<DeliveredResponse> {
    let id = id_bytes(&id)?;
    let channel = deps.api.addr_validate(&channel)?;
    Ok(DeliveredResponse {
        delivered: DELIVERIES.has(deps.storage, (id.as_slice(), &channel)),
    })
}

pub fn query_transfer_status(deps: Deps, id: Binary) -> StdResult<StatusResponse> {
    let id = id_bytes(&id)?;
    let record = RECEIVED_TRANSFERS.may_load(deps.storage, &id)?;
    Ok(StatusResponse {
        state: transfer_state(record.as_ref()),
    })
}

pub fn query_message_status(deps: Deps, env: Env, id: Binary) -> StdResult<StatusResponse> {
    let id = id_bytes(&id)?;
    let record = RECEIVED_MESSAGES.may_load(deps.storage, &id)?;
    Ok(StatusResponse {
        state: message_state(record.as_ref(), env.block.time.seconds()),
    })
}

// ============================================================================
// Routing
// ============================================================================

pub fn query_controller_for_chain(deps: Deps, chain_id: u64) -> StdResult<ControllerResponse> {
    Ok(ControllerResponse {
        chain_id,
        controller: CONTROLLERS.may_load(deps.storage, chain_id)?,
    })
}

pub fn query_destination_paused(
    deps: Deps,
    chain_id: u64,
) -> StdResult<DestinationPausedResponse> {
    Ok(DestinationPausedResponse {
        chain_id,
        paused: PAUSED_DESTINATIONS
            .may_load(deps.storage, chain_id)?
            .unwrap_or(false),
    })
}

/// Channel status on both paths; the single-channel answer honours the registry.
pub fn query_is_channel(deps: Deps, address: String) -> StdResult<IsChannelResponse> {
    let config = CONFIG.load(deps.storage)?;
    let channel = deps.api.addr_validate(&address)?;
    let authorized = is_authorized_channel(deps, &config, &channel)
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    let multi_channel = is_multi_channel_adapter(deps.storage, &channel)
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    Ok(IsChannelResponse {
        authorized,
        multi_channel,
    })
}

pub fn query_channels(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AddressesResponse> {
    list_addresses(deps, CHANNELS, start_after, limit)
}

pub fn query_multi_channel_adapters(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AddressesResponse> {
    list_addresses(deps, MULTI_CHANNEL_ADAPTERS, start_after, limit)
}

// ============================================================================
// Rate Limits
// ============================================================================

pub fn query_rate_limits(
    deps: Deps,
    env: Env,
    channel: Option<String>,
) -> StdResult<RateLimitsResponse> {
    let key = limit_key(channel.as_deref()).to_string();
    let now = env.block.time.seconds();
    let minting = load_limit(deps.storage, LimitSide::Minting, &key)?;
    let burning = load_limit(deps.storage, LimitSide::Burning, &key)?;
    Ok(RateLimitsResponse {
        minting_current: minting.current_limit_at(now),
        burning_current: burning.current_limit_at(now),
        key,
        minting,
        burning,
    })
}

pub fn query_current_limit(
    deps: Deps,
    env: Env,
    side: LimitSide,
    channel: Option<String>,
) -> StdResult<CurrentLimitResponse> {
    let key = limit_key(channel.as_deref()).to_string();
    let current_limit = current_limit(deps.storage, side, &key, env.block.time.seconds())?;
    Ok(CurrentLimitResponse { key, current_limit })
}

// ============================================================================
// Roles
// ============================================================================

pub fn query_managers(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AddressesResponse> {
    list_addresses(deps, MANAGERS, start_after, limit)
}

pub fn query_vetoers(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AddressesResponse> {
    list_addresses(deps, VETOERS, start_after, limit)
}

// ============================================================================
// Helpers
// ============================================================================

fn id_bytes(id: &Binary) -> StdResult<[u8; 32]> {
    parse_id(id).map_err(|e| StdError::generic_err(e.to_string()))
}

fn list_addresses(
    deps: Deps,
    map: Map<'static, &'static Addr, bool>,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<AddressesResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after
        .map(|s| deps.api.addr_validate(&s))
        .transpose()?
        .map(|addr| Bound::ExclusiveRaw(addr.as_bytes().to_vec()));

    let addresses = map
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(addr, _)| addr))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(AddressesResponse { addresses })
}
