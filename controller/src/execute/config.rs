//! Configuration management handlers.
//!
//! This module handles:
//! - Counterpart controllers per chain
//! - Channel whitelist, multi-channel adapters and the registry
//! - Lockbox, fee collector and yield strategy wiring
//! - Message timelock and lifetime
//! - Rate limits and destination pauses (manager or admin)

use cosmwasm_std::{Addr, Api, DepsMut, Env, MessageInfo, Response, StdResult, Uint128};

use crate::auth::{ensure_admin, ensure_manager};
use crate::error::ContractError;
use crate::rate_limit::{set_limits, MULTI_CHANNEL_POOL};
use crate::state::{
    BackingMode, CHANNELS, CONFIG, CONTROLLERS, MULTI_CHANNEL_ADAPTERS, PAUSED_DESTINATIONS,
};

// ============================================================================
// Routing
// ============================================================================

/// Register the controller this one talks to on `chain_id`.
pub fn execute_set_controller_for_chain(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
    controller: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    if chain_id == config.local_chain_id {
        return Err(ContractError::InvalidAddress {
            reason: "Cannot register a counterpart for the local chain".to_string(),
        });
    }
    // Remote address formats vary by chain; only emptiness is checked
    if controller.trim().is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "Controller cannot be empty".to_string(),
        });
    }
    CONTROLLERS.save(deps.storage, chain_id, &controller)?;

    Ok(Response::new()
        .add_attribute("method", "set_controller_for_chain")
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("controller", controller))
}

/// Enable or disable single-channel adapters in the local whitelist.
pub fn execute_set_channels(
    deps: DepsMut,
    info: MessageInfo,
    channels: Vec<String>,
    enabled: Vec<bool>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let channels = validate_toggles(deps.api, &channels, &enabled)?;
    for (channel, on) in channels.iter().zip(enabled) {
        if on {
            CHANNELS.save(deps.storage, channel, &true)?;
        } else {
            CHANNELS.remove(deps.storage, channel);
        }
    }

    Ok(Response::new()
        .add_attribute("method", "set_channels")
        .add_attribute("count", channels.len().to_string()))
}

/// Enable or disable adapters on the multi-channel path.
pub fn execute_set_multi_channel_adapters(
    deps: DepsMut,
    info: MessageInfo,
    adapters: Vec<String>,
    enabled: Vec<bool>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let adapters = validate_toggles(deps.api, &adapters, &enabled)?;
    for (adapter, on) in adapters.iter().zip(enabled) {
        if on {
            MULTI_CHANNEL_ADAPTERS.save(deps.storage, adapter, &true)?;
        } else {
            MULTI_CHANNEL_ADAPTERS.remove(deps.storage, adapter);
        }
    }

    Ok(Response::new()
        .add_attribute("method", "set_multi_channel_adapters")
        .add_attribute("count", adapters.len().to_string()))
}

pub fn execute_set_min_channels(
    deps: DepsMut,
    info: MessageInfo,
    min_channels: u32,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    if min_channels < 2 {
        return Err(ContractError::InvalidThreshold {
            reason: "multi-channel threshold must be at least 2".to_string(),
        });
    }
    config.min_channels = min_channels;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_min_channels")
        .add_attribute("min_channels", min_channels.to_string()))
}

// ============================================================================
// Collaborators
// ============================================================================

pub fn execute_set_registry(
    deps: DepsMut,
    info: MessageInfo,
    registry: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    config.registry = validate_optional(deps.api, registry)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_registry")
        .add_attribute("registry", display(&config.registry)))
}

pub fn execute_set_lockbox(
    deps: DepsMut,
    info: MessageInfo,
    lockbox: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    config.lockbox = validate_optional(deps.api, lockbox)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_lockbox")
        .add_attribute("lockbox", display(&config.lockbox)))
}

pub fn execute_set_fee_collector(
    deps: DepsMut,
    info: MessageInfo,
    fee_collector: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    config.fee_collector = validate_optional(deps.api, fee_collector)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_fee_collector")
        .add_attribute("fee_collector", display(&config.fee_collector)))
}

/// Attach or detach the yield strategy of a lock/release controller.
pub fn execute_set_yield_strategy(
    deps: DepsMut,
    info: MessageInfo,
    strategy: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let new_strategy = validate_optional(deps.api, strategy)?;
    match &mut config.backing {
        BackingMode::LockRelease { strategy, .. } => *strategy = new_strategy.clone(),
        _ => return Err(ContractError::StrategyRequiresLockRelease),
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_yield_strategy")
        .add_attribute("strategy", display(&new_strategy)))
}

// ============================================================================
// Message Timing
// ============================================================================

pub fn execute_set_message_timelock(
    deps: DepsMut,
    info: MessageInfo,
    seconds: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    config.message_timelock = seconds;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_message_timelock")
        .add_attribute("seconds", seconds.to_string()))
}

pub fn execute_set_message_ttl(
    deps: DepsMut,
    info: MessageInfo,
    seconds: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    if seconds == 0 {
        return Err(ContractError::InvalidAmount {
            reason: "Message lifetime must be greater than zero".to_string(),
        });
    }
    config.message_ttl = seconds;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_message_ttl")
        .add_attribute("seconds", seconds.to_string()))
}

// ============================================================================
// Manager Operations
// ============================================================================

/// Set both daily limits of a channel, or of the multi-channel pool.
///
/// Lowering a limit lowers the available capacity by the same amount;
/// raising it tops the bucket up by the difference.
pub fn execute_set_rate_limits(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    channel: Option<String>,
    minting_limit: Uint128,
    burning_limit: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_manager(deps.storage, &config, &info.sender)?;

    let key = match channel {
        Some(channel) => deps.api.addr_validate(&channel)?.to_string(),
        None => MULTI_CHANNEL_POOL.to_string(),
    };
    set_limits(
        deps.storage,
        &key,
        env.block.time.seconds(),
        minting_limit,
        burning_limit,
    )?;

    Ok(Response::new()
        .add_attribute("method", "set_rate_limits")
        .add_attribute("channel", key)
        .add_attribute("minting_limit", minting_limit.to_string())
        .add_attribute("burning_limit", burning_limit.to_string()))
}

pub fn execute_pause_destination(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_manager(deps.storage, &config, &info.sender)?;

    PAUSED_DESTINATIONS.save(deps.storage, chain_id, &true)?;

    Ok(Response::new()
        .add_attribute("method", "pause_destination")
        .add_attribute("chain_id", chain_id.to_string()))
}

pub fn execute_unpause_destination(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_manager(deps.storage, &config, &info.sender)?;

    PAUSED_DESTINATIONS.remove(deps.storage, chain_id);

    Ok(Response::new()
        .add_attribute("method", "unpause_destination")
        .add_attribute("chain_id", chain_id.to_string()))
}

// ============================================================================
// Helpers
// ============================================================================

fn validate_toggles(
    api: &dyn Api,
    addresses: &[String],
    enabled: &[bool],
) -> Result<Vec<Addr>, ContractError> {
    if addresses.len() != enabled.len() {
        return Err(ContractError::ArrayLengthMismatch {
            reason: format!("{} addresses, {} flags", addresses.len(), enabled.len()),
        });
    }
    Ok(addresses
        .iter()
        .map(|address| api.addr_validate(address))
        .collect::<StdResult<Vec<_>>>()?)
}

fn validate_optional(api: &dyn Api, address: Option<String>) -> StdResult<Option<Addr>> {
    address.map(|a| api.addr_validate(&a)).transpose()
}

fn display(address: &Option<Addr>) -> String {
    address
        .as_ref()
        .map(Addr::to_string)
        .unwrap_or_else(|| "none".to_string())
}
