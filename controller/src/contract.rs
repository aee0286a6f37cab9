//! Bridge Controller Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers
//! - `backing` - Payout strategies and their replies

use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Api, Binary, Deps, DepsMut, Env, MessageInfo, Reply,
    Response, StdResult,
};
use cw2::set_contract_version;

use crate::backing::{handle_burn_check_reply, handle_unwrap_reply};
use crate::error::ContractError;
use crate::execute::{
    execute_add_manager, execute_add_vetoer, execute_cancel_message, execute_execute_message,
    execute_execute_transfer, execute_invest_in_strategy, execute_pause,
    execute_pause_destination, execute_receive, execute_recover_asset, execute_remove_manager,
    execute_remove_vetoer, execute_resend_message, execute_resend_transfer, execute_send_message,
    execute_send_transfer, execute_set_channels, execute_set_controller_for_chain,
    execute_set_fee_collector, execute_set_lockbox, execute_set_message_timelock,
    execute_set_message_ttl, execute_set_min_channels, execute_set_multi_channel_adapters,
    execute_set_rate_limits, execute_set_registry, execute_set_yield_strategy, execute_unpause,
    execute_unpause_destination, handle_message_call_reply,
};
use crate::msg::{BackingModeMsg, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, Route};
use crate::query::{
    query_channels, query_compute_id, query_config, query_controller_for_chain,
    query_current_limit, query_current_nonce, query_delivered, query_destination_paused,
    query_is_channel, query_managers, query_message, query_message_status,
    query_multi_channel_adapters, query_rate_limits, query_received_message,
    query_received_transfer, query_stats, query_transfer, query_transfer_status, query_vetoers,
};
use crate::rate_limit::LimitSide;
use crate::state::{
    BackingMode, Config, Stats, BURN_CHECK_REPLY_ID, CONFIG, CONTRACT_NAME, CONTRACT_VERSION,
    DEFAULT_MESSAGE_TIMELOCK, DEFAULT_MESSAGE_TTL, MESSAGE_CALL_REPLY_BASE, NONCE, STATS,
    UNWRAP_REPLY_ID,
};

/// Default multi-channel quorum
const DEFAULT_MIN_CHANNELS: u32 = 2;

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let backing = validate_backing(deps.api, msg.backing)?;

    if msg.local_chain_id == 0 {
        return Err(ContractError::InvalidAddress {
            reason: "local_chain_id 0 is reserved".to_string(),
        });
    }
    if msg.fee_denom.is_empty() {
        return Err(ContractError::InvalidAmount {
            reason: "fee_denom cannot be empty".to_string(),
        });
    }

    let min_channels = msg.min_channels.unwrap_or(DEFAULT_MIN_CHANNELS);
    if min_channels < 2 {
        return Err(ContractError::InvalidThreshold {
            reason: "multi-channel threshold must be at least 2".to_string(),
        });
    }
    let message_ttl = msg.message_ttl.unwrap_or(DEFAULT_MESSAGE_TTL);
    if message_ttl == 0 {
        return Err(ContractError::InvalidAmount {
            reason: "Message lifetime must be greater than zero".to_string(),
        });
    }

    let config = Config {
        admin,
        paused: false,
        local_chain_id: msg.local_chain_id,
        backing,
        fee_denom: msg.fee_denom,
        registry: validate_optional(deps.api, msg.registry)?,
        lockbox: validate_optional(deps.api, msg.lockbox)?,
        fee_collector: validate_optional(deps.api, msg.fee_collector)?,
        min_channels,
        message_timelock: msg.message_timelock.unwrap_or(DEFAULT_MESSAGE_TIMELOCK),
        message_ttl,
    };
    CONFIG.save(deps.storage, &config)?;

    // Initialize stats and nonce
    STATS.save(deps.storage, &Stats::default())?;
    NONCE.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("local_chain_id", config.local_chain_id.to_string())
        .add_attribute("min_channels", min_channels.to_string())
        .add_attribute("message_timelock", config.message_timelock.to_string())
        .add_attribute("message_ttl", message_ttl.to_string()))
}

fn validate_backing(api: &dyn Api, backing: BackingModeMsg) -> StdResult<BackingMode> {
    Ok(match backing {
        BackingModeMsg::MessageOnly => BackingMode::MessageOnly,
        BackingModeMsg::MintBurn { token, standard } => BackingMode::MintBurn {
            token: api.addr_validate(&token)?,
            standard,
        },
        BackingModeMsg::LockRelease { token, strategy } => BackingMode::LockRelease {
            token: api.addr_validate(&token)?,
            strategy: validate_optional(api, strategy)?,
        },
    })
}

fn validate_optional(api: &dyn Api, address: Option<String>) -> StdResult<Option<Addr>> {
    address.map(|a| api.addr_validate(&a)).transpose()
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Outgoing
        ExecuteMsg::SendTransfer {
            recipient,
            amount,
            unwrap,
            dest_chain_id,
            channel,
            fee,
            options,
        } => execute_send_transfer(
            deps,
            env,
            info,
            recipient,
            amount,
            unwrap,
            dest_chain_id,
            Route::Single {
                channel,
                fee,
                options,
            },
        ),
        ExecuteMsg::SendTransferMulti {
            recipient,
            amount,
            unwrap,
            dest_chain_id,
            channels,
            fees,
            options,
        } => execute_send_transfer(
            deps,
            env,
            info,
            recipient,
            amount,
            unwrap,
            dest_chain_id,
            Route::Multi {
                channels,
                fees,
                options,
            },
        ),
        ExecuteMsg::SendMessage {
            calls,
            dest_chain_id,
            channel,
            fee,
            options,
        } => execute_send_message(
            deps,
            env,
            info,
            calls,
            dest_chain_id,
            Route::Single {
                channel,
                fee,
                options,
            },
        ),
        ExecuteMsg::SendMessageMulti {
            calls,
            dest_chain_id,
            channels,
            fees,
            options,
        } => execute_send_message(
            deps,
            env,
            info,
            calls,
            dest_chain_id,
            Route::Multi {
                channels,
                fees,
                options,
            },
        ),
        ExecuteMsg::ResendTransfer { id, route } => execute_resend_transfer(deps, info, id, route),
        ExecuteMsg::ResendMessage { id, route } => {
            execute_resend_message(deps, env, info, id, route)
        }

        // Incoming
        ExecuteMsg::Receive {
            payload,
            origin_chain_id,
            origin_sender,
        } => execute_receive(deps, env, info, payload, origin_chain_id, origin_sender),
        ExecuteMsg::ExecuteTransfer { id } => execute_execute_transfer(deps, env, id),
        ExecuteMsg::ExecuteMessage { id } => execute_execute_message(deps, env, id),
        ExecuteMsg::CancelMessage { id } => execute_cancel_message(deps, info, id),

        // Routing & collaborators
        ExecuteMsg::SetControllerForChain {
            chain_id,
            controller,
        } => execute_set_controller_for_chain(deps, info, chain_id, controller),
        ExecuteMsg::SetChannels { channels, enabled } => {
            execute_set_channels(deps, info, channels, enabled)
        }
        ExecuteMsg::SetMultiChannelAdapters { adapters, enabled } => {
            execute_set_multi_channel_adapters(deps, info, adapters, enabled)
        }
        ExecuteMsg::SetMinChannels { min_channels } => {
            execute_set_min_channels(deps, info, min_channels)
        }
        ExecuteMsg::SetRegistry { registry } => execute_set_registry(deps, info, registry),
        ExecuteMsg::SetLockbox { lockbox } => execute_set_lockbox(deps, info, lockbox),
        ExecuteMsg::SetFeeCollector { fee_collector } => {
            execute_set_fee_collector(deps, info, fee_collector)
        }
        ExecuteMsg::SetYieldStrategy { strategy } => {
            execute_set_yield_strategy(deps, info, strategy)
        }
        ExecuteMsg::InvestInStrategy { amount } => execute_invest_in_strategy(deps, info, amount),
        ExecuteMsg::SetMessageTimelock { seconds } => {
            execute_set_message_timelock(deps, info, seconds)
        }
        ExecuteMsg::SetMessageTtl { seconds } => execute_set_message_ttl(deps, info, seconds),

        // Roles
        ExecuteMsg::AddManager { address } => execute_add_manager(deps, info, address),
        ExecuteMsg::RemoveManager { address } => execute_remove_manager(deps, info, address),
        ExecuteMsg::AddVetoer { address } => execute_add_vetoer(deps, info, address),
        ExecuteMsg::RemoveVetoer { address } => execute_remove_vetoer(deps, info, address),

        // Admin operations
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::RecoverAsset {
            asset,
            amount,
            recipient,
        } => execute_recover_asset(deps, info, asset, amount, recipient),

        // Manager operations
        ExecuteMsg::SetRateLimits {
            channel,
            minting_limit,
            burning_limit,
        } => execute_set_rate_limits(deps, env, info, channel, minting_limit, burning_limit),
        ExecuteMsg::PauseDestination { chain_id } => {
            execute_pause_destination(deps, info, chain_id)
        }
        ExecuteMsg::UnpauseDestination { chain_id } => {
            execute_unpause_destination(deps, info, chain_id)
        }
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        BURN_CHECK_REPLY_ID => handle_burn_check_reply(deps.storage, &deps.querier, &env),
        UNWRAP_REPLY_ID => handle_unwrap_reply(deps.storage, msg.result),
        id if id >= MESSAGE_CALL_REPLY_BASE => handle_message_call_reply(msg),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        // Core queries
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::CurrentNonce {} => to_json_binary(&query_current_nonce(deps)?),
        QueryMsg::ComputeId {
            dest_chain_id,
            nonce,
        } => to_json_binary(&query_compute_id(deps, dest_chain_id, nonce)?),

        // Records
        QueryMsg::Transfer { id } => to_json_binary(&query_transfer(deps, id)?),
        QueryMsg::Message { id } => to_json_binary(&query_message(deps, id)?),
        QueryMsg::ReceivedTransfer { id } => to_json_binary(&query_received_transfer(deps, id)?),
        QueryMsg::ReceivedMessage { id } => to_json_binary(&query_received_message(deps, id)?),
        QueryMsg::Delivered { id, channel } => {
            to_json_binary(&query_delivered(deps, id, channel)?)
        }
        QueryMsg::TransferStatus { id } => to_json_binary(&query_transfer_status(deps, id)?),
        QueryMsg::MessageStatus { id } => to_json_binary(&query_message_status(deps, env, id)?),

        // Routing
        QueryMsg::ControllerForChain { chain_id } => {
            to_json_binary(&query_controller_for_chain(deps, chain_id)?)
        }
        QueryMsg::DestinationPaused { chain_id } => {
            to_json_binary(&query_destination_paused(deps, chain_id)?)
        }
        QueryMsg::IsChannel { address } => to_json_binary(&query_is_channel(deps, address)?),
        QueryMsg::Channels { start_after, limit } => {
            to_json_binary(&query_channels(deps, start_after, limit)?)
        }
        QueryMsg::MultiChannelAdapters { start_after, limit } => {
            to_json_binary(&query_multi_channel_adapters(deps, start_after, limit)?)
        }

        // Rate limits
        QueryMsg::RateLimits { channel } => to_json_binary(&query_rate_limits(deps, env, channel)?),
        QueryMsg::MintingCurrentLimit { channel } => to_json_binary(&query_current_limit(
            deps,
            env,
            LimitSide::Minting,
            channel,
        )?),
        QueryMsg::BurningCurrentLimit { channel } => to_json_binary(&query_current_limit(
            deps,
            env,
            LimitSide::Burning,
            channel,
        )?),

        // Roles
        QueryMsg::Managers { start_after, limit } => {
            to_json_binary(&query_managers(deps, start_after, limit)?)
        }
        QueryMsg::Vetoers { start_after, limit } => {
            to_json_binary(&query_vetoers(deps, start_after, limit)?)
        }
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if STATS.may_load(deps.storage)?.is_none() {
        STATS.save(deps.storage, &Stats::default())?;
    }

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
