//! Role and channel authorization checks shared by the handlers.

use cosmwasm_std::{Addr, Deps, Storage};

use common::{IsAuthorizedChannelResponse, RegistryQueryMsg};

use crate::error::ContractError;
use crate::state::{
    Config, CHANNELS, CONTROLLERS, MANAGERS, MULTI_CHANNEL_ADAPTERS, PAUSED_DESTINATIONS, VETOERS,
};

pub fn ensure_admin(config: &Config, sender: &Addr) -> Result<(), ContractError> {
    if *sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Managers and the admin may tune rate limits and destination pauses.
pub fn ensure_manager(
    storage: &dyn Storage,
    config: &Config,
    sender: &Addr,
) -> Result<(), ContractError> {
    let is_manager = MANAGERS.may_load(storage, sender)?.unwrap_or(false);
    if !is_manager && *sender != config.admin {
        return Err(ContractError::UnauthorizedManager);
    }
    Ok(())
}

pub fn ensure_vetoer(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    if !VETOERS.may_load(storage, sender)?.unwrap_or(false) {
        return Err(ContractError::NotVetoer);
    }
    Ok(())
}

pub fn ensure_not_paused(config: &Config) -> Result<(), ContractError> {
    if config.paused {
        return Err(ContractError::ControllerPaused);
    }
    Ok(())
}

/// Counterpart controller for `chain_id`, failing if the destination is
/// unregistered or paused. Checked independently of the global pause.
pub fn open_destination(storage: &dyn Storage, chain_id: u64) -> Result<String, ContractError> {
    let controller = CONTROLLERS
        .may_load(storage, chain_id)?
        .ok_or(ContractError::ChainNotSupported { chain_id })?;

    if PAUSED_DESTINATIONS
        .may_load(storage, chain_id)?
        .unwrap_or(false)
    {
        return Err(ContractError::DestinationPaused { chain_id });
    }
    Ok(controller)
}

/// Verify that `sender` is the registered controller of `origin_chain_id`.
pub fn ensure_origin_controller(
    storage: &dyn Storage,
    origin_chain_id: u64,
    sender: &str,
) -> Result<(), ContractError> {
    let registered = CONTROLLERS.may_load(storage, origin_chain_id)?;
    if registered.as_deref() != Some(sender) {
        return Err(ContractError::UnknownOriginController {
            chain_id: origin_chain_id,
            sender: sender.to_string(),
        });
    }
    Ok(())
}

/// Single-channel authorization: the shared registry when configured,
/// otherwise the local whitelist.
pub fn is_authorized_channel(
    deps: Deps,
    config: &Config,
    channel: &Addr,
) -> Result<bool, ContractError> {
    match &config.registry {
        Some(registry) => {
            let res: IsAuthorizedChannelResponse = deps.querier.query_wasm_smart(
                registry,
                &RegistryQueryMsg::IsAuthorizedChannel {
                    address: channel.to_string(),
                },
            )?;
            Ok(res.authorized)
        }
        None => Ok(CHANNELS.may_load(deps.storage, channel)?.unwrap_or(false)),
    }
}

pub fn is_multi_channel_adapter(
    storage: &dyn Storage,
    channel: &Addr,
) -> Result<bool, ContractError> {
    Ok(MULTI_CHANNEL_ADAPTERS
        .may_load(storage, channel)?
        .unwrap_or(false))
}

/// Check a channel against the path implied by `threshold`.
pub fn ensure_channel_for_threshold(
    deps: Deps,
    config: &Config,
    channel: &Addr,
    threshold: u32,
) -> Result<(), ContractError> {
    match threshold {
        0 => Err(ContractError::InvalidThreshold {
            reason: "threshold must be at least 1".to_string(),
        }),
        1 => {
            if !is_authorized_channel(deps, config, channel)? {
                return Err(ContractError::UnauthorizedChannel {
                    channel: channel.to_string(),
                });
            }
            Ok(())
        }
        _ => {
            if !is_multi_channel_adapter(deps.storage, channel)? {
                return Err(ContractError::NotMultiChannelAdapter {
                    channel: channel.to_string(),
                });
            }
            Ok(())
        }
    }
}
