//! Admin operations handlers.
//!
//! This module handles:
//! - Pause/unpause contract
//! - Manager and vetoer roles
//! - Moving escrow into the yield strategy
//! - Asset recovery (emergency)

use cosmwasm_std::{to_json_binary, DepsMut, MessageInfo, Response, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;

use common::strategy::StrategyHookMsg;
use common::{Asset, AssetInfo};

use crate::auth::ensure_admin;
use crate::error::ContractError;
use crate::state::{BackingMode, CONFIG, MANAGERS, VETOERS};

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the contract (stops sends, deliveries and execution).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "pause"))
}

/// Unpause the contract.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "unpause"))
}

// ============================================================================
// Roles
// ============================================================================

pub fn execute_add_manager(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let manager = deps.api.addr_validate(&address)?;
    MANAGERS.save(deps.storage, &manager, &true)?;

    Ok(Response::new()
        .add_attribute("method", "add_manager")
        .add_attribute("manager", address))
}

pub fn execute_remove_manager(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let manager = deps.api.addr_validate(&address)?;
    MANAGERS.remove(deps.storage, &manager);

    Ok(Response::new()
        .add_attribute("method", "remove_manager")
        .add_attribute("manager", address))
}

pub fn execute_add_vetoer(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let vetoer = deps.api.addr_validate(&address)?;
    VETOERS.save(deps.storage, &vetoer, &true)?;

    Ok(Response::new()
        .add_attribute("method", "add_vetoer")
        .add_attribute("vetoer", address))
}

pub fn execute_remove_vetoer(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let vetoer = deps.api.addr_validate(&address)?;
    VETOERS.remove(deps.storage, &vetoer);

    Ok(Response::new()
        .add_attribute("method", "remove_vetoer")
        .add_attribute("vetoer", address))
}

// ============================================================================
// Yield Strategy
// ============================================================================

/// Deposit `amount` of escrowed tokens into the yield strategy.
pub fn execute_invest_in_strategy(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    let (token, strategy) = match &config.backing {
        BackingMode::LockRelease {
            token,
            strategy: Some(strategy),
        } => (token, strategy),
        _ => return Err(ContractError::StrategyNotConfigured),
    };
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Amount must be greater than zero".to_string(),
        });
    }

    let deposit = WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Send {
            contract: strategy.to_string(),
            amount,
            msg: to_json_binary(&StrategyHookMsg::Deposit {})?,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(deposit)
        .add_attribute("method", "invest_in_strategy")
        .add_attribute("strategy", strategy.to_string())
        .add_attribute("amount", amount.to_string()))
}

// ============================================================================
// Asset Recovery
// ============================================================================

/// Recover assets from the contract (admin only, requires paused state).
///
/// This is an emergency function to recover stuck assets. Escrowed balances
/// of a lock/release controller are recoverable too; the admin must
/// reconcile the bridge supply separately.
pub fn execute_recover_asset(
    deps: DepsMut,
    info: MessageInfo,
    asset: AssetInfo,
    amount: Uint128,
    recipient: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info.sender)?;

    if !config.paused {
        return Err(ContractError::RecoveryNotAvailable);
    }

    let recipient_addr = deps.api.addr_validate(&recipient)?;
    let message = Asset {
        info: asset.clone(),
        amount,
    }
    .transfer_msg(&recipient_addr)?;

    Ok(Response::new()
        .add_message(message)
        .add_attribute("method", "recover_asset")
        .add_attribute("asset", asset.identifier())
        .add_attribute("recipient", recipient)
        .add_attribute("amount", amount.to_string()))
}
