//! Dispatcher
//!
//! Fans one encoded payload out to the selected channel adapters. Validation
//! happens up front so a call either dispatches to every channel or fails
//! before any state is touched:
//! - `channels`, `fees` and `options` have equal length
//! - no channel appears twice (a duplicate would count as two quorum votes)
//! - every channel is allowed on the path implied by the threshold
//! - the attached native funds equal the sum of the per-channel fees

use cosmwasm_std::{
    to_json_binary, Addr, Binary, Coin, CosmosMsg, Deps, Event, StdError, StdResult, Uint128,
    WasmMsg,
};

use common::AdapterExecuteMsg;

use crate::auth::ensure_channel_for_threshold;
use crate::error::ContractError;
use crate::identifier::bytes32_to_hex;
use crate::msg::Route;
use crate::state::Config;

/// One validated channel of a dispatch
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelRoute {
    pub channel: Addr,
    pub fee: Uint128,
    pub options: Binary,
}

/// Quorum threshold of a new send: 1 for a single channel, `min_channels`
/// for a multi-channel send, which must name at least that many adapters.
pub fn send_threshold(config: &Config, route: &Route) -> Result<u32, ContractError> {
    match route {
        Route::Single { .. } => Ok(1),
        Route::Multi { channels, .. } => {
            let got = channels.len() as u32;
            if got < config.min_channels {
                return Err(ContractError::InsufficientChannels {
                    got,
                    required: config.min_channels,
                });
            }
            Ok(config.min_channels)
        }
    }
}

/// A resend must use the same single/multi path as the original send.
pub fn ensure_route_shape(threshold: u32, route: &Route) -> Result<(), ContractError> {
    if route.is_multi() != (threshold > 1) {
        return Err(ContractError::ResendShapeMismatch {
            threshold,
            channels: route.channel_count() as u32,
        });
    }
    Ok(())
}

/// Validate a route for a record with the given `threshold`.
pub fn resolve_route(
    deps: Deps,
    config: &Config,
    funds: &[Coin],
    route: Route,
    threshold: u32,
) -> Result<Vec<ChannelRoute>, ContractError> {
    let (channels, fees, options) = route.into_parts();
    ensure_lengths(channels.len(), fees.len(), options.len())?;
    if channels.is_empty() {
        return Err(ContractError::InsufficientChannels {
            got: 0,
            required: 1,
        });
    }

    let channels = channels
        .iter()
        .map(|channel| deps.api.addr_validate(channel))
        .collect::<StdResult<Vec<Addr>>>()?;
    ensure_unique(&channels)?;
    for channel in &channels {
        ensure_channel_for_threshold(deps, config, channel, threshold)?;
    }
    ensure_fee_total(funds, &config.fee_denom, &fees)?;

    Ok(channels
        .into_iter()
        .zip(fees)
        .zip(options)
        .map(|((channel, fee), options)| ChannelRoute {
            channel,
            fee,
            options,
        })
        .collect())
}

pub fn ensure_lengths(channels: usize, fees: usize, options: usize) -> Result<(), ContractError> {
    if channels != fees || channels != options {
        return Err(ContractError::ArrayLengthMismatch {
            reason: format!(
                "{} channels, {} fees, {} options",
                channels, fees, options
            ),
        });
    }
    Ok(())
}

/// Pairwise duplicate check; channel lists are short.
pub fn ensure_unique(channels: &[Addr]) -> Result<(), ContractError> {
    for (i, channel) in channels.iter().enumerate() {
        if channels[i + 1..].contains(channel) {
            return Err(ContractError::DuplicateChannel {
                channel: channel.to_string(),
            });
        }
    }
    Ok(())
}

/// The attached funds must be exactly the fee total, in the fee denom.
pub fn ensure_fee_total(
    funds: &[Coin],
    fee_denom: &str,
    fees: &[Uint128],
) -> Result<Uint128, ContractError> {
    let expected = fees
        .iter()
        .try_fold(Uint128::zero(), |acc, fee| acc.checked_add(*fee))
        .map_err(StdError::from)?;

    let mut attached = Uint128::zero();
    for coin in funds {
        if coin.denom != fee_denom {
            return Err(ContractError::InvalidAmount {
                reason: format!("unexpected fee denom {}", coin.denom),
            });
        }
        attached = attached.checked_add(coin.amount).map_err(StdError::from)?;
    }

    if attached != expected {
        return Err(ContractError::FeeMismatch {
            expected,
            got: attached,
        });
    }
    Ok(expected)
}

/// Build one adapter `Dispatch` and one `relay` event per channel.
pub fn relay(
    id: &[u8; 32],
    dest_chain_id: u64,
    dest_controller: &str,
    payload: &Binary,
    fee_denom: &str,
    routes: &[ChannelRoute],
) -> StdResult<(Vec<CosmosMsg>, Vec<Event>)> {
    let id_hex = bytes32_to_hex(id);
    let mut messages = Vec::with_capacity(routes.len());
    let mut events = Vec::with_capacity(routes.len());

    for route in routes {
        let funds = if route.fee.is_zero() {
            vec![]
        } else {
            vec![Coin {
                denom: fee_denom.to_string(),
                amount: route.fee,
            }]
        };

        messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: route.channel.to_string(),
            msg: to_json_binary(&AdapterExecuteMsg::Dispatch {
                dest_chain_id,
                dest_address: dest_controller.to_string(),
                options: route.options.clone(),
                payload: payload.clone(),
            })?,
            funds,
        }));

        events.push(
            Event::new("relay")
                .add_attribute("id", id_hex.clone())
                .add_attribute("channel", route.channel.to_string())
                .add_attribute("dest_chain_id", dest_chain_id.to_string())
                .add_attribute("fee", route.fee.to_string()),
        );
    }

    Ok((messages, events))
}
