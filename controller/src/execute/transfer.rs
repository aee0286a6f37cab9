//! Transfer handlers.
//!
//! Origin side: `SendTransfer`, `SendTransferMulti` and `ResendTransfer`.
//! Destination side: transfer deliveries from `Receive` and `ExecuteTransfer`.

use cosmwasm_std::{
    to_json_binary, Addr, Binary, CosmosMsg, DepsMut, Env, Event, MessageInfo, Order, Response,
    StdResult, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use common::fee_collector::{FeeCollectorExecuteMsg, FeeCollectorQueryMsg, QuoteResponse};

use crate::auth::{ensure_channel_for_threshold, ensure_not_paused, open_destination};
use crate::backing::{backing_for, Payout};
use crate::dispatch::{ensure_route_shape, relay, resolve_route, send_threshold};
use crate::error::ContractError;
use crate::identifier::{bytes32_to_hex, next_id, parse_id};
use crate::msg::Route;
use crate::payload::ControllerPayload;
use crate::quorum::{deliver_transfer, mark_transfer_executed};
use crate::rate_limit::{consume_route_limits, LimitSide};
use crate::state::{
    ReceivedTransfer, Transfer, CONFIG, DELIVERIES, RECEIVED_TRANSFERS, STATS, TRANSFERS,
};

// ============================================================================
// Origin
// ============================================================================

/// Lock or burn `amount` from the sender and dispatch it to `dest_chain_id`.
///
/// The id is allocated and the record stored before any dispatch message is
/// built. On the multi-channel path a configured fee collector takes its
/// quoted fee out of `amount` and the rest is bridged.
#[allow(clippy::too_many_arguments)]
pub fn execute_send_transfer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
    unwrap: bool,
    dest_chain_id: u64,
    route: Route,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;

    let dest_controller = open_destination(deps.storage, dest_chain_id)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Amount must be greater than zero".to_string(),
        });
    }
    if recipient.trim().is_empty() {
        return Err(ContractError::InvalidAddress {
            reason: "Recipient cannot be empty".to_string(),
        });
    }
    let backing = backing_for(&config)?;

    let threshold = send_threshold(&config, &route)?;
    let routes = resolve_route(deps.as_ref(), &config, &info.funds, route, threshold)?;

    // Fee collector cut (multi-channel only)
    let mut fee_messages: Vec<CosmosMsg> = vec![];
    let mut protocol_fee = Uint128::zero();
    if threshold > 1 {
        if let Some(collector) = &config.fee_collector {
            let quote: QuoteResponse = deps
                .querier
                .query_wasm_smart(collector, &FeeCollectorQueryMsg::Quote { amount })?;
            if quote.fee >= amount {
                return Err(ContractError::InvalidAmount {
                    reason: format!("Fee {} leaves nothing to bridge", quote.fee),
                });
            }
            if !quote.fee.is_zero() {
                fee_messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
                    contract_addr: backing.token().to_string(),
                    msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
                        owner: info.sender.to_string(),
                        recipient: collector.to_string(),
                        amount: quote.fee,
                    })?,
                    funds: vec![],
                }));
                fee_messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
                    contract_addr: collector.to_string(),
                    msg: to_json_binary(&FeeCollectorExecuteMsg::Collect {
                        token: backing.token().to_string(),
                        amount: quote.fee,
                    })?,
                    funds: vec![],
                }));
            }
            protocol_fee = quote.fee;
        }
    }
    let bridged = amount - protocol_fee;

    let channels: Vec<&str> = routes.iter().map(|r| r.channel.as_str()).collect();
    consume_route_limits(
        deps.storage,
        LimitSide::Burning,
        &channels,
        threshold > 1,
        env.block.time.seconds(),
        bridged,
    )?;

    let (id, nonce) = next_id(deps.storage, dest_chain_id, config.local_chain_id)?;
    let transfer = Transfer {
        id,
        recipient: recipient.clone(),
        amount: bridged,
        unwrap,
        threshold,
        dest_chain_id,
    };
    TRANSFERS.save(deps.storage, &id, &transfer)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.transfers_sent += 1;
    STATS.save(deps.storage, &stats)?;

    let lock_messages =
        backing.lock_or_burn(deps.storage, &deps.querier, &env, &info.sender, bridged)?;
    let payload = ControllerPayload::from(&transfer).encode()?;
    let (relay_messages, relay_events) = relay(
        &id,
        dest_chain_id,
        &dest_controller,
        &payload,
        &config.fee_denom,
        &routes,
    )?;

    Ok(Response::new()
        .add_submessages(lock_messages)
        .add_messages(fee_messages)
        .add_messages(relay_messages)
        .add_events(relay_events)
        .add_attribute("method", "send_transfer")
        .add_attribute("id", bytes32_to_hex(&id))
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("sender", info.sender.to_string())
        .add_attribute("recipient", recipient)
        .add_attribute("amount", bridged.to_string())
        .add_attribute("protocol_fee", protocol_fee.to_string())
        .add_attribute("dest_chain_id", dest_chain_id.to_string())
        .add_attribute("threshold", threshold.to_string()))
}

/// Dispatch a stored transfer again, e.g. after a channel dropped it.
///
/// Authorization: Anyone (the caller pays the channel fees)
pub fn execute_resend_transfer(
    deps: DepsMut,
    info: MessageInfo,
    id: Binary,
    route: Route,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;

    let id = parse_id(&id)?;
    let transfer = TRANSFERS
        .may_load(deps.storage, &id)?
        .ok_or(ContractError::TransferNotFound)?;
    ensure_route_shape(transfer.threshold, &route)?;

    let dest_controller = open_destination(deps.storage, transfer.dest_chain_id)?;
    let routes = resolve_route(
        deps.as_ref(),
        &config,
        &info.funds,
        route,
        transfer.threshold,
    )?;

    let payload = ControllerPayload::from(&transfer).encode()?;
    let (relay_messages, relay_events) = relay(
        &id,
        transfer.dest_chain_id,
        &dest_controller,
        &payload,
        &config.fee_denom,
        &routes,
    )?;

    Ok(Response::new()
        .add_messages(relay_messages)
        .add_events(relay_events)
        .add_attribute("method", "resend_transfer")
        .add_attribute("id", bytes32_to_hex(&id))
        .add_attribute("channels", routes.len().to_string()))
}

// ============================================================================
// Destination
// ============================================================================

/// Fields of a delivered transfer payload
pub struct IncomingTransfer {
    pub id: [u8; 32],
    pub recipient: String,
    pub amount: Uint128,
    pub unwrap: bool,
    pub threshold: u32,
    pub origin_chain_id: u64,
}

/// Count a delivery from `channel`. Single-channel transfers pay out in the
/// same call; multi-channel transfers wait for `ExecuteTransfer`.
pub fn receive_transfer(
    deps: DepsMut,
    env: &Env,
    channel: &Addr,
    incoming: IncomingTransfer,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    // Rejects transfers on message-only controllers before anything is recorded
    backing_for(&config)?;

    let id = incoming.id;
    let existing = RECEIVED_TRANSFERS.may_load(deps.storage, &id)?;
    let threshold = existing
        .as_ref()
        .map(|record| record.threshold)
        .unwrap_or(incoming.threshold);
    ensure_channel_for_threshold(deps.as_ref(), &config, channel, threshold)?;

    if existing.is_none() && incoming.amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Amount must be greater than zero".to_string(),
        });
    }

    let delivery = deliver_transfer(
        deps.storage,
        &id,
        channel,
        ReceivedTransfer {
            recipient: incoming.recipient,
            amount: incoming.amount,
            unwrap: incoming.unwrap,
            received_so_far: 0,
            threshold: incoming.threshold,
            origin_chain_id: incoming.origin_chain_id,
            executed: false,
        },
    )?;

    if existing.is_none() {
        let mut stats = STATS.load(deps.storage)?;
        stats.transfers_received += 1;
        STATS.save(deps.storage, &stats)?;
    }

    let id_hex = bytes32_to_hex(&id);
    let record = &delivery.record;
    let mut response = Response::new()
        .add_event(
            Event::new("delivery")
                .add_attribute("id", id_hex.clone())
                .add_attribute("kind", "transfer")
                .add_attribute("channel", channel.to_string())
                .add_attribute("received_so_far", record.received_so_far.to_string())
                .add_attribute("threshold", record.threshold.to_string()),
        )
        .add_attribute("method", "receive_transfer")
        .add_attribute("id", id_hex.clone());

    if !delivery.quorum_reached {
        return Ok(response);
    }
    response = response.add_event(
        Event::new("quorum_reached")
            .add_attribute("id", id_hex)
            .add_attribute("kind", "transfer"),
    );

    if record.threshold == 1 {
        let payout = pay_out(deps, env, &id)?;
        response = response
            .add_submessages(payout.messages)
            .add_events(payout.events);
    }
    Ok(response)
}

/// Pay out a multi-channel transfer once quorum is reached.
///
/// Authorization: Anyone
pub fn execute_execute_transfer(
    deps: DepsMut,
    env: Env,
    id: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;

    let id = parse_id(&id)?;
    let payout = pay_out(deps, &env, &id)?;

    Ok(Response::new()
        .add_submessages(payout.messages)
        .add_events(payout.events)
        .add_attribute("method", "execute_transfer")
        .add_attribute("id", bytes32_to_hex(&id)))
}

/// Mark the transfer executed, consume minting capacity of every delivering
/// channel and build the payout. Everything reverts together if any step fails.
fn pay_out(deps: DepsMut, env: &Env, id: &[u8; 32]) -> Result<Payout, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let backing = backing_for(&config)?;

    let record = mark_transfer_executed(deps.storage, id)?;
    let recipient = deps.api.addr_validate(&record.recipient)?;

    let delivered = DELIVERIES
        .prefix(id.as_slice())
        .keys(deps.storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<Addr>>>()?;
    let channels: Vec<&str> = delivered.iter().map(Addr::as_str).collect();
    consume_route_limits(
        deps.storage,
        LimitSide::Minting,
        &channels,
        record.threshold > 1,
        env.block.time.seconds(),
        record.amount,
    )?;

    let mut payout = backing.release_or_mint(
        deps.storage,
        &deps.querier,
        env,
        &recipient,
        record.amount,
        record.unwrap,
    )?;

    let mut stats = STATS.load(deps.storage)?;
    stats.transfers_executed += 1;
    STATS.save(deps.storage, &stats)?;

    payout.events.push(
        Event::new("transfer_executed")
            .add_attribute("id", bytes32_to_hex(id))
            .add_attribute("recipient", recipient.to_string())
            .add_attribute("amount", record.amount.to_string())
            .add_attribute("origin_chain_id", record.origin_chain_id.to_string()),
    );
    Ok(payout)
}
