//! Message handlers.
//!
//! A message is an ordered batch of contract calls. On the destination it
//! becomes executable `message_timelock` seconds after reaching quorum, can be
//! vetoed until then, and expires at the `expires_at` set by the origin.

use cosmwasm_std::{
    Addr, Binary, DepsMut, Env, Event, MessageInfo, Reply, Response, SubMsg, SubMsgResult,
    WasmMsg,
};

use crate::auth::{
    ensure_channel_for_threshold, ensure_not_paused, ensure_vetoer, open_destination,
};
use crate::dispatch::{ensure_route_shape, relay, resolve_route, send_threshold};
use crate::error::ContractError;
use crate::identifier::{bytes32_to_hex, next_id, parse_id};
use crate::msg::Route;
use crate::payload::ControllerPayload;
use crate::quorum::{cancel_message, deliver_message, mark_message_executed};
use crate::state::{
    Call, Message, ReceivedMessage, CONFIG, MESSAGES, MESSAGE_CALL_REPLY_BASE,
    RECEIVED_MESSAGES, STATS,
};

// ============================================================================
// Origin
// ============================================================================

/// Dispatch `calls` to the controller on `dest_chain_id`. Messages carry no
/// value and are not rate limited.
pub fn execute_send_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    calls: Vec<Call>,
    dest_chain_id: u64,
    route: Route,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;

    let dest_controller = open_destination(deps.storage, dest_chain_id)?;
    if calls.is_empty() {
        return Err(ContractError::EmptyCalls);
    }

    let threshold = send_threshold(&config, &route)?;
    let routes = resolve_route(deps.as_ref(), &config, &info.funds, route, threshold)?;

    let (id, nonce) = next_id(deps.storage, dest_chain_id, config.local_chain_id)?;
    let expires_at = env.block.time.seconds().saturating_add(config.message_ttl);
    let message = Message {
        id,
        calls,
        threshold,
        dest_chain_id,
        expires_at,
    };
    MESSAGES.save(deps.storage, &id, &message)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.messages_sent += 1;
    STATS.save(deps.storage, &stats)?;

    let payload = ControllerPayload::from(&message).encode()?;
    let (relay_messages, relay_events) = relay(
        &id,
        dest_chain_id,
        &dest_controller,
        &payload,
        &config.fee_denom,
        &routes,
    )?;

    Ok(Response::new()
        .add_messages(relay_messages)
        .add_events(relay_events)
        .add_attribute("method", "send_message")
        .add_attribute("id", bytes32_to_hex(&id))
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("sender", info.sender.to_string())
        .add_attribute("calls", message.calls.len().to_string())
        .add_attribute("dest_chain_id", dest_chain_id.to_string())
        .add_attribute("threshold", threshold.to_string())
        .add_attribute("expires_at", expires_at.to_string()))
}

/// Dispatch a stored message again.
pub fn execute_resend_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    id: Binary,
    route: Route,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;

    let id = parse_id(&id)?;
    let message = MESSAGES
        .may_load(deps.storage, &id)?
        .ok_or(ContractError::MessageNotFound)?;
    // No dispatch once the destination would refuse delivery
    if env.block.time.seconds() >= message.expires_at {
        return Err(ContractError::MessageExpired {
            expired_at: message.expires_at,
        });
    }
    ensure_route_shape(message.threshold, &route)?;

    let dest_controller = open_destination(deps.storage, message.dest_chain_id)?;
    let routes = resolve_route(
        deps.as_ref(),
        &config,
        &info.funds,
        route,
        message.threshold,
    )?;

    let payload = ControllerPayload::from(&message).encode()?;
    let (relay_messages, relay_events) = relay(
        &id,
        message.dest_chain_id,
        &dest_controller,
        &payload,
        &config.fee_denom,
        &routes,
    )?;

    Ok(Response::new()
        .add_messages(relay_messages)
        .add_events(relay_events)
        .add_attribute("method", "resend_message")
        .add_attribute("id", bytes32_to_hex(&id))
        .add_attribute("channels", routes.len().to_string()))
}

// ============================================================================
// Destination
// ============================================================================

/// Fields of a delivered message payload
pub struct IncomingMessage {
    pub id: [u8; 32],
    pub calls: Vec<Call>,
    pub threshold: u32,
    pub expires_at: u64,
    pub origin_chain_id: u64,
}

/// Count a message delivery from `channel`.
pub fn receive_message(
    deps: DepsMut,
    env: &Env,
    channel: &Addr,
    incoming: IncomingMessage,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let now = env.block.time.seconds();

    let id = incoming.id;
    let existing = RECEIVED_MESSAGES.may_load(deps.storage, &id)?;
    let threshold = existing
        .as_ref()
        .map(|record| record.threshold)
        .unwrap_or(incoming.threshold);
    ensure_channel_for_threshold(deps.as_ref(), &config, channel, threshold)?;

    let expires_at = existing
        .as_ref()
        .map(|record| record.expires_at)
        .unwrap_or(incoming.expires_at);
    if now >= expires_at {
        return Err(ContractError::MessageExpired {
            expired_at: expires_at,
        });
    }
    if existing.is_none() && incoming.calls.is_empty() {
        return Err(ContractError::EmptyCalls);
    }

    let delivery = deliver_message(
        deps.storage,
        &id,
        channel,
        now,
        config.message_timelock,
        ReceivedMessage {
            calls: incoming.calls,
            received_so_far: 0,
            threshold: incoming.threshold,
            origin_chain_id: incoming.origin_chain_id,
            executable_at: None,
            expires_at: incoming.expires_at,
            executed: false,
            cancelled: false,
        },
    )?;

    if existing.is_none() {
        let mut stats = STATS.load(deps.storage)?;
        stats.messages_received += 1;
        STATS.save(deps.storage, &stats)?;
    }

    let id_hex = bytes32_to_hex(&id);
    let record = &delivery.record;
    let mut response = Response::new()
        .add_event(
            Event::new("delivery")
                .add_attribute("id", id_hex.clone())
                .add_attribute("kind", "message")
                .add_attribute("channel", channel.to_string())
                .add_attribute("received_so_far", record.received_so_far.to_string())
                .add_attribute("threshold", record.threshold.to_string()),
        )
        .add_attribute("method", "receive_message")
        .add_attribute("id", id_hex.clone());

    if delivery.quorum_reached {
        let mut event = Event::new("quorum_reached")
            .add_attribute("id", id_hex)
            .add_attribute("kind", "message");
        if let Some(executable_at) = record.executable_at {
            event = event.add_attribute("executable_at", executable_at.to_string());
        }
        response = response.add_event(event);
    }
    Ok(response)
}

/// Run every call of a message. The first failing call aborts the whole
/// message through its reply, so either all calls land or none do.
///
/// Authorization: Anyone
pub fn execute_execute_message(
    deps: DepsMut,
    env: Env,
    id: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;

    let id = parse_id(&id)?;
    let record = mark_message_executed(deps.storage, &id, env.block.time.seconds())?;

    let mut calls = Vec::with_capacity(record.calls.len());
    for (index, call) in record.calls.iter().enumerate() {
        let target = deps.api.addr_validate(&call.target)?;
        calls.push(SubMsg::reply_on_error(
            WasmMsg::Execute {
                contract_addr: target.to_string(),
                msg: call.msg.clone(),
                funds: vec![],
            },
            MESSAGE_CALL_REPLY_BASE + index as u64,
        ));
    }

    let mut stats = STATS.load(deps.storage)?;
    stats.messages_executed += 1;
    STATS.save(deps.storage, &stats)?;

    let id_hex = bytes32_to_hex(&id);
    Ok(Response::new()
        .add_submessages(calls)
        .add_event(
            Event::new("message_executed")
                .add_attribute("id", id_hex.clone())
                .add_attribute("calls", record.calls.len().to_string())
                .add_attribute("origin_chain_id", record.origin_chain_id.to_string()),
        )
        .add_attribute("method", "execute_message")
        .add_attribute("id", id_hex))
}

/// Veto a received message.
///
/// Authorization: Vetoer
pub fn execute_cancel_message(
    deps: DepsMut,
    info: MessageInfo,
    id: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;
    ensure_vetoer(deps.storage, &info.sender)?;

    let id = parse_id(&id)?;
    cancel_message(deps.storage, &id)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.messages_cancelled += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_attribute("method", "cancel_message")
        .add_attribute("id", bytes32_to_hex(&id))
        .add_attribute("vetoer", info.sender.to_string()))
}

/// A call of an executing message failed: abort the whole message.
pub fn handle_message_call_reply(reply: Reply) -> Result<Response, ContractError> {
    let index = reply.id - MESSAGE_CALL_REPLY_BASE;
    match reply.result {
        SubMsgResult::Err(reason) => Err(ContractError::MessageCallFailed { index, reason }),
        SubMsgResult::Ok(_) => Ok(Response::new()),
    }
}
