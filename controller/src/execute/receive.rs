//! Entry point for channel adapters.

use cosmwasm_std::{Binary, DepsMut, Env, MessageInfo, Response};

use crate::auth::{ensure_not_paused, ensure_origin_controller};
use crate::error::ContractError;
use crate::execute::message::{receive_message, IncomingMessage};
use crate::execute::transfer::{receive_transfer, IncomingTransfer};
use crate::identifier::parse_id;
use crate::payload::ControllerPayload;
use crate::state::CONFIG;

/// Accept a payload relayed by `info.sender`.
///
/// The payload must come from the controller registered for
/// `origin_chain_id`. Channel authorization depends on the record's
/// threshold and is checked by the transfer and message handlers.
pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    payload: Binary,
    origin_chain_id: u64,
    origin_sender: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;
    ensure_origin_controller(deps.storage, origin_chain_id, &origin_sender)?;

    match ControllerPayload::decode(&payload)? {
        ControllerPayload::Transfer {
            id,
            recipient,
            amount,
            unwrap,
            threshold,
        } => receive_transfer(
            deps,
            &env,
            &info.sender,
            IncomingTransfer {
                id: parse_id(&id)?,
                recipient,
                amount,
                unwrap,
                threshold,
                origin_chain_id,
            },
        ),
        ControllerPayload::Message {
            id,
            calls,
            threshold,
            expires_at,
        } => receive_message(
            deps,
            &env,
            &info.sender,
            IncomingMessage {
                id: parse_id(&id)?,
                calls,
                threshold,
                expires_at,
                origin_chain_id,
            },
        ),
    }
}
