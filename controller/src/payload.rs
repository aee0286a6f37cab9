//! Payloads carried by channel adapters between controllers.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{from_json, to_json_binary, Binary, StdResult, Uint128};

use crate::state::{Call, Message, Transfer};

#[cw_serde]
pub enum ControllerPayload {
    Transfer {
        id: Binary,
        recipient: String,
        amount: Uint128,
        unwrap: bool,
        threshold: u32,
    },
    Message {
        id: Binary,
        calls: Vec<Call>,
        threshold: u32,
        expires_at: u64,
    },
}

impl ControllerPayload {
    pub fn encode(&self) -> StdResult<Binary> {
        to_json_binary(self)
    }

    pub fn decode(payload: &Binary) -> StdResult<Self> {
        from_json(payload.as_slice())
    }
}

impl From<&Transfer> for ControllerPayload {
    fn from(transfer: &Transfer) -> Self {
        ControllerPayload::Transfer {
            id: Binary::from(transfer.id.to_vec()),
            recipient: transfer.recipient.clone(),
            amount: transfer.amount,
            unwrap: transfer.unwrap,
            threshold: transfer.threshold,
        }
    }
}

impl From<&Message> for ControllerPayload {
    fn from(message: &Message) -> Self {
        ControllerPayload::Message {
            id: Binary::from(message.id.to_vec()),
            calls: message.calls.clone(),
            threshold: message.threshold,
            expires_at: message.expires_at,
        }
    }
}
