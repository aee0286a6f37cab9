use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Channel already registered: {channel}")]
    ChannelAlreadyRegistered { channel: String },

    #[error("Channel not registered: {channel}")]
    ChannelNotRegistered { channel: String },
}
