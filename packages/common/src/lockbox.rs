//! Lockbox interface used by the unwrap path.
//!
//! Wrapped tokens are sent to the lockbox with a CW20 `Send`; the hook message
//! asks it to release the underlying asset to `recipient`.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cw20::Cw20ReceiveMsg;

use crate::asset::AssetInfo;

#[cw_serde]
pub enum LockboxExecuteMsg {
    Receive(Cw20ReceiveMsg),
}

/// Hook carried inside the CW20 `Send`
#[cw_serde]
pub enum LockboxHookMsg {
    Withdraw { recipient: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum LockboxQueryMsg {
    /// Underlying asset released by the lockbox
    #[returns(UnderlyingResponse)]
    Underlying {},
}

#[cw_serde]
pub struct UnderlyingResponse {
    pub asset: AssetInfo,
}
