//! Yield strategy interface for lock/release controllers.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use cw20::Cw20ReceiveMsg;

#[cw_serde]
pub enum StrategyExecuteMsg {
    /// Deposits arrive as a CW20 `Send` carrying `StrategyHookMsg::Deposit`
    Receive(Cw20ReceiveMsg),
    /// Return `amount` of principal to the caller
    Withdraw { amount: Uint128 },
}

#[cw_serde]
pub enum StrategyHookMsg {
    Deposit {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum StrategyQueryMsg {
    /// Principal currently deposited by `owner`
    #[returns(PrincipalResponse)]
    Principal { owner: String },
}

#[cw_serde]
pub struct PrincipalResponse {
    pub principal: Uint128,
}
