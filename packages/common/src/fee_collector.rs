//! Fee collector interface for the multi-channel path.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

#[cw_serde]
pub enum FeeCollectorExecuteMsg {
    /// Notifies the collector that `amount` of `token` was transferred to it
    Collect { token: String, amount: Uint128 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum FeeCollectorQueryMsg {
    #[returns(QuoteResponse)]
    Quote { amount: Uint128 },
}

#[cw_serde]
pub struct QuoteResponse {
    pub fee: Uint128,
}
