//! Channel registry interface.

use cosmwasm_schema::{cw_serde, QueryResponses};

#[cw_serde]
#[derive(QueryResponses)]
pub enum RegistryQueryMsg {
    /// Whether `address` is an allowed channel adapter
    #[returns(IsAuthorizedChannelResponse)]
    IsAuthorizedChannel { address: String },
}

#[cw_serde]
pub struct IsAuthorizedChannelResponse {
    pub authorized: bool,
}
