use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;

pub use common::IsAuthorizedChannelResponse;

#[cw_serde]
pub struct InstantiateMsg {
    /// Admin who can add/remove channels
    pub admin: String,
    /// Initial set of authorized channel adapters
    pub channels: Vec<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Admin: authorize a channel adapter
    AddChannel { address: String },
    /// Admin: revoke a channel adapter
    RemoveChannel { address: String },
    /// Admin: hand the registry to a new admin
    UpdateAdmin { admin: String },
}

/// `IsAuthorizedChannel` matches `common::RegistryQueryMsg`, so controllers
/// can query the registry with the shared type.
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(IsAuthorizedChannelResponse)]
    IsAuthorizedChannel { address: String },
    /// Returns authorized channels, paginated by address
    #[returns(ChannelsResponse)]
    Channels {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Returns the admin address
    #[returns(AdminResponse)]
    Admin {},
}

#[cw_serde]
pub struct ChannelsResponse {
    pub channels: Vec<Addr>,
}

#[cw_serde]
pub struct AdminResponse {
    pub admin: String,
}
