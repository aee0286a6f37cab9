use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response,
    StdResult,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::msg::{
    AdminResponse, ChannelsResponse, ExecuteMsg, InstantiateMsg, IsAuthorizedChannelResponse,
    QueryMsg,
};
use crate::state::{ADMIN, CHANNELS, CONTRACT_NAME, CONTRACT_VERSION};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    ADMIN.save(deps.storage, &admin)?;

    for channel in &msg.channels {
        let channel = deps.api.addr_validate(channel)?;
        CHANNELS.save(deps.storage, &channel, &true)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", admin)
        .add_attribute("channel_count", msg.channels.len().to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AddChannel { address } => execute_add_channel(deps, info, address),
        ExecuteMsg::RemoveChannel { address } => execute_remove_channel(deps, info, address),
        ExecuteMsg::UpdateAdmin { admin } => execute_update_admin(deps, info, admin),
    }
}

fn ensure_admin(deps: Deps, info: &MessageInfo) -> Result<(), ContractError> {
    let admin = ADMIN.load(deps.storage)?;
    if info.sender != admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

fn execute_add_channel(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.as_ref(), &info)?;

    let channel = deps.api.addr_validate(&address)?;
    if CHANNELS.has(deps.storage, &channel) {
        return Err(ContractError::ChannelAlreadyRegistered { channel: address });
    }
    CHANNELS.save(deps.storage, &channel, &true)?;

    Ok(Response::new()
        .add_attribute("method", "add_channel")
        .add_attribute("channel", channel))
}

fn execute_remove_channel(
    deps: DepsMut,
    info: MessageInfo,
    address: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.as_ref(), &info)?;

    let channel = deps.api.addr_validate(&address)?;
    if !CHANNELS.has(deps.storage, &channel) {
        return Err(ContractError::ChannelNotRegistered { channel: address });
    }
    CHANNELS.remove(deps.storage, &channel);

    Ok(Response::new()
        .add_attribute("method", "remove_channel")
        .add_attribute("channel", channel))
}

fn execute_update_admin(
    deps: DepsMut,
    info: MessageInfo,
    admin: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.as_ref(), &info)?;

    let admin = deps.api.addr_validate(&admin)?;
    ADMIN.save(deps.storage, &admin)?;

    Ok(Response::new()
        .add_attribute("method", "update_admin")
        .add_attribute("admin", admin))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::IsAuthorizedChannel { address } => {
            to_json_binary(&query_is_authorized_channel(deps, address)?)
        }
        QueryMsg::Channels { start_after, limit } => {
            to_json_binary(&query_channels(deps, start_after, limit)?)
        }
        QueryMsg::Admin {} => to_json_binary(&query_admin(deps)?),
    }
}

/// Unknown or malformed addresses are simply not authorized.
fn query_is_authorized_channel(
    deps: Deps,
    address: String,
) -> StdResult<IsAuthorizedChannelResponse> {
    let authorized = match deps.api.addr_validate(&address) {
        Ok(channel) => CHANNELS.may_load(deps.storage, &channel)?.unwrap_or(false),
        Err(_) => false,
    };
    Ok(IsAuthorizedChannelResponse { authorized })
}

fn query_channels(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<ChannelsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after
        .map(|s| deps.api.addr_validate(&s))
        .transpose()?
        .map(|addr| Bound::ExclusiveRaw(addr.as_bytes().to_vec()));

    let channels = CHANNELS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(channel, _)| channel))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ChannelsResponse { channels })
}

fn query_admin(deps: Deps) -> StdResult<AdminResponse> {
    let admin = ADMIN.load(deps.storage)?;
    Ok(AdminResponse {
        admin: admin.to_string(),
    })
}
