//! Shared cw-multi-test harness for the controller integration tests.
//!
//! Two mint/burn controllers (chain 1 and chain 2) live in one `App`. Mock
//! adapters loop a dispatch straight into the destination controller's
//! `Receive`, so a send on chain 1 is delivered on chain 2 in the same
//! transaction unless the adapter is told to drop it.

#![allow(dead_code)]

use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, Binary, Deps, DepsMut, Empty, Env,
    MessageInfo, Response, StdError, StdResult, Uint128, WasmMsg,
};
use cw20::{Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};

use controller::msg::{BackingModeMsg, ExecuteMsg, InstantiateMsg, QueryMsg};
use controller::state::{Call, TokenStandard};

pub const ADMIN: &str = "terra1admin";
pub const USER: &str = "terra1user";
pub const RECIPIENT: &str = "terra1recipient";
pub const MANAGER: &str = "terra1manager";
pub const VETOER: &str = "terra1vetoer";
pub const FEE_DENOM: &str = "uluna";

pub const CHAIN_A: u64 = 1;
pub const CHAIN_B: u64 = 2;

pub const USER_BALANCE: u128 = 1_000_000_000;
pub const DAILY_LIMIT: u128 = 86_400_000;
pub const ONE_DAY: u64 = 86_400;

// ============================================================================
// Contract Wrappers
// ============================================================================

pub fn contract_controller() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        controller::contract::execute,
        controller::contract::instantiate,
        controller::contract::query,
    )
    .with_reply(controller::contract::reply)
    .with_migrate(controller::contract::migrate);
    Box::new(contract)
}

pub fn contract_cw20() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

pub fn contract_registry() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        registry::contract::execute,
        registry::contract::instantiate,
        registry::contract::query,
    );
    Box::new(contract)
}

pub fn contract_adapter() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        mock_adapter::execute,
        mock_adapter::instantiate,
        mock_adapter::query,
    ))
}

pub fn contract_lockbox() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        mock_lockbox::execute,
        mock_lockbox::instantiate,
        mock_lockbox::query,
    ))
}

pub fn contract_strategy() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        mock_strategy::execute,
        mock_strategy::instantiate,
        mock_strategy::query,
    ))
}

pub fn contract_fee_collector() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        mock_fee_collector::execute,
        mock_fee_collector::instantiate,
        mock_fee_collector::query,
    ))
}

pub fn contract_target() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        mock_target::execute,
        mock_target::instantiate,
        mock_target::query,
    ))
}

// ============================================================================
// Mock Collaborators
// ============================================================================

/// Channel adapter that delivers to the destination controller in-line.
pub mod mock_adapter {
    use super::*;
    use cosmwasm_schema::cw_serde;
    use cw_storage_plus::Item;

    use controller::msg::ConfigResponse;

    const DELIVER: Item<bool> = Item::new("deliver");
    const DISPATCHED: Item<u64> = Item::new("dispatched");

    #[cw_serde]
    pub struct InstantiateMsg {
        pub deliver: bool,
    }

    #[cw_serde]
    pub enum ExecuteMsg {
        Dispatch {
            dest_chain_id: u64,
            dest_address: String,
            options: Binary,
            payload: Binary,
        },
        SetDeliver {
            deliver: bool,
        },
    }

    #[cw_serde]
    pub enum QueryMsg {
        Dispatched {},
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        DELIVER.save(deps.storage, &msg.deliver)?;
        DISPATCHED.save(deps.storage, &0)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        match msg {
            ExecuteMsg::Dispatch {
                dest_address,
                payload,
                ..
            } => {
                DISPATCHED.update(deps.storage, |n| -> StdResult<_> { Ok(n + 1) })?;
                if !DELIVER.load(deps.storage)? {
                    return Ok(Response::new());
                }

                let origin: ConfigResponse = deps
                    .querier
                    .query_wasm_smart(&info.sender, &controller::msg::QueryMsg::Config {})?;
                Ok(Response::new().add_message(WasmMsg::Execute {
                    contract_addr: dest_address,
                    msg: to_json_binary(&controller::msg::ExecuteMsg::Receive {
                        payload,
                        origin_chain_id: origin.local_chain_id,
                        origin_sender: info.sender.to_string(),
                    })?,
                    funds: vec![],
                }))
            }
            ExecuteMsg::SetDeliver { deliver } => {
                DELIVER.save(deps.storage, &deliver)?;
                Ok(Response::new())
            }
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
        match msg {
            QueryMsg::Dispatched {} => to_json_binary(&DISPATCHED.load(deps.storage)?),
        }
    }
}

/// Lockbox releasing a native denom against wrapped tokens.
pub mod mock_lockbox {
    use super::*;
    use cosmwasm_schema::cw_serde;
    use cw_storage_plus::Item;

    use ::common::lockbox::{
        LockboxExecuteMsg, LockboxHookMsg, LockboxQueryMsg, UnderlyingResponse,
    };
    use ::common::AssetInfo;

    #[cw_serde]
    pub enum LockboxMode {
        Healthy,
        RejectDeposits,
        NoUnderlying,
    }

    #[cw_serde]
    pub struct InstantiateMsg {
        pub mode: LockboxMode,
        pub denom: String,
    }

    const MODE: Item<LockboxMode> = Item::new("mode");
    const DENOM: Item<String> = Item::new("denom");

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        MODE.save(deps.storage, &msg.mode)?;
        DENOM.save(deps.storage, &msg.denom)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: LockboxExecuteMsg,
    ) -> StdResult<Response> {
        let LockboxExecuteMsg::Receive(receive) = msg;
        if MODE.load(deps.storage)? == LockboxMode::RejectDeposits {
            return Err(StdError::generic_err("lockbox closed"));
        }

        let LockboxHookMsg::Withdraw { recipient } = from_json(&receive.msg)?;
        Ok(Response::new().add_message(BankMsg::Send {
            to_address: recipient,
            amount: coins(receive.amount.u128(), DENOM.load(deps.storage)?),
        }))
    }

    pub fn query(deps: Deps, _env: Env, msg: LockboxQueryMsg) -> StdResult<Binary> {
        match msg {
            LockboxQueryMsg::Underlying {} => {
                if MODE.load(deps.storage)? == LockboxMode::NoUnderlying {
                    return Err(StdError::generic_err("underlying unknown"));
                }
                to_json_binary(&UnderlyingResponse {
                    asset: AssetInfo::Native {
                        denom: DENOM.load(deps.storage)?,
                    },
                })
            }
        }
    }
}

/// Yield strategy holding principal per depositor.
pub mod mock_strategy {
    use super::*;
    use cosmwasm_schema::cw_serde;
    use cw_storage_plus::{Item, Map};

    use ::common::strategy::{PrincipalResponse, StrategyExecuteMsg, StrategyQueryMsg};

    #[cw_serde]
    pub struct InstantiateMsg {
        pub token: String,
    }

    const TOKEN: Item<Addr> = Item::new("token");
    const PRINCIPAL: Map<&Addr, Uint128> = Map::new("principal");

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        TOKEN.save(deps.storage, &deps.api.addr_validate(&msg.token)?)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        msg: StrategyExecuteMsg,
    ) -> StdResult<Response> {
        let token = TOKEN.load(deps.storage)?;
        match msg {
            StrategyExecuteMsg::Receive(receive) => {
                if info.sender != token {
                    return Err(StdError::generic_err("unsupported token"));
                }
                let owner = deps.api.addr_validate(&receive.sender)?;
                PRINCIPAL.update(deps.storage, &owner, |p| -> StdResult<_> {
                    Ok(p.unwrap_or_default() + receive.amount)
                })?;
                Ok(Response::new())
            }
            StrategyExecuteMsg::Withdraw { amount } => {
                PRINCIPAL.update(deps.storage, &info.sender, |p| -> StdResult<_> {
                    Ok(p.unwrap_or_default().checked_sub(amount)?)
                })?;
                Ok(Response::new().add_message(WasmMsg::Execute {
                    contract_addr: token.to_string(),
                    msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                        recipient: info.sender.to_string(),
                        amount,
                    })?,
                    funds: vec![],
                }))
            }
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: StrategyQueryMsg) -> StdResult<Binary> {
        match msg {
            StrategyQueryMsg::Principal { owner } => {
                let owner = deps.api.addr_validate(&owner)?;
                to_json_binary(&PrincipalResponse {
                    principal: PRINCIPAL
                        .may_load(deps.storage, &owner)?
                        .unwrap_or_default(),
                })
            }
        }
    }
}

/// Fee collector quoting a flat basis-point fee.
pub mod mock_fee_collector {
    use super::*;
    use cosmwasm_schema::cw_serde;
    use cw_storage_plus::Item;

    use ::common::fee_collector::{FeeCollectorExecuteMsg, FeeCollectorQueryMsg, QuoteResponse};

    #[cw_serde]
    pub struct InstantiateMsg {
        pub fee_bps: u64,
    }

    const FEE_BPS: Item<u64> = Item::new("fee_bps");

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        FEE_BPS.save(deps.storage, &msg.fee_bps)?;
        Ok(Response::new())
    }

    pub fn execute(
        _deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: FeeCollectorExecuteMsg,
    ) -> StdResult<Response> {
        let FeeCollectorExecuteMsg::Collect { token, amount } = msg;
        Ok(Response::new()
            .add_attribute("collected_token", token)
            .add_attribute("collected_amount", amount))
    }

    pub fn query(deps: Deps, _env: Env, msg: FeeCollectorQueryMsg) -> StdResult<Binary> {
        match msg {
            FeeCollectorQueryMsg::Quote { amount } => {
                let bps = FEE_BPS.load(deps.storage)?;
                to_json_binary(&QuoteResponse {
                    fee: amount.multiply_ratio(bps, 10_000u128),
                })
            }
        }
    }
}

/// Call target for bridged messages.
pub mod mock_target {
    use super::*;
    use cosmwasm_schema::cw_serde;
    use cw_storage_plus::Item;

    #[cw_serde]
    pub struct InstantiateMsg {}

    #[cw_serde]
    pub enum ExecuteMsg {
        Record { value: String },
        Fail {},
    }

    #[cw_serde]
    pub enum QueryMsg {
        Values {},
        LastCaller {},
    }

    const VALUES: Item<Vec<String>> = Item::new("values");
    const LAST_CALLER: Item<Option<Addr>> = Item::new("last_caller");

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        _msg: InstantiateMsg,
    ) -> StdResult<Response> {
        VALUES.save(deps.storage, &vec![])?;
        LAST_CALLER.save(deps.storage, &None)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        match msg {
            ExecuteMsg::Record { value } => {
                VALUES.update(deps.storage, |mut values| -> StdResult<_> {
                    values.push(value);
                    Ok(values)
                })?;
                LAST_CALLER.save(deps.storage, &Some(info.sender))?;
                Ok(Response::new())
            }
            ExecuteMsg::Fail {} => Err(StdError::generic_err("target refused call")),
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
        match msg {
            QueryMsg::Values {} => to_json_binary(&VALUES.load(deps.storage)?),
            QueryMsg::LastCaller {} => to_json_binary(&LAST_CALLER.load(deps.storage)?),
        }
    }
}

// ============================================================================
// Mint/Burn Suite (chain 1 -> chain 2)
// ============================================================================

pub struct Suite {
    pub app: App,
    pub token_a: Addr,
    pub token_b: Addr,
    pub controller_a: Addr,
    pub controller_b: Addr,
    pub adapter_x: Addr,
    pub adapter_y: Addr,
    pub adapter_z: Addr,
    pub controller_code_id: u64,
}

pub fn setup() -> Suite {
    setup_with_standard(TokenStandard::Mintable)
}

/// Controller A burns with `standard`; controller B always mints.
pub fn setup_with_standard(standard: TokenStandard) -> Suite {
    let mut app = App::default();
    let admin = Addr::unchecked(ADMIN);
    let user = Addr::unchecked(USER);

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &user, coins(10_000_000_000, FEE_DENOM))
            .unwrap();
    });

    let cw20_code_id = app.store_code(contract_cw20());
    let controller_code_id = app.store_code(contract_controller());
    let adapter_code_id = app.store_code(contract_adapter());

    let token_a = instantiate_token(&mut app, cw20_code_id, "Bridged A", "BRGA", USER_BALANCE);
    let token_b = instantiate_token(&mut app, cw20_code_id, "Bridged B", "BRGB", 0);

    let controller_a = instantiate_controller(
        &mut app,
        controller_code_id,
        CHAIN_A,
        BackingModeMsg::MintBurn {
            token: token_a.to_string(),
            standard,
        },
    );
    let controller_b = instantiate_controller(
        &mut app,
        controller_code_id,
        CHAIN_B,
        BackingModeMsg::MintBurn {
            token: token_b.to_string(),
            standard: TokenStandard::Mintable,
        },
    );

    let mut adapters = vec![];
    for label in ["adapter-x", "adapter-y", "adapter-z"] {
        adapters.push(
            app.instantiate_contract(
                adapter_code_id,
                admin.clone(),
                &mock_adapter::InstantiateMsg { deliver: true },
                &[],
                label,
                None,
            )
            .unwrap(),
        );
    }

    // Controllers become the minters
    for (token, controller) in [(&token_a, &controller_a), (&token_b, &controller_b)] {
        app.execute_contract(
            admin.clone(),
            token.clone(),
            &Cw20ExecuteMsg::UpdateMinter {
                new_minter: Some(controller.to_string()),
            },
            &[],
        )
        .unwrap();
    }

    app.execute_contract(
        user,
        token_a.clone(),
        &Cw20ExecuteMsg::IncreaseAllowance {
            spender: controller_a.to_string(),
            amount: Uint128::new(USER_BALANCE),
            expires: None,
        },
        &[],
    )
    .unwrap();

    let mut suite = Suite {
        app,
        token_a,
        token_b,
        controller_a,
        controller_b,
        adapter_x: adapters[0].clone(),
        adapter_y: adapters[1].clone(),
        adapter_z: adapters[2].clone(),
        controller_code_id,
    };

    let (a, b) = (suite.controller_a.clone(), suite.controller_b.clone());
    suite.admin_execute(
        &a,
        &ExecuteMsg::SetControllerForChain {
            chain_id: CHAIN_B,
            controller: b.to_string(),
        },
    );
    suite.admin_execute(
        &b,
        &ExecuteMsg::SetControllerForChain {
            chain_id: CHAIN_A,
            controller: a.to_string(),
        },
    );

    let adapters: Vec<String> = [&suite.adapter_x, &suite.adapter_y, &suite.adapter_z]
        .iter()
        .map(|a| a.to_string())
        .collect();
    let x = suite.adapter_x.to_string();
    for controller in [&a, &b] {
        suite.admin_execute(
            controller,
            &ExecuteMsg::SetChannels {
                channels: vec![x.clone()],
                enabled: vec![true],
            },
        );
        suite.admin_execute(
            controller,
            &ExecuteMsg::SetMultiChannelAdapters {
                adapters: adapters.clone(),
                enabled: vec![true; adapters.len()],
            },
        );
        for channel in adapters.iter().cloned().map(Some).chain([None]) {
            suite.admin_execute(
                controller,
                &ExecuteMsg::SetRateLimits {
                    channel,
                    minting_limit: Uint128::new(DAILY_LIMIT),
                    burning_limit: Uint128::new(DAILY_LIMIT),
                },
            );
        }
        suite.admin_execute(
            controller,
            &ExecuteMsg::AddVetoer {
                address: VETOER.to_string(),
            },
        );
        suite.admin_execute(
            controller,
            &ExecuteMsg::AddManager {
                address: MANAGER.to_string(),
            },
        );
    }

    suite
}

pub fn instantiate_token(
    app: &mut App,
    code_id: u64,
    name: &str,
    symbol: &str,
    user_balance: u128,
) -> Addr {
    let initial_balances = if user_balance > 0 {
        vec![Cw20Coin {
            address: USER.to_string(),
            amount: Uint128::new(user_balance),
        }]
    } else {
        vec![]
    };

    app.instantiate_contract(
        code_id,
        Addr::unchecked(ADMIN),
        &cw20_base::msg::InstantiateMsg {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: 6,
            initial_balances,
            mint: Some(MinterResponse {
                minter: ADMIN.to_string(),
                cap: None,
            }),
            marketing: None,
        },
        &[],
        symbol,
        None,
    )
    .unwrap()
}

pub fn instantiate_controller(
    app: &mut App,
    code_id: u64,
    local_chain_id: u64,
    backing: BackingModeMsg,
) -> Addr {
    app.instantiate_contract(
        code_id,
        Addr::unchecked(ADMIN),
        &InstantiateMsg {
            admin: ADMIN.to_string(),
            local_chain_id,
            backing,
            fee_denom: FEE_DENOM.to_string(),
            registry: None,
            lockbox: None,
            fee_collector: None,
            min_channels: None,
            message_timelock: None,
            message_ttl: None,
        },
        &[],
        format!("controller-{}", local_chain_id),
        Some(ADMIN.to_string()),
    )
    .unwrap()
}

impl Suite {
    pub fn admin_execute(&mut self, contract: &Addr, msg: &ExecuteMsg) -> AppResponse {
        self.app
            .execute_contract(Addr::unchecked(ADMIN), contract.clone(), msg, &[])
            .unwrap()
    }

    /// Single-channel transfer from chain 1 to chain 2 through adapter X.
    pub fn send_single(&mut self, amount: u128, unwrap: bool) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            Addr::unchecked(USER),
            self.controller_a.clone(),
            &ExecuteMsg::SendTransfer {
                recipient: RECIPIENT.to_string(),
                amount: Uint128::new(amount),
                unwrap,
                dest_chain_id: CHAIN_B,
                channel: self.adapter_x.to_string(),
                fee: Uint128::zero(),
                options: Binary::default(),
            },
            &[],
        )
    }

    /// Multi-channel transfer from chain 1 to chain 2, no channel fees.
    pub fn send_multi(&mut self, channels: &[Addr], amount: u128) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            Addr::unchecked(USER),
            self.controller_a.clone(),
            &ExecuteMsg::SendTransferMulti {
                recipient: RECIPIENT.to_string(),
                amount: Uint128::new(amount),
                unwrap: false,
                dest_chain_id: CHAIN_B,
                channels: channels.iter().map(|c| c.to_string()).collect(),
                fees: vec![Uint128::zero(); channels.len()],
                options: vec![Binary::default(); channels.len()],
            },
            &[],
        )
    }

    pub fn send_message(&mut self, calls: Vec<Call>) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            Addr::unchecked(USER),
            self.controller_a.clone(),
            &ExecuteMsg::SendMessage {
                calls,
                dest_chain_id: CHAIN_B,
                channel: self.adapter_x.to_string(),
                fee: Uint128::zero(),
                options: Binary::default(),
            },
            &[],
        )
    }

    pub fn set_deliver(&mut self, adapter: &Addr, deliver: bool) {
        self.app
            .execute_contract(
                Addr::unchecked(ADMIN),
                adapter.clone(),
                &mock_adapter::ExecuteMsg::SetDeliver { deliver },
                &[],
            )
            .unwrap();
    }

    /// Id of the `nonce`-th send from chain 1 to chain 2.
    pub fn id_for_nonce(&self, nonce: u64) -> Binary {
        let res: controller::msg::ComputeIdResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.controller_a,
                &QueryMsg::ComputeId {
                    dest_chain_id: CHAIN_B,
                    nonce,
                },
            )
            .unwrap();
        res.id
    }

    pub fn balance(&self, token: &Addr, account: &str) -> u128 {
        token_balance(&self.app, token, account)
    }

    pub fn query<T: serde::de::DeserializeOwned>(&self, contract: &Addr, msg: &QueryMsg) -> T {
        self.app.wrap().query_wasm_smart(contract, msg).unwrap()
    }

    pub fn advance_time(&mut self, seconds: u64) {
        advance_time(&mut self.app, seconds);
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn token_balance(app: &App, token: &Addr, account: &str) -> u128 {
    let res: cw20::BalanceResponse = app
        .wrap()
        .query_wasm_smart(
            token,
            &Cw20QueryMsg::Balance {
                address: account.to_string(),
            },
        )
        .unwrap();
    res.balance.u128()
}

pub fn advance_time(app: &mut App, seconds: u64) {
    app.update_block(|block| {
        block.time = block.time.plus_seconds(seconds);
        block.height += seconds / 5;
    });
}

pub fn record_call(target: &Addr, value: &str) -> Call {
    Call {
        target: target.to_string(),
        msg: to_json_binary(&mock_target::ExecuteMsg::Record {
            value: value.to_string(),
        })
        .unwrap(),
    }
}

pub fn failing_call(target: &Addr) -> Call {
    Call {
        target: target.to_string(),
        msg: to_json_binary(&mock_target::ExecuteMsg::Fail {}).unwrap(),
    }
}

pub fn assert_error(res: anyhow::Result<AppResponse>, expected: &str) {
    let err = res.unwrap_err();
    let err_str = err.root_cause().to_string();
    assert!(
        err_str.contains(expected),
        "expected error containing '{}', got: {}",
        expected,
        err_str
    );
}
