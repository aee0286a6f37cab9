//! Lock/release backing with an optional yield strategy.

mod suite;

use cosmwasm_std::{Addr, Binary, Uint128};
use cw20::Cw20ExecuteMsg;
use cw_multi_test::{App, AppResponse, Executor};

use common::strategy::{PrincipalResponse, StrategyQueryMsg};
use controller::msg::{BackingModeMsg, ExecuteMsg};
use controller::ControllerPayload;

use suite::*;

const REMOTE_CHAIN: u64 = 5;
const REMOTE_CONTROLLER: &str = "terra1remotecontroller";

struct Escrow {
    app: App,
    token: Addr,
    controller: Addr,
    adapter: Addr,
    strategy_code_id: u64,
}

fn setup_escrow() -> Escrow {
    let mut app = App::default();
    let admin = Addr::unchecked(ADMIN);

    let cw20_code_id = app.store_code(contract_cw20());
    let controller_code_id = app.store_code(contract_controller());
    let adapter_code_id = app.store_code(contract_adapter());
    let strategy_code_id = app.store_code(contract_strategy());

    let token = instantiate_token(&mut app, cw20_code_id, "Native Token", "NTVT", USER_BALANCE);
    let controller = instantiate_controller(
        &mut app,
        controller_code_id,
        CHAIN_A,
        BackingModeMsg::LockRelease {
            token: token.to_string(),
            strategy: None,
        },
    );
    // Dispatches to the remote chain go nowhere
    let adapter = app
        .instantiate_contract(
            adapter_code_id,
            admin.clone(),
            &mock_adapter::InstantiateMsg { deliver: false },
            &[],
            "adapter",
            None,
        )
        .unwrap();

    for msg in [
        ExecuteMsg::SetControllerForChain {
            chain_id: REMOTE_CHAIN,
            controller: REMOTE_CONTROLLER.to_string(),
        },
        ExecuteMsg::SetChannels {
            channels: vec![adapter.to_string()],
            enabled: vec![true],
        },
        ExecuteMsg::SetRateLimits {
            channel: Some(adapter.to_string()),
            minting_limit: Uint128::new(DAILY_LIMIT),
            burning_limit: Uint128::new(DAILY_LIMIT),
        },
    ] {
        app.execute_contract(admin.clone(), controller.clone(), &msg, &[])
            .unwrap();
    }

    app.execute_contract(
        Addr::unchecked(USER),
        token.clone(),
        &Cw20ExecuteMsg::IncreaseAllowance {
            spender: controller.to_string(),
            amount: Uint128::new(USER_BALANCE),
            expires: None,
        },
        &[],
    )
    .unwrap();

    Escrow {
        app,
        token,
        controller,
        adapter,
        strategy_code_id,
    }
}

impl Escrow {
    fn lock(&mut self, amount: u128) {
        self.app
            .execute_contract(
                Addr::unchecked(USER),
                self.controller.clone(),
                &ExecuteMsg::SendTransfer {
                    recipient: "0xremoterecipient".to_string(),
                    amount: Uint128::new(amount),
                    unwrap: false,
                    dest_chain_id: REMOTE_CHAIN,
                    channel: self.adapter.to_string(),
                    fee: Uint128::zero(),
                    options: Binary::default(),
                },
                &[],
            )
            .unwrap();
    }

    /// Deliver a transfer from the remote chain through the adapter.
    fn release(&mut self, id_byte: u8, amount: u128) -> anyhow::Result<AppResponse> {
        let payload = ControllerPayload::Transfer {
            id: Binary::from([id_byte; 32].to_vec()),
            recipient: RECIPIENT.to_string(),
            amount: Uint128::new(amount),
            // Ignored by escrow backing
            unwrap: true,
            threshold: 1,
        }
        .encode()
        .unwrap();
        self.app.execute_contract(
            self.adapter.clone(),
            self.controller.clone(),
            &ExecuteMsg::Receive {
                payload,
                origin_chain_id: REMOTE_CHAIN,
                origin_sender: REMOTE_CONTROLLER.to_string(),
            },
            &[],
        )
    }

    fn attach_strategy(&mut self) -> Addr {
        let strategy = self
            .app
            .instantiate_contract(
                self.strategy_code_id,
                Addr::unchecked(ADMIN),
                &mock_strategy::InstantiateMsg {
                    token: self.token.to_string(),
                },
                &[],
                "strategy",
                None,
            )
            .unwrap();
        self.app
            .execute_contract(
                Addr::unchecked(ADMIN),
                self.controller.clone(),
                &ExecuteMsg::SetYieldStrategy {
                    strategy: Some(strategy.to_string()),
                },
                &[],
            )
            .unwrap();
        strategy
    }

    fn invest(&mut self, amount: u128) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            Addr::unchecked(ADMIN),
            self.controller.clone(),
            &ExecuteMsg::InvestInStrategy {
                amount: Uint128::new(amount),
            },
            &[],
        )
    }

    fn principal(&self, strategy: &Addr) -> u128 {
        let res: PrincipalResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                strategy,
                &StrategyQueryMsg::Principal {
                    owner: self.controller.to_string(),
                },
            )
            .unwrap();
        res.principal.u128()
    }

    fn balance(&self, account: &str) -> u128 {
        token_balance(&self.app, &self.token, account)
    }
}

#[test]
fn test_send_escrows_tokens() {
    let mut escrow = setup_escrow();
    escrow.lock(10_000);

    assert_eq!(escrow.balance(USER), USER_BALANCE - 10_000);
    assert_eq!(escrow.balance(escrow.controller.as_str()), 10_000);
}

#[test]
fn test_receive_releases_from_escrow() {
    let mut escrow = setup_escrow();
    escrow.lock(10_000);

    escrow.release(1, 4_000).unwrap();
    assert_eq!(escrow.balance(RECIPIENT), 4_000);
    assert_eq!(escrow.balance(escrow.controller.as_str()), 6_000);
}

#[test]
fn test_release_without_liquidity_fails() {
    let mut escrow = setup_escrow();
    escrow.lock(10_000);

    assert_error(escrow.release(1, 20_000), "Insufficient liquidity");
    assert_eq!(escrow.balance(escrow.controller.as_str()), 10_000);
    assert_eq!(escrow.balance(RECIPIENT), 0);
}

#[test]
fn test_strategy_covers_deficit() {
    let mut escrow = setup_escrow();
    let strategy = escrow.attach_strategy();
    escrow.lock(10_000);

    escrow.invest(8_000).unwrap();
    assert_eq!(escrow.balance(escrow.controller.as_str()), 2_000);
    assert_eq!(escrow.principal(&strategy), 8_000);

    let res = escrow.release(1, 5_000).unwrap();
    assert!(res.events.iter().any(|e| e.ty == "wasm-strategy_withdraw"));

    // Only the 3_000 deficit left the strategy
    assert_eq!(escrow.balance(RECIPIENT), 5_000);
    assert_eq!(escrow.principal(&strategy), 5_000);
    assert_eq!(escrow.balance(escrow.controller.as_str()), 0);
}

#[test]
fn test_strategy_too_small_fails() {
    let mut escrow = setup_escrow();
    let strategy = escrow.attach_strategy();
    escrow.lock(10_000);
    escrow.invest(8_000).unwrap();

    assert_error(escrow.release(1, 10_001), "Strategy insufficient");
    assert_eq!(escrow.principal(&strategy), 8_000);
}

#[test]
fn test_invest_requires_strategy() {
    let mut escrow = setup_escrow();
    escrow.lock(10_000);
    assert_error(escrow.invest(1_000), "Yield strategy not configured");

    escrow.attach_strategy();
    let res = escrow.app.execute_contract(
        Addr::unchecked(USER),
        escrow.controller.clone(),
        &ExecuteMsg::InvestInStrategy {
            amount: Uint128::new(1_000),
        },
        &[],
    );
    assert_error(res, "only admin");
}

#[test]
fn test_detach_strategy() {
    let mut escrow = setup_escrow();
    escrow.attach_strategy();
    escrow
        .app
        .execute_contract(
            Addr::unchecked(ADMIN),
            escrow.controller.clone(),
            &ExecuteMsg::SetYieldStrategy { strategy: None },
            &[],
        )
        .unwrap();

    let config: controller::msg::ConfigResponse = escrow
        .app
        .wrap()
        .query_wasm_smart(&escrow.controller, &controller::msg::QueryMsg::Config {})
        .unwrap();
    assert_eq!(
        config.backing,
        controller::state::BackingMode::LockRelease {
            token: escrow.token.clone(),
            strategy: None,
        }
    );
}
