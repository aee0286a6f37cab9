//! Asset backing
//!
//! The chain-local effect of a transfer. A controller moves value with exactly
//! one backing, chosen from `Config::backing`:
//! - [`MintBurnBacking`]: burn on send, mint on receive, optional lockbox unwrap
//! - [`LockReleaseBacking`]: escrow on send, release on receive, optionally
//!   topping up from a yield strategy
//!
//! Message-only controllers have no backing and reject transfers.

use cosmwasm_std::{
    to_json_binary, Addr, CosmosMsg, Env, Event, QuerierWrapper, Response, StdResult, Storage,
    SubMsg, SubMsgResult, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use common::lockbox::{LockboxHookMsg, LockboxQueryMsg, UnderlyingResponse};
use common::strategy::{PrincipalResponse, StrategyExecuteMsg, StrategyQueryMsg};

use crate::error::ContractError;
use crate::state::{
    BackingMode, Config, PendingBurnCheck, PendingUnwrap, TokenStandard, BURN_CHECK_REPLY_ID,
    PENDING_BURN_CHECK, PENDING_UNWRAP, UNWRAP_REPLY_ID,
};

/// Messages and events produced by a payout
#[derive(Debug, Default, PartialEq)]
pub struct Payout {
    pub messages: Vec<SubMsg>,
    pub events: Vec<Event>,
}

pub trait AssetBacking {
    /// Token this backing moves
    fn token(&self) -> &Addr;

    /// Take `amount` from `holder` on send. `holder` has granted the
    /// controller a cw20 allowance.
    fn lock_or_burn(
        &self,
        storage: &mut dyn Storage,
        querier: &QuerierWrapper,
        env: &Env,
        holder: &Addr,
        amount: Uint128,
    ) -> Result<Vec<SubMsg>, ContractError>;

    /// Deliver `amount` to `recipient` on receive.
    fn release_or_mint(
        &self,
        storage: &mut dyn Storage,
        querier: &QuerierWrapper,
        env: &Env,
        recipient: &Addr,
        amount: Uint128,
        unwrap: bool,
    ) -> Result<Payout, ContractError>;
}

/// Backing selected by the configuration.
pub fn backing_for(config: &Config) -> Result<Box<dyn AssetBacking>, ContractError> {
    match &config.backing {
        BackingMode::MessageOnly => Err(ContractError::TransfersDisabled),
        BackingMode::MintBurn { token, standard } => Ok(Box::new(MintBurnBacking {
            token: token.clone(),
            standard: standard.clone(),
            lockbox: config.lockbox.clone(),
        })),
        BackingMode::LockRelease { token, strategy } => Ok(Box::new(LockReleaseBacking {
            token: token.clone(),
            strategy: strategy.clone(),
        })),
    }
}

pub struct MintBurnBacking {
    pub token: Addr,
    pub standard: TokenStandard,
    pub lockbox: Option<Addr>,
}

impl MintBurnBacking {
    fn mint_to(&self, recipient: &Addr, amount: Uint128) -> StdResult<SubMsg> {
        cw20_msg(
            &self.token,
            &Cw20ExecuteMsg::Mint {
                recipient: recipient.to_string(),
                amount,
            },
        )
        .map(SubMsg::new)
    }

    /// Mint wrapped tokens straight to the recipient after skipping the unwrap.
    fn fallback(&self, recipient: &Addr, amount: Uint128, reason: &str) -> StdResult<Payout> {
        Ok(Payout {
            messages: vec![self.mint_to(recipient, amount)?],
            events: vec![fallback_event(recipient, amount, reason)],
        })
    }
}

impl AssetBacking for MintBurnBacking {
    fn token(&self) -> &Addr {
        &self.token
    }

    fn lock_or_burn(
        &self,
        storage: &mut dyn Storage,
        querier: &QuerierWrapper,
        env: &Env,
        holder: &Addr,
        amount: Uint128,
    ) -> Result<Vec<SubMsg>, ContractError> {
        match self.standard {
            TokenStandard::Mintable => Ok(vec![SubMsg::new(cw20_msg(
                &self.token,
                &Cw20ExecuteMsg::BurnFrom {
                    owner: holder.to_string(),
                    amount,
                },
            )?)]),
            TokenStandard::AmountBurn => {
                // Pull in, burn, then check the balance is back where it started
                let expected_balance =
                    query_cw20_balance(querier, &self.token, &env.contract.address)?;
                PENDING_BURN_CHECK.save(
                    storage,
                    &PendingBurnCheck {
                        token: self.token.clone(),
                        expected_balance,
                    },
                )?;

                Ok(vec![
                    SubMsg::new(cw20_msg(
                        &self.token,
                        &Cw20ExecuteMsg::TransferFrom {
                            owner: holder.to_string(),
                            recipient: env.contract.address.to_string(),
                            amount,
                        },
                    )?),
                    SubMsg::reply_on_success(
                        cw20_msg(&self.token, &Cw20ExecuteMsg::Burn { amount })?,
                        BURN_CHECK_REPLY_ID,
                    ),
                ])
            }
        }
    }

    fn release_or_mint(
        &self,
        storage: &mut dyn Storage,
        querier: &QuerierWrapper,
        env: &Env,
        recipient: &Addr,
        amount: Uint128,
        unwrap: bool,
    ) -> Result<Payout, ContractError> {
        if !unwrap {
            return Ok(Payout {
                messages: vec![self.mint_to(recipient, amount)?],
                events: vec![],
            });
        }

        let lockbox = match &self.lockbox {
            Some(lockbox) => lockbox,
            None => return Ok(self.fallback(recipient, amount, "lockbox_absent")?),
        };
        let underlying: UnderlyingResponse =
            match querier.query_wasm_smart(lockbox, &LockboxQueryMsg::Underlying {}) {
                Ok(res) => res,
                Err(_) => return Ok(self.fallback(recipient, amount, "underlying_unresolvable")?),
            };

        PENDING_UNWRAP.save(
            storage,
            &PendingUnwrap {
                token: self.token.clone(),
                recipient: recipient.clone(),
                amount,
                lockbox: lockbox.clone(),
                underlying: underlying.asset.identifier(),
            },
        )?;

        // Mint to self, then hand the wrapped tokens to the lockbox. The send
        // is caught by the reply so a failing lockbox cannot revert the payout.
        let send = cw20_msg(
            &self.token,
            &Cw20ExecuteMsg::Send {
                contract: lockbox.to_string(),
                amount,
                msg: to_json_binary(&LockboxHookMsg::Withdraw {
                    recipient: recipient.to_string(),
                })?,
            },
        )?;

        Ok(Payout {
            messages: vec![
                self.mint_to(&env.contract.address, amount)?,
                SubMsg::reply_always(send, UNWRAP_REPLY_ID),
            ],
            events: vec![],
        })
    }
}

pub struct LockReleaseBacking {
    pub token: Addr,
    pub strategy: Option<Addr>,
}

impl AssetBacking for LockReleaseBacking {
    fn token(&self) -> &Addr {
        &self.token
    }

    fn lock_or_burn(
        &self,
        _storage: &mut dyn Storage,
        _querier: &QuerierWrapper,
        env: &Env,
        holder: &Addr,
        amount: Uint128,
    ) -> Result<Vec<SubMsg>, ContractError> {
        Ok(vec![SubMsg::new(cw20_msg(
            &self.token,
            &Cw20ExecuteMsg::TransferFrom {
                owner: holder.to_string(),
                recipient: env.contract.address.to_string(),
                amount,
            },
        )?)])
    }

    /// The unwrap flag has no meaning for escrowed tokens and is ignored.
    fn release_or_mint(
        &self,
        _storage: &mut dyn Storage,
        querier: &QuerierWrapper,
        env: &Env,
        recipient: &Addr,
        amount: Uint128,
        _unwrap: bool,
    ) -> Result<Payout, ContractError> {
        let on_hand = query_cw20_balance(querier, &self.token, &env.contract.address)?;
        let mut payout = Payout::default();

        if on_hand < amount {
            let deficit = amount - on_hand;
            let strategy = self
                .strategy
                .as_ref()
                .ok_or(ContractError::InsufficientLiquidity {
                    available: on_hand,
                    requested: amount,
                })?;

            let principal: PrincipalResponse = querier.query_wasm_smart(
                strategy,
                &StrategyQueryMsg::Principal {
                    owner: env.contract.address.to_string(),
                },
            )?;
            if principal.principal < deficit {
                return Err(ContractError::StrategyInsufficient {
                    deficit,
                    principal: principal.principal,
                });
            }

            // Only the deficit comes back; the rest stays invested
            payout.messages.push(SubMsg::new(WasmMsg::Execute {
                contract_addr: strategy.to_string(),
                msg: to_json_binary(&StrategyExecuteMsg::Withdraw { amount: deficit })?,
                funds: vec![],
            }));
            payout.events.push(
                Event::new("strategy_withdraw")
                    .add_attribute("strategy", strategy.to_string())
                    .add_attribute("deficit", deficit.to_string())
                    .add_attribute("on_hand", on_hand.to_string()),
            );
        }

        payout.messages.push(SubMsg::new(cw20_msg(
            &self.token,
            &Cw20ExecuteMsg::Transfer {
                recipient: recipient.to_string(),
                amount,
            },
        )?));
        Ok(payout)
    }
}

// ============================================================================
// Replies
// ============================================================================

/// Verify that an amount-only burn removed exactly what was pulled in.
pub fn handle_burn_check_reply(
    storage: &mut dyn Storage,
    querier: &QuerierWrapper,
    env: &Env,
) -> Result<Response, ContractError> {
    let pending = PENDING_BURN_CHECK.load(storage)?;
    PENDING_BURN_CHECK.remove(storage);

    let actual = query_cw20_balance(querier, &pending.token, &env.contract.address)?;
    if actual != pending.expected_balance {
        return Err(ContractError::BurnMismatch {
            expected: pending.expected_balance,
            actual,
        });
    }

    Ok(Response::new().add_attribute("method", "burn_verified"))
}

/// Finish an unwrap. A failed lockbox send leaves the freshly minted wrapped
/// tokens with the controller; they are forwarded to the recipient.
pub fn handle_unwrap_reply(
    storage: &mut dyn Storage,
    result: SubMsgResult,
) -> Result<Response, ContractError> {
    let pending = PENDING_UNWRAP.load(storage)?;
    PENDING_UNWRAP.remove(storage);

    match result {
        SubMsgResult::Ok(_) => Ok(Response::new()
            .add_event(
                Event::new("unwrap")
                    .add_attribute("recipient", pending.recipient.to_string())
                    .add_attribute("amount", pending.amount.to_string())
                    .add_attribute("lockbox", pending.lockbox.to_string())
                    .add_attribute("underlying", pending.underlying),
            )
            .add_attribute("method", "unwrap")),
        SubMsgResult::Err(err) => {
            let transfer = cw20_msg(
                &pending.token,
                &Cw20ExecuteMsg::Transfer {
                    recipient: pending.recipient.to_string(),
                    amount: pending.amount,
                },
            )?;
            Ok(Response::new()
                .add_message(transfer)
                .add_event(
                    fallback_event(&pending.recipient, pending.amount, "lockbox_failed")
                        .add_attribute("error", err),
                )
                .add_attribute("method", "unwrap_fallback"))
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn cw20_msg(token: &Addr, msg: &Cw20ExecuteMsg) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    }))
}

fn fallback_event(recipient: &Addr, amount: Uint128, reason: &str) -> Event {
    Event::new("unwrap_fallback")
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("reason", reason)
}

/// Query CW20 token balance
pub fn query_cw20_balance(
    querier: &QuerierWrapper,
    token: &Addr,
    account: &Addr,
) -> StdResult<Uint128> {
    let query_msg = cw20::Cw20QueryMsg::Balance {
        address: account.to_string(),
    };

    let response: cw20::BalanceResponse = querier.query_wasm_smart(token, &query_msg)?;
    Ok(response.balance)
}
