//! Quorum Bridge Controller - Multi-Channel Cross-Chain Transfers and Messages
//!
//! A controller sends value transfers and contract-call messages to its
//! counterpart controllers on other chains through independent channel
//! adapters, and executes what those adapters deliver once enough distinct
//! channels agree.
//!
//! # Outgoing Flow
//! 1. User calls `SendTransfer`/`SendMessage` (one channel) or the `Multi`
//!    variants (several multi-channel adapters)
//! 2. Tokens are burned or escrowed, the id is allocated from the nonce
//! 3. The payload is dispatched to every selected adapter with its fee
//!
//! # Incoming Flow
//! 1. Each adapter calls `Receive` with the payload
//! 2. Deliveries are counted per distinct channel until the threshold
//! 3. Single-channel transfers pay out immediately; multi-channel transfers
//!    through `ExecuteTransfer`; messages through `ExecuteMessage` after a
//!    vetoable timelock
//!
//! # Security
//! - One vote per channel per id, duplicates rejected
//! - Per-channel and pooled rate limits on both directions (24h refill)
//! - Ids derived from a nonce persisted before dispatch
//! - Global and per-destination pause

pub mod auth;
pub mod backing;
pub mod contract;
pub mod dispatch;
pub mod error;
mod execute;
pub mod identifier;
pub mod msg;
pub mod payload;
mod query;
pub mod quorum;
pub mod rate_limit;
pub mod state;

pub use crate::error::ContractError;
pub use crate::identifier::{compute_id, keccak256};
pub use crate::payload::ControllerPayload;
