//! Channel Registry - shared allow-list of channel adapters
//!
//! Controllers configured with a registry delegate single-channel
//! authorization to it through `IsAuthorizedChannel`.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
