//! Common - Shared Types and Collaborator Interfaces for the Bridge Controller
//!
//! This package provides the asset types and the typed message interfaces of
//! every contract the controller talks to: channel adapters, the channel
//! registry, the lockbox, the yield strategy and the fee collector.

pub mod adapter;
pub mod asset;
pub mod fee_collector;
pub mod lockbox;
pub mod registry;
pub mod strategy;

pub use adapter::AdapterExecuteMsg;
pub use asset::{Asset, AssetInfo};
pub use registry::{IsAuthorizedChannelResponse, RegistryQueryMsg};
