//! Channel adapter interface.
//!
//! A channel adapter is an independent transport. The controller calls
//! `Dispatch` on the origin chain; on the destination chain the adapter calls
//! the controller's `Receive` entry point with the same payload.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Binary;

#[cw_serde]
pub enum AdapterExecuteMsg {
    /// Push `payload` to the controller registered at `dest_address` on `dest_chain_id`.
    /// The per-channel fee is attached as funds.
    Dispatch {
        dest_chain_id: u64,
        dest_address: String,
        options: Binary,
        payload: Binary,
    },
}
