//! Transfer and message identifiers
//!
//! Ids are computed the same way an EVM counterpart would:
//!
//! ```solidity
//! keccak256(abi.encode(destChainId, block.chainid, nonce))
//! ```
//!
//! # Byte Layout (96 bytes total)
//! - Bytes 0-31:  destination chain id (uint256, big-endian, left-padded)
//! - Bytes 32-63: origin chain id (uint256, big-endian, left-padded)
//! - Bytes 64-95: nonce (uint256, big-endian, left-padded)

use cosmwasm_std::{Binary, StdResult, Storage};
use tiny_keccak::{Hasher, Keccak};

use crate::error::ContractError;
use crate::state::NONCE;

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Compute the id of a transfer or message.
pub fn compute_id(dest_chain_id: u64, origin_chain_id: u64, nonce: u64) -> [u8; 32] {
    let mut data = [0u8; 96];

    // u64 (8 bytes) goes into the last 8 bytes of each 32-byte word
    data[24..32].copy_from_slice(&dest_chain_id.to_be_bytes());
    data[56..64].copy_from_slice(&origin_chain_id.to_be_bytes());
    data[88..96].copy_from_slice(&nonce.to_be_bytes());

    keccak256(&data)
}

/// Allocate the next id and persist the incremented nonce.
///
/// Returns the id together with the nonce it was derived from. The nonce is
/// saved before the caller builds any dispatch message.
pub fn next_id(
    storage: &mut dyn Storage,
    dest_chain_id: u64,
    origin_chain_id: u64,
) -> StdResult<([u8; 32], u64)> {
    let nonce = NONCE.may_load(storage)?.unwrap_or_default();
    let id = compute_id(dest_chain_id, origin_chain_id, nonce);
    NONCE.save(storage, &(nonce + 1))?;
    Ok((id, nonce))
}

/// Parse a 32-byte id from Binary input.
pub fn parse_id(id: &Binary) -> Result<[u8; 32], ContractError> {
    id.to_vec()
        .try_into()
        .map_err(|_| ContractError::InvalidIdLength { got: id.len() })
}

/// Convert bytes32 to a 0x-prefixed hex string
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}
