//! Rate Limiter Module
//!
//! Token-bucket limits per channel, kept separately for the minting side
//! (value arriving on this chain) and the burning side (value leaving it).
//!
//! ## Bucket Semantics
//!
//! | Field             | Meaning                                         |
//! |-------------------|-------------------------------------------------|
//! | `max_limit`       | Capacity of the bucket                          |
//! | `current_limit`   | Capacity left at `timestamp`                    |
//! | `timestamp`       | Last consumption or limit change (seconds)      |
//! | `rate_per_second` | `max_limit / RATE_LIMIT_DURATION`               |
//!
//! The available capacity is always derived lazily from the stored fields and
//! block time; it never exceeds `max_limit`. A transfer draws from the bucket
//! of every channel carrying it and, when it travels over more than one
//! channel, from the reserved [`MULTI_CHANNEL_POOL`] bucket as well.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Storage, Uint128};
use cw_storage_plus::Map;

use crate::error::ContractError;

// ============================================================================
// Constants
// ============================================================================

/// Replenishment window in seconds (24 hours)
pub const RATE_LIMIT_DURATION: u64 = 86_400;

/// Bucket key reserved for the aggregate multi-channel limit
pub const MULTI_CHANNEL_POOL: &str = "multi_channel_pool";

/// Minting-side buckets by channel key
pub const MINTING_LIMITS: Map<&str, BridgeLimitState> = Map::new("minting_limits");

/// Burning-side buckets by channel key
pub const BURNING_LIMITS: Map<&str, BridgeLimitState> = Map::new("burning_limits");

// ============================================================================
// Data Structures
// ============================================================================

/// Direction a bucket limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitSide {
    Minting,
    Burning,
}

impl LimitSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitSide::Minting => "minting",
            LimitSide::Burning => "burning",
        }
    }

    fn map(&self) -> Map<'static, &'static str, BridgeLimitState> {
        match self {
            LimitSide::Minting => MINTING_LIMITS,
            LimitSide::Burning => BURNING_LIMITS,
        }
    }
}

/// Token bucket state of one channel on one side
#[cw_serde]
#[derive(Default)]
pub struct BridgeLimitState {
    pub max_limit: Uint128,
    pub current_limit: Uint128,
    pub timestamp: u64,
    pub rate_per_second: Uint128,
}

impl BridgeLimitState {
    /// Capacity available at `now`, without mutating the bucket.
    pub fn current_limit_at(&self, now: u64) -> Uint128 {
        if self.current_limit == self.max_limit {
            return self.max_limit;
        }
        if now >= self.timestamp.saturating_add(RATE_LIMIT_DURATION) {
            return self.max_limit;
        }

        let elapsed = Uint128::from(now.saturating_sub(self.timestamp));
        let replenished = self
            .rate_per_second
            .saturating_mul(elapsed)
            .saturating_add(self.current_limit);
        replenished.min(self.max_limit)
    }

    /// Take `amount` out of the bucket; replenishment restarts at `now`.
    pub fn consume(&mut self, now: u64, amount: Uint128) -> Result<(), LimitExceeded> {
        let available = self.current_limit_at(now);
        if amount > available {
            return Err(LimitExceeded { available });
        }

        self.current_limit = available - amount;
        self.timestamp = now;
        Ok(())
    }

    /// Change the capacity, preserving the spent part of the bucket.
    ///
    /// A fresh bucket has `max_limit == 0`, so it starts full at the new max.
    pub fn set_max_limit(&mut self, now: u64, new_max: Uint128) {
        let old_max = self.max_limit;
        let current = self.current_limit_at(now);

        self.current_limit = if old_max > new_max {
            current.saturating_sub(old_max - new_max)
        } else {
            current.saturating_add(new_max - old_max)
        };
        self.max_limit = new_max;
        self.rate_per_second = new_max / Uint128::from(RATE_LIMIT_DURATION);
        self.timestamp = now;
    }
}

/// Requested amount exceeded the available capacity
#[derive(Debug, PartialEq, Eq)]
pub struct LimitExceeded {
    pub available: Uint128,
}

// ============================================================================
// Storage Helpers
// ============================================================================

/// Bucket key for a channel (`None` = multi-channel pool)
pub fn limit_key(channel: Option<&str>) -> &str {
    channel.unwrap_or(MULTI_CHANNEL_POOL)
}

/// Load a bucket, defaulting to an empty (zero capacity) one.
pub fn load_limit(storage: &dyn Storage, side: LimitSide, key: &str) -> StdResult<BridgeLimitState> {
    Ok(side.map().may_load(storage, key)?.unwrap_or_default())
}

/// Available capacity for a bucket at `now`.
pub fn current_limit(
    storage: &dyn Storage,
    side: LimitSide,
    key: &str,
    now: u64,
) -> StdResult<Uint128> {
    Ok(load_limit(storage, side, key)?.current_limit_at(now))
}

/// Consume `amount` from the bucket of every channel in `channels`, plus the
/// multi-channel pool when `pooled`. Either all buckets are charged or none.
pub fn consume_route_limits(
    storage: &mut dyn Storage,
    side: LimitSide,
    channels: &[&str],
    pooled: bool,
    now: u64,
    amount: Uint128,
) -> Result<(), ContractError> {
    let keys = pooled
        .then_some(MULTI_CHANNEL_POOL)
        .into_iter()
        .chain(channels.iter().copied());

    let mut charged = Vec::with_capacity(channels.len() + 1);
    for key in keys {
        let mut state = load_limit(storage, side, key)?;
        state
            .consume(now, amount)
            .map_err(|exceeded| ContractError::RateLimitExceeded {
                side: side.as_str().to_string(),
                channel: key.to_string(),
                limit: exceeded.available,
                requested: amount,
            })?;
        charged.push((key, state));
    }
    for (key, state) in charged {
        side.map().save(storage, key, &state)?;
    }
    Ok(())
}

/// Update both buckets of a channel.
pub fn set_limits(
    storage: &mut dyn Storage,
    key: &str,
    now: u64,
    minting_limit: Uint128,
    burning_limit: Uint128,
) -> StdResult<()> {
    for (side, limit) in [
        (LimitSide::Minting, minting_limit),
        (LimitSide::Burning, burning_limit),
    ] {
        let mut state = load_limit(storage, side, key)?;
        state.set_max_limit(now, limit);
        side.map().save(storage, key, &state)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
