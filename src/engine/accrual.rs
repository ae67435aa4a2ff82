//! The checkpoint: lazy reward-index integration.
//!
//! All history before `now` is compressed into the pool's scalar
//! `reward_index` plus each position's last-observed copy of it, which is
//! what keeps every entitlement O(1) — no operation ever scans other users.

use crate::domain::{MathError, PoolState, Timestamp, UserPosition, Wad};

/// Integrate the pool's reward index up to `min(now, end)`.
///
/// Idempotent: a second call at the same `now` with no intervening mutation
/// changes nothing. An empty pool accrues nothing, but its
/// `last_update_timestamp` still advances so principal added later earns no
/// retroactive credit.
pub fn accrue_pool(pool: &mut PoolState, now: Timestamp) -> Result<(), MathError> {
    let effective = now.min(pool.end_timestamp);
    let dt = effective.saturating_since(pool.last_update_timestamp);
    if dt > 0 && !pool.total_principal.is_zero() {
        let emitted = pool.reward_per_second.scale(dt)?;
        let delta = emitted.wad_div(pool.total_principal)?;
        pool.reward_index = pool.reward_index.checked_add(delta)?;
        pool.reward_owed = pool.reward_owed.checked_add(emitted)?;
    }
    if effective > pool.last_update_timestamp {
        pool.last_update_timestamp = effective;
    }
    Ok(())
}

/// Settle a position against the pool's current index.
///
/// Assumes `accrue_pool` already ran for the same `now`.
pub fn settle_user(pool: &PoolState, user: &mut UserPosition) -> Result<(), MathError> {
    let delta = pool.reward_index.checked_sub(user.index)?;
    if !delta.is_zero() {
        let earned = user.principal.wad_mul(delta)?;
        user.accrued_reward = user.accrued_reward.checked_add(earned)?;
    }
    user.index = pool.reward_index;
    Ok(())
}

/// Full checkpoint: pool accrual then user settlement, one time snapshot.
pub fn checkpoint(
    pool: &mut PoolState,
    user: &mut UserPosition,
    now: Timestamp,
) -> Result<(), MathError> {
    accrue_pool(pool, now)?;
    settle_user(pool, user)
}

/// What the pool's index would be after a checkpoint at `now`, without
/// mutating anything. Backs the pure query surface.
pub fn projected_index(pool: &PoolState, now: Timestamp) -> Result<Wad, MathError> {
    let mut copy = pool.clone();
    accrue_pool(&mut copy, now)?;
    Ok(copy.reward_index)
}

/// What a position's total pending reward would be after a checkpoint at
/// `now` (settled plus not-yet-settled), without mutating anything.
pub fn projected_reward(
    pool: &PoolState,
    user: &UserPosition,
    now: Timestamp,
) -> Result<Wad, MathError> {
    let index = projected_index(pool, now)?;
    let delta = index.checked_sub(user.index)?;
    let unsettled = user.principal.wad_mul(delta)?;
    user.accrued_reward.checked_add(unsettled)
}
