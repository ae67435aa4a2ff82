//! Per-round pool state and the derived round lifecycle state.

use crate::domain::{Timestamp, Wad};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a round, derived from the clock against its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundState {
    /// Initiated but not yet started (`now < start`).
    Scheduled,
    /// Accruing rewards (`start <= now < end`).
    Active,
    /// Past its end timestamp; the reward index is frozen.
    Finished,
}

/// Accounting state for one reward round.
///
/// One record per round; never deleted. Finished rounds stay queryable so
/// that late claims and migrations can still settle against them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Reward-asset smallest units emitted per second, WAD raw.
    pub reward_per_second: Wad,
    /// Cumulative reward per unit of principal, WAD-scaled.
    ///
    /// Non-decreasing while the round is live and principal is staked;
    /// frozen once `now >= end_timestamp`.
    pub reward_index: Wad,
    pub start_timestamp: Timestamp,
    /// May be pulled earlier by `close_pool` or reset by `extend_pool`,
    /// never pushed later by a close.
    pub end_timestamp: Timestamp,
    /// Sum of every position's principal in this round.
    pub total_principal: Wad,
    /// Time through which `reward_index` has been integrated.
    pub last_update_timestamp: Timestamp,
    /// Reward-asset balance earmarked for this round's payouts.
    pub reward_reserve: Wad,
    /// Reward emitted to stakers and not yet paid out. Grows with each
    /// accrual over non-zero principal, shrinks on claim; once the round is
    /// finished, the reserve beyond this is unearned and sweepable.
    pub reward_owed: Wad,
}

impl PoolState {
    pub fn new(
        reward_per_second: Wad,
        start: Timestamp,
        end: Timestamp,
        index_baseline: Wad,
        reserve: Wad,
    ) -> Self {
        PoolState {
            reward_per_second,
            reward_index: index_baseline,
            start_timestamp: start,
            end_timestamp: end,
            total_principal: Wad::ZERO,
            last_update_timestamp: start,
            reward_reserve: reserve,
            reward_owed: Wad::ZERO,
        }
    }

    pub fn state(&self, now: Timestamp) -> RoundState {
        if now < self.start_timestamp {
            RoundState::Scheduled
        } else if now < self.end_timestamp {
            RoundState::Active
        } else {
            RoundState::Finished
        }
    }

    pub fn is_finished(&self, now: Timestamp) -> bool {
        self.state(now) == RoundState::Finished
    }
}
