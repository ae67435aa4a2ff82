//! Round lifecycle rules: init, extend, close.
//!
//! Pure functions over pool records. Role checks and asset movement stay in
//! the facade; this module only decides what a legal transition looks like.

use crate::domain::{MathError, PoolState, Timestamp, Wad};
use crate::engine::accrual;

/// Outcome of validating/funding a new round.
pub struct NewRound {
    pub pool: PoolState,
    /// Reward asset the caller must fund the reserve with (`rate * duration`).
    pub funding: Wad,
}

/// Build the pool for a new round.
///
/// The single-active-round check (`RoundConflicted`) happens in the facade,
/// which can see the previous round; this function only shapes the record.
pub fn new_round(
    reward_per_second: Wad,
    start: Timestamp,
    duration: u64,
    index_baseline: Wad,
) -> Result<NewRound, MathError> {
    let funding = reward_per_second.scale(duration)?;
    let end = start.checked_plus(duration).ok_or(MathError::Overflow)?;
    let pool = PoolState::new(reward_per_second, start, end, index_baseline, funding);
    Ok(NewRound { pool, funding })
}

/// Extend a live round: checkpoint under the old rate, then switch.
///
/// The new schedule runs `duration` seconds from `now` (the clock resets, it
/// does not append to the old end), and the reserve is topped up by the new
/// rate over that window. Reward earned before the switch is untouched.
pub fn extend(
    pool: &mut PoolState,
    new_rate: Wad,
    duration: u64,
    now: Timestamp,
) -> Result<Wad, MathError> {
    accrual::accrue_pool(pool, now)?;
    let top_up = new_rate.scale(duration)?;
    pool.reward_per_second = new_rate;
    pool.end_timestamp = now.checked_plus(duration).ok_or(MathError::Overflow)?;
    pool.reward_reserve = pool.reward_reserve.checked_add(top_up)?;
    Ok(top_up)
}

/// Force the round's end to `now` (never before `start`, never later than
/// the current end). Closing an already-finished round is a no-op.
///
/// The checkpoint runs first so closure only clamps future accrual; it never
/// rewrites what a checkpoint at close time would have produced.
pub fn close(pool: &mut PoolState, now: Timestamp) -> Result<(), MathError> {
    accrual::accrue_pool(pool, now)?;
    let clamped = now.max(pool.start_timestamp).min(pool.end_timestamp);
    pool.end_timestamp = clamped;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoundState;

    #[test]
    fn new_round_funds_rate_times_duration() {
        let r = new_round(Wad::from_units(2), Timestamp::new(100), 50, Wad::ZERO).unwrap();
        assert_eq!(r.funding, Wad::from_units(100));
        assert_eq!(r.pool.reward_reserve, Wad::from_units(100));
        assert_eq!(r.pool.end_timestamp, Timestamp::new(150));
    }

    #[test]
    fn new_round_rejects_a_schedule_past_representable_time() {
        let r = new_round(Wad::from_units(1), Timestamp::new(u64::MAX), 100, Wad::ZERO);
        assert!(matches!(r, Err(MathError::Overflow)));
    }

    #[test]
    fn extend_resets_the_clock() {
        let mut pool = new_round(Wad::from_units(1), Timestamp::new(0), 100, Wad::ZERO)
            .unwrap()
            .pool;
        pool.total_principal = Wad::from_units(10);

        let top_up = extend(&mut pool, Wad::from_units(3), 40, Timestamp::new(10)).unwrap();
        assert_eq!(top_up, Wad::from_units(120));
        assert_eq!(pool.end_timestamp, Timestamp::new(50));
        assert_eq!(pool.reward_per_second, Wad::from_units(3));
        // prior accrual settled under the old rate: 10s * 1 / 10 = 1.0
        assert_eq!(pool.reward_index, Wad::ONE);
        assert_eq!(pool.last_update_timestamp, Timestamp::new(10));
        assert_eq!(pool.reward_reserve, Wad::from_units(220));
    }

    #[test]
    fn close_clamps_to_now() {
        let mut pool = new_round(Wad::from_units(1), Timestamp::new(0), 100, Wad::ZERO)
            .unwrap()
            .pool;
        close(&mut pool, Timestamp::new(30)).unwrap();
        assert_eq!(pool.end_timestamp, Timestamp::new(30));
        assert_eq!(pool.state(Timestamp::new(30)), RoundState::Finished);
    }

    #[test]
    fn close_before_start_clamps_to_start() {
        let mut pool = new_round(Wad::from_units(1), Timestamp::new(100), 50, Wad::ZERO)
            .unwrap()
            .pool;
        close(&mut pool, Timestamp::new(20)).unwrap();
        assert_eq!(pool.end_timestamp, Timestamp::new(100));
    }

    #[test]
    fn close_never_extends_a_finished_round() {
        let mut pool = new_round(Wad::from_units(1), Timestamp::new(0), 10, Wad::ZERO)
            .unwrap()
            .pool;
        close(&mut pool, Timestamp::new(500)).unwrap();
        assert_eq!(pool.end_timestamp, Timestamp::new(10));
    }
}
