//! Cross-round stake migration.
//!
//! Composes two checkpoints — source round, then destination round — with
//! the same time snapshot. Round-selection and amount validation live in the
//! facade; this function assumes a legal move and performs the settlement.

use crate::domain::{MathError, PoolState, Timestamp, UserPosition, Wad};
use crate::engine::accrual;

/// Move `amount` of principal from a finished round's position into the
/// active round's position.
///
/// The source's settled reward is paid out immediately (an implicit claim
/// against the source reserve) and is returned to the caller for the actual
/// asset transfer; migrated reward is never carried as principal. The
/// destination position joins at the destination's current index, so the
/// moved principal starts earning at the migration instant with no
/// back-dated credit.
pub fn migrate(
    src_pool: &mut PoolState,
    src_user: &mut UserPosition,
    dst_pool: &mut PoolState,
    dst_user: &mut UserPosition,
    amount: Wad,
    now: Timestamp,
) -> Result<Wad, MathError> {
    accrual::checkpoint(src_pool, src_user, now)?;

    let reward_paid = src_user.accrued_reward;
    if !reward_paid.is_zero() {
        src_pool.reward_reserve = src_pool.reward_reserve.checked_sub(reward_paid)?;
        src_pool.reward_owed = src_pool.reward_owed.saturating_sub(reward_paid);
        src_user.accrued_reward = Wad::ZERO;
    }

    src_user.principal = src_user.principal.checked_sub(amount)?;
    src_pool.total_principal = src_pool.total_principal.checked_sub(amount)?;

    accrual::checkpoint(dst_pool, dst_user, now)?;
    dst_user.principal = dst_user.principal.checked_add(amount)?;
    dst_pool.total_principal = dst_pool.total_principal.checked_add(amount)?;

    Ok(reward_paid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_pool() -> PoolState {
        let mut p = PoolState::new(
            Wad::from_units(1),
            Timestamp::new(0),
            Timestamp::new(10),
            Wad::ZERO,
            Wad::from_units(10),
        );
        p.total_principal = Wad::from_units(3);
        p
    }

    fn active_pool() -> PoolState {
        let mut p = PoolState::new(
            Wad::from_units(2),
            Timestamp::new(100),
            Timestamp::new(200),
            Wad::ZERO,
            Wad::from_units(200),
        );
        p.total_principal = Wad::from_units(2);
        p
    }

    #[test]
    fn full_migration_moves_principal_and_joins_at_current_index() {
        let mut src = finished_pool();
        let mut src_user = UserPosition::join_at(Wad::ZERO);
        src_user.principal = Wad::from_units(3);

        let mut dst = active_pool();
        let mut dst_user = UserPosition::join_at(dst.reward_index);

        let now = Timestamp::new(150);
        let paid = migrate(
            &mut src,
            &mut src_user,
            &mut dst,
            &mut dst_user,
            Wad::from_units(3),
            now,
        )
        .unwrap();

        // the full 10s of the source round accrued to the sole staker;
        // emission over principal 3 rounds down by one raw unit
        assert_eq!(paid, Wad(9_999_999_999_999_999_999));
        assert_eq!(src_user.principal, Wad::ZERO);
        assert_eq!(src_user.accrued_reward, Wad::ZERO);
        assert_eq!(src.total_principal, Wad::ZERO);
        assert_eq!(src.reward_reserve, Wad(1));

        assert_eq!(dst_user.principal, Wad::from_units(3));
        assert_eq!(dst.total_principal, Wad::from_units(5));
        // no retroactive credit in the destination
        assert_eq!(dst_user.index, dst.reward_index);
        assert_eq!(dst_user.accrued_reward, Wad::ZERO);
    }

    #[test]
    fn partial_migration_leaves_remainder_staked() {
        let mut src = finished_pool();
        let mut src_user = UserPosition::join_at(Wad::ZERO);
        src_user.principal = Wad::from_units(3);

        let mut dst = active_pool();
        let mut dst_user = UserPosition::join_at(dst.reward_index);

        migrate(
            &mut src,
            &mut src_user,
            &mut dst,
            &mut dst_user,
            Wad::from_units(1),
            Timestamp::new(150),
        )
        .unwrap();

        assert_eq!(src_user.principal, Wad::from_units(2));
        assert_eq!(src.total_principal, Wad::from_units(2));
        assert_eq!(dst_user.principal, Wad::from_units(1));
        assert_eq!(dst.total_principal, Wad::from_units(3));
    }

    #[test]
    fn existing_destination_stake_settles_before_the_move() {
        let mut src = finished_pool();
        let mut src_user = UserPosition::join_at(Wad::ZERO);
        src_user.principal = Wad::from_units(3);

        let mut dst = active_pool();
        let mut dst_user = UserPosition::join_at(dst.reward_index);
        dst_user.principal = Wad::from_units(2);

        // 50s into the destination round at rate 2 over principal 2: index 50
        let now = Timestamp::new(150);
        migrate(
            &mut src,
            &mut src_user,
            &mut dst,
            &mut dst_user,
            Wad::from_units(3),
            now,
        )
        .unwrap();

        assert_eq!(dst.reward_index, Wad::from_units(50));
        assert_eq!(dst_user.accrued_reward, Wad::from_units(100));
        assert_eq!(dst_user.principal, Wad::from_units(5));
    }
}
