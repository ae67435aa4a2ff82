//! Per-(round, account) staking position.

use crate::domain::Wad;
use serde::{Deserialize, Serialize};

/// One depositor's position inside one round.
///
/// Created lazily on first stake. Persists after full withdrawal (possibly
/// with zero principal) so that already-settled reward stays claimable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPosition {
    /// Staked amount not yet withdrawn.
    pub principal: Wad,
    /// Pool reward index last observed by this position.
    pub index: Wad,
    /// Settled-but-unclaimed reward as of `index`. Reset to zero on claim.
    pub accrued_reward: Wad,
}

impl UserPosition {
    /// A fresh position joining the pool at its current index.
    ///
    /// Joining at the live index (rather than zero) is what prevents
    /// retroactive credit for time before the first stake.
    pub fn join_at(index: Wad) -> Self {
        UserPosition {
            principal: Wad::ZERO,
            index,
            accrued_reward: Wad::ZERO,
        }
    }

}
