//! The operation facade: the engine's entire public mutation surface.
//!
//! Every operation follows the same shape: read `now` once, validate, run
//! the engine math on working copies of the touched records, move assets,
//! then commit the copies. A failure at any step leaves the ledger exactly
//! as it was — operations are all-or-nothing.

use crate::auth::RoleBook;
use crate::clock::Clock;
use crate::custody::{Custody, CustodyError};
use crate::domain::{
    Account, Asset, MathError, PoolState, RoundId, RoundState, Timestamp, UserPosition, Wad,
};
use crate::engine;
use crate::ledger::Ledger;
use std::sync::Arc;
use thiserror::Error;

/// Rejected-operation outcomes. No variant leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("caller is not the admin")]
    OnlyAdmin,
    #[error("caller is not a manager")]
    OnlyManager,
    #[error("no staking round has been initiated")]
    StakingNotInitiated,
    #[error("a round is still open; finish or close it before initiating another")]
    RoundConflicted,
    #[error("round has finished")]
    Finished,
    #[error("round is closed to this operation")]
    Closed,
    #[error("round is current, future, or nonexistent")]
    NotInitiatedRound,
    #[error("amount or duration out of range")]
    InvalidAmount,
    #[error("amount exceeds staked principal")]
    NotEnoughPrincipal,
    #[error("no staked position to draw from")]
    ZeroPrincipal,
    #[error("no reward accrued")]
    ZeroReward,
    #[error("claims are disabled while emergency mode is set")]
    Emergency,
    #[error(transparent)]
    Math(#[from] MathError),
    #[error(transparent)]
    Custody(#[from] CustodyError),
}

/// Amount selector for withdraw/migrate: an exact figure or the sentinel
/// "everything I have".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amount {
    All,
    Exact(Wad),
}

/// Read-only snapshot of a pool, index projected to `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolView {
    pub round: RoundId,
    pub state: RoundState,
    pub reward_per_second: Wad,
    pub reward_index: Wad,
    pub start_timestamp: Timestamp,
    pub end_timestamp: Timestamp,
    pub total_principal: Wad,
    pub reward_reserve: Wad,
}

/// Read-only snapshot of a position, reward projected to `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub round: RoundId,
    pub account: Account,
    pub principal: Wad,
    pub index: Wad,
    pub pending_reward: Wad,
}

/// Result of a migration: how much principal moved and how much source
/// reward was paid out on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReceipt {
    pub moved: Wad,
    pub reward_paid: Wad,
}

pub struct StakingFacade<C: Custody> {
    ledger: Ledger,
    custody: C,
    roles: RoleBook,
    clock: Arc<dyn Clock>,
    stake_asset: Asset,
    reward_asset: Asset,
    index_baseline: Wad,
}

impl<C: Custody> StakingFacade<C> {
    pub fn new(
        custody: C,
        roles: RoleBook,
        clock: Arc<dyn Clock>,
        stake_asset: Asset,
        reward_asset: Asset,
        index_baseline: Wad,
    ) -> Self {
        StakingFacade {
            ledger: Ledger::new(),
            custody,
            roles,
            clock,
            stake_asset,
            reward_asset,
            index_baseline,
        }
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    pub fn emergency(&self) -> bool {
        self.ledger.emergency()
    }

    // ---- mutations ------------------------------------------------------

    /// Create and fund a new round. Fails while any round is still open.
    pub fn init_round(
        &mut self,
        caller: &Account,
        reward_per_second: Wad,
        start: Timestamp,
        duration: u64,
    ) -> Result<RoundId, StakingError> {
        let now = self.clock.now();
        self.require_admin(caller)?;
        if duration == 0 || start.checked_plus(duration).is_none() {
            return Err(StakingError::InvalidAmount);
        }
        if let Some(current) = self.ledger.current_round() {
            let pool = self.pool(current)?;
            if !pool.is_finished(now) {
                return Err(StakingError::RoundConflicted);
            }
        }

        let new = engine::new_round(reward_per_second, start, duration, self.index_baseline)?;
        self.custody
            .transfer_in(caller, &self.reward_asset, new.funding)?;
        let round = self.ledger.insert_round(new.pool);
        tracing::info!(%round, %caller, funding = %new.funding, "round initiated");
        Ok(round)
    }

    /// Stake into the current round.
    pub fn stake(&mut self, caller: &Account, amount: Wad) -> Result<(), StakingError> {
        let now = self.clock.now();
        if amount.is_zero() {
            return Err(StakingError::InvalidAmount);
        }
        let round = self.current_round().ok_or(StakingError::StakingNotInitiated)?;
        let mut pool = self.pool(round)?.clone();
        if pool.is_finished(now) {
            return Err(StakingError::Closed);
        }

        engine::accrue_pool(&mut pool, now)?;
        let mut position = self.position_or_join(round, caller, pool.reward_index);
        engine::settle_user(&pool, &mut position)?;

        position.principal = position.principal.checked_add(amount)?;
        pool.total_principal = pool.total_principal.checked_add(amount)?;

        self.custody.transfer_in(caller, &self.stake_asset, amount)?;
        self.commit(round, pool, caller, position);
        tracing::info!(%round, %caller, %amount, "stake");
        Ok(())
    }

    /// Withdraw principal from a round (default: the current one). Works on
    /// finished rounds too — exit is never gated by the schedule.
    pub fn withdraw(
        &mut self,
        caller: &Account,
        amount: Amount,
        round: Option<RoundId>,
    ) -> Result<Wad, StakingError> {
        let now = self.clock.now();
        let round = self.resolve_round(round)?;
        let mut pool = self.pool(round)?.clone();

        engine::accrue_pool(&mut pool, now)?;
        // positions materialize on first stake only; there is nothing to
        // draw from (or to commit) for an account that never staked here
        let mut position = self
            .ledger
            .position(round, caller)
            .cloned()
            .ok_or(StakingError::ZeroPrincipal)?;
        engine::settle_user(&pool, &mut position)?;

        let requested = match amount {
            Amount::All => position.principal,
            Amount::Exact(a) => a,
        };
        if requested > position.principal {
            return Err(StakingError::NotEnoughPrincipal);
        }

        position.principal = position.principal.checked_sub(requested)?;
        pool.total_principal = pool.total_principal.checked_sub(requested)?;

        self.custody
            .transfer_out(caller, &self.stake_asset, requested)?;
        self.commit(round, pool, caller, position);
        tracing::info!(%round, %caller, amount = %requested, "withdraw");
        Ok(requested)
    }

    /// Pay out settled reward from a round (default: the current one).
    /// The only operation disabled by emergency mode.
    pub fn claim(
        &mut self,
        caller: &Account,
        round: Option<RoundId>,
    ) -> Result<Wad, StakingError> {
        let now = self.clock.now();
        if self.ledger.emergency() {
            return Err(StakingError::Emergency);
        }
        let round = self.resolve_round(round)?;
        let mut pool = self.pool(round)?.clone();

        engine::accrue_pool(&mut pool, now)?;
        let mut position = self.position_or_join(round, caller, pool.reward_index);
        engine::settle_user(&pool, &mut position)?;

        let reward = position.accrued_reward;
        if reward.is_zero() {
            return Err(StakingError::ZeroReward);
        }
        pool.reward_reserve = pool.reward_reserve.checked_sub(reward)?;
        // per-position rounding can leave the pool-level figure a few raw
        // units behind the sum of settlements, hence the saturation
        pool.reward_owed = pool.reward_owed.saturating_sub(reward);
        position.accrued_reward = Wad::ZERO;

        self.custody
            .transfer_out(caller, &self.reward_asset, reward)?;
        self.commit(round, pool, caller, position);
        tracing::info!(%round, %caller, %reward, "claim");
        Ok(reward)
    }

    /// Re-rate and re-schedule the current round: checkpoint under the old
    /// rate, then run `duration` seconds from now at `new_rate`.
    pub fn extend_pool(
        &mut self,
        caller: &Account,
        new_rate: Wad,
        duration: u64,
    ) -> Result<(), StakingError> {
        let now = self.clock.now();
        self.require_manager(caller)?;
        if duration == 0 || now.checked_plus(duration).is_none() {
            return Err(StakingError::InvalidAmount);
        }
        let round = self.current_round().ok_or(StakingError::StakingNotInitiated)?;
        let mut pool = self.pool(round)?.clone();
        if pool.is_finished(now) {
            return Err(StakingError::Finished);
        }

        let top_up = engine::extend(&mut pool, new_rate, duration, now)?;
        self.custody
            .transfer_in(caller, &self.reward_asset, top_up)?;
        *self
            .ledger
            .pool_mut(round)
            .expect("round existed above") = pool;
        tracing::info!(%round, %caller, rate = %new_rate, duration, %top_up, "pool extended");
        Ok(())
    }

    /// Force the current round's end to now (never earlier than its start).
    pub fn close_pool(&mut self, caller: &Account) -> Result<(), StakingError> {
        let now = self.clock.now();
        self.require_admin(caller)?;
        let round = self.current_round().ok_or(StakingError::StakingNotInitiated)?;
        let mut pool = self.pool(round)?.clone();

        engine::close(&mut pool, now)?;
        let end = pool.end_timestamp;
        *self
            .ledger
            .pool_mut(round)
            .expect("round existed above") = pool;
        tracing::info!(%round, %caller, end = end.as_secs(), "pool closed");
        Ok(())
    }

    /// Move stake from a finished round into the current one, settling the
    /// source reward on the way (an implicit claim).
    pub fn migrate(
        &mut self,
        caller: &Account,
        amount: Amount,
        from: RoundId,
    ) -> Result<MigrationReceipt, StakingError> {
        let now = self.clock.now();
        let dst_round = self.current_round().ok_or(StakingError::StakingNotInitiated)?;
        if from >= dst_round {
            // the current round itself, or one that does not exist yet
            return Err(StakingError::NotInitiatedRound);
        }
        let mut src_pool = self
            .ledger
            .pool(from)
            .ok_or(StakingError::NotInitiatedRound)?
            .clone();
        if !src_pool.is_finished(now) {
            return Err(StakingError::NotInitiatedRound);
        }
        let mut dst_pool = self.pool(dst_round)?.clone();
        if dst_pool.is_finished(now) {
            return Err(StakingError::Closed);
        }

        let mut src_user = self
            .ledger
            .position(from, caller)
            .cloned()
            .ok_or(StakingError::ZeroPrincipal)?;
        let moved = match amount {
            Amount::All => src_user.principal,
            Amount::Exact(a) => {
                if !a.is_zero() && src_user.principal.is_zero() {
                    return Err(StakingError::ZeroPrincipal);
                }
                if a > src_user.principal {
                    return Err(StakingError::NotEnoughPrincipal);
                }
                a
            }
        };
        let mut dst_user = self
            .ledger
            .position(dst_round, caller)
            .cloned()
            .unwrap_or_else(|| {
                UserPosition::join_at(dst_pool.reward_index)
            });

        let reward_paid = engine::migrate(
            &mut src_pool,
            &mut src_user,
            &mut dst_pool,
            &mut dst_user,
            moved,
            now,
        )?;
        self.custody
            .transfer_out(caller, &self.reward_asset, reward_paid)?;

        self.commit(from, src_pool, caller, src_user);
        self.commit(dst_round, dst_pool, caller, dst_user);
        tracing::info!(%from, to = %dst_round, %caller, %moved, %reward_paid, "migrate");
        Ok(MigrationReceipt { moved, reward_paid })
    }

    /// Sweep reward-asset balance held by the vault beyond what is owed.
    ///
    /// An open round's full reserve stays earmarked (it may still be
    /// emitted), but a finished round owes only what actually accrued to
    /// stakers and was not yet paid — the unearned remainder of its reserve
    /// is sweepable. When the staking and reward assets coincide, staked
    /// principal is excluded from the sweep.
    pub fn retrieve_residue(&mut self, caller: &Account) -> Result<Wad, StakingError> {
        let now = self.clock.now();
        self.require_admin(caller)?;
        for pool in self.ledger.pools_mut() {
            engine::accrue_pool(pool, now)?;
        }

        let held = self
            .custody
            .balance_of(self.custody.vault(), &self.reward_asset);
        let mut owed = Wad::ZERO;
        for pool in self.ledger.pools() {
            let earmarked = if pool.is_finished(now) {
                pool.reward_owed.min(pool.reward_reserve)
            } else {
                pool.reward_reserve
            };
            owed = owed.checked_add(earmarked)?;
        }
        if self.stake_asset == self.reward_asset {
            owed = owed.checked_add(self.ledger.total_principal_all_rounds())?;
        }
        let residue = held.saturating_sub(owed);
        if !residue.is_zero() {
            self.custody
                .transfer_out(caller, &self.reward_asset, residue)?;
            // finished rounds keep only what they still owe on their books
            for pool in self.ledger.pools_mut() {
                if pool.is_finished(now) {
                    pool.reward_reserve = pool.reward_reserve.min(pool.reward_owed);
                }
            }
        }
        tracing::info!(%caller, %residue, "residue retrieved");
        Ok(residue)
    }

    /// Toggle the claim gate.
    pub fn set_emergency(&mut self, caller: &Account, on: bool) -> Result<(), StakingError> {
        self.require_admin(caller)?;
        self.ledger.set_emergency(on);
        tracing::warn!(%caller, emergency = on, "emergency flag set");
        Ok(())
    }

    pub fn set_manager(&mut self, caller: &Account, manager: Account) -> Result<(), StakingError> {
        self.require_admin(caller)?;
        self.roles.set_manager(manager);
        Ok(())
    }

    pub fn revoke_manager(
        &mut self,
        caller: &Account,
        manager: &Account,
    ) -> Result<(), StakingError> {
        self.require_admin(caller)?;
        self.roles.revoke_manager(manager);
        Ok(())
    }

    // ---- pure queries ---------------------------------------------------

    pub fn current_round(&self) -> Option<RoundId> {
        self.ledger.current_round()
    }

    /// Pool snapshot with the index projected to now. Never mutates state.
    pub fn get_pool_data(&self, round: Option<RoundId>) -> Result<PoolView, StakingError> {
        let now = self.clock.now();
        let round = self.resolve_round(round)?;
        let pool = self.pool(round)?;
        Ok(PoolView {
            round,
            state: pool.state(now),
            reward_per_second: pool.reward_per_second,
            reward_index: engine::projected_index(pool, now)?,
            start_timestamp: pool.start_timestamp,
            end_timestamp: pool.end_timestamp,
            total_principal: pool.total_principal,
            reward_reserve: pool.reward_reserve,
        })
    }

    /// Position snapshot with reward projected to now. An account that never
    /// staked in the round reads as an empty position.
    pub fn get_user_data(
        &self,
        account: &Account,
        round: Option<RoundId>,
    ) -> Result<UserView, StakingError> {
        let now = self.clock.now();
        let round = self.resolve_round(round)?;
        let pool = self.pool(round)?;
        let index = engine::projected_index(pool, now)?;
        match self.ledger.position(round, account) {
            Some(position) => Ok(UserView {
                round,
                account: account.clone(),
                principal: position.principal,
                index: position.index,
                pending_reward: engine::projected_reward(pool, position, now)?,
            }),
            None => Ok(UserView {
                round,
                account: account.clone(),
                principal: Wad::ZERO,
                index,
                pending_reward: Wad::ZERO,
            }),
        }
    }

    pub fn get_reward_index(&self, round: Option<RoundId>) -> Result<Wad, StakingError> {
        let now = self.clock.now();
        let round = self.resolve_round(round)?;
        engine::projected_index(self.pool(round)?, now).map_err(Into::into)
    }

    // ---- internals ------------------------------------------------------

    fn require_admin(&self, caller: &Account) -> Result<(), StakingError> {
        if self.roles.is_admin(caller) {
            Ok(())
        } else {
            Err(StakingError::OnlyAdmin)
        }
    }

    fn require_manager(&self, caller: &Account) -> Result<(), StakingError> {
        if self.roles.is_manager(caller) {
            Ok(())
        } else {
            Err(StakingError::OnlyManager)
        }
    }

    /// Default an omitted round id to the current round; an explicit id must
    /// name a round that exists.
    fn resolve_round(&self, round: Option<RoundId>) -> Result<RoundId, StakingError> {
        match round {
            Some(r) => {
                if self.ledger.pool(r).is_some() {
                    Ok(r)
                } else {
                    Err(StakingError::NotInitiatedRound)
                }
            }
            None => self
                .ledger
                .current_round()
                .ok_or(StakingError::StakingNotInitiated),
        }
    }

    fn pool(&self, round: RoundId) -> Result<&PoolState, StakingError> {
        self.ledger
            .pool(round)
            .ok_or(StakingError::NotInitiatedRound)
    }

    fn position_or_join(&self, round: RoundId, account: &Account, join_index: Wad) -> UserPosition {
        self.ledger
            .position(round, account)
            .cloned()
            .unwrap_or_else(|| UserPosition::join_at(join_index))
    }

    /// Commit working copies; debug builds assert principal conservation.
    fn commit(&mut self, round: RoundId, pool: PoolState, account: &Account, position: UserPosition) {
        let total = pool.total_principal;
        if let Some(slot) = self.ledger.pool_mut(round) {
            *slot = pool;
        }
        self.ledger.put_position(round, account, position);
        debug_assert_eq!(
            total,
            self.ledger.principal_sum(round),
            "principal conservation violated in round {round}"
        );
    }
}
