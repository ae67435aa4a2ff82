//! In-memory ledger: every pool and position read/write goes through here.
//!
//! Rounds live in a `BTreeMap` keyed by id (ordered, so "latest" and range
//! queries are cheap); positions in a `HashMap` keyed by (round, account).
//! Records are never deleted — finished rounds must stay resolvable for late
//! claims and migrations.

use crate::domain::{Account, PoolState, RoundId, UserPosition, Wad};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct Ledger {
    rounds: BTreeMap<RoundId, PoolState>,
    positions: HashMap<(RoundId, Account), UserPosition>,
    /// Most recently initiated round, if any. At most one round is ever
    /// open; older rounds are all finished or closed.
    current_round: Option<RoundId>,
    /// While set, claims are rejected; stake/withdraw stay operational.
    emergency: bool,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_round(&self) -> Option<RoundId> {
        self.current_round
    }

    /// Allocate the next round id and insert its pool as the current round.
    pub fn insert_round(&mut self, pool: PoolState) -> RoundId {
        let id = self
            .current_round
            .map(|r| r.next())
            .unwrap_or(RoundId::new(1));
        self.rounds.insert(id, pool);
        self.current_round = Some(id);
        id
    }

    pub fn pool(&self, round: RoundId) -> Option<&PoolState> {
        self.rounds.get(&round)
    }

    pub fn pool_mut(&mut self, round: RoundId) -> Option<&mut PoolState> {
        self.rounds.get_mut(&round)
    }

    pub fn position(&self, round: RoundId, account: &Account) -> Option<&UserPosition> {
        self.positions.get(&(round, account.clone()))
    }

    /// Write back a position that was mutated on a working copy. Positions
    /// are created this way on first stake and never deleted.
    pub fn put_position(&mut self, round: RoundId, account: &Account, position: UserPosition) {
        self.positions.insert((round, account.clone()), position);
    }

    /// Sum of position principal for one round. Used by the conservation
    /// check after each mutation.
    pub fn principal_sum(&self, round: RoundId) -> Wad {
        Wad(self
            .positions
            .iter()
            .filter(|((r, _), _)| *r == round)
            .map(|(_, p)| p.principal.raw())
            .sum())
    }

    /// Total principal across every round (for same-asset residue math).
    pub fn total_principal_all_rounds(&self) -> Wad {
        Wad(self.rounds.values().map(|p| p.total_principal.raw()).sum())
    }

    /// Every round's pool, ascending by round id.
    pub fn pools(&self) -> impl Iterator<Item = &PoolState> {
        self.rounds.values()
    }

    pub fn pools_mut(&mut self) -> impl Iterator<Item = &mut PoolState> {
        self.rounds.values_mut()
    }

    pub fn emergency(&self) -> bool {
        self.emergency
    }

    pub fn set_emergency(&mut self, on: bool) {
        self.emergency = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    fn pool() -> PoolState {
        PoolState::new(
            Wad::from_units(1),
            Timestamp::new(0),
            Timestamp::new(100),
            Wad::ONE,
            Wad::from_units(100),
        )
    }

    #[test]
    fn round_ids_are_monotonic() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.current_round(), None);
        let r1 = ledger.insert_round(pool());
        let r2 = ledger.insert_round(pool());
        assert_eq!(r1, RoundId::new(1));
        assert_eq!(r2, RoundId::new(2));
        assert_eq!(ledger.current_round(), Some(r2));
        // older rounds remain resolvable
        assert!(ledger.pool(r1).is_some());
    }

    fn staked(principal_units: u64) -> UserPosition {
        let mut p = UserPosition::join_at(Wad::ONE);
        p.principal = Wad::from_units(principal_units);
        p
    }

    #[test]
    fn positions_persist_once_written() {
        let mut ledger = Ledger::new();
        let r = ledger.insert_round(pool());
        let alice = Account::new("alice");
        assert!(ledger.position(r, &alice).is_none());

        ledger.put_position(r, &alice, staked(5));
        let pos = ledger.position(r, &alice).unwrap();
        assert_eq!(pos.principal, Wad::from_units(5));
        assert_eq!(pos.index, Wad::ONE);
    }

    #[test]
    fn principal_sum_scoped_to_round() {
        let mut ledger = Ledger::new();
        let r1 = ledger.insert_round(pool());
        let r2 = ledger.insert_round(pool());
        ledger.put_position(r1, &Account::new("a"), staked(3));
        ledger.put_position(r2, &Account::new("a"), staked(4));
        ledger.put_position(r2, &Account::new("b"), staked(1));
        assert_eq!(ledger.principal_sum(r1), Wad::from_units(3));
        assert_eq!(ledger.principal_sum(r2), Wad::from_units(5));
    }
}
