//! In-memory custody: a plain balance book keyed by (account, asset).

use super::{Custody, CustodyError};
use crate::domain::{Account, Asset, Wad};
use std::collections::HashMap;

#[derive(Debug)]
pub struct InMemoryCustody {
    balances: HashMap<(Account, Asset), Wad>,
    vault: Account,
}

impl InMemoryCustody {
    pub fn new(vault: Account) -> Self {
        InMemoryCustody {
            balances: HashMap::new(),
            vault,
        }
    }

    /// Credit an account out of thin air. Test/bootstrap helper; a real
    /// custody backend has no equivalent.
    pub fn credit(&mut self, account: &Account, asset: &Asset, amount: Wad) {
        let entry = self
            .balances
            .entry((account.clone(), asset.clone()))
            .or_insert(Wad::ZERO);
        *entry = Wad(entry.raw().saturating_add(amount.raw()));
    }

    fn move_between(
        &mut self,
        from: &Account,
        to: &Account,
        asset: &Asset,
        amount: Wad,
    ) -> Result<(), CustodyError> {
        if amount.is_zero() {
            return Ok(());
        }
        let src = self
            .balances
            .get(&(from.clone(), asset.clone()))
            .copied()
            .unwrap_or(Wad::ZERO);
        let remaining = src
            .checked_sub(amount)
            .map_err(|_| CustodyError::InsufficientBalance {
                account: from.clone(),
                asset: asset.clone(),
            })?;
        let dst = self
            .balances
            .get(&(to.clone(), asset.clone()))
            .copied()
            .unwrap_or(Wad::ZERO);
        let credited = dst
            .checked_add(amount)
            .map_err(|_| CustodyError::BalanceOverflow {
                account: to.clone(),
                asset: asset.clone(),
            })?;
        self.balances.insert((from.clone(), asset.clone()), remaining);
        self.balances.insert((to.clone(), asset.clone()), credited);
        Ok(())
    }
}

impl Custody for InMemoryCustody {
    fn transfer_in(
        &mut self,
        from: &Account,
        asset: &Asset,
        amount: Wad,
    ) -> Result<(), CustodyError> {
        let vault = self.vault.clone();
        self.move_between(from, &vault, asset, amount)
    }

    fn transfer_out(
        &mut self,
        to: &Account,
        asset: &Asset,
        amount: Wad,
    ) -> Result<(), CustodyError> {
        let vault = self.vault.clone();
        self.move_between(&vault, to, asset, amount)
    }

    fn balance_of(&self, holder: &Account, asset: &Asset) -> Wad {
        self.balances
            .get(&(holder.clone(), asset.clone()))
            .copied()
            .unwrap_or(Wad::ZERO)
    }

    fn vault(&self) -> &Account {
        &self.vault
    }
}
