//! Asset-custody seam.
//!
//! The engine never holds tokens itself; it instructs a custody collaborator
//! to move them and reads balances back. In production this would wrap a
//! token bridge; in this repo and in tests it is an in-memory balance book.

pub mod memory;

pub use memory::InMemoryCustody;

use crate::domain::{Account, Asset, Wad};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("insufficient balance: {account} holds too little {asset}")]
    InsufficientBalance { account: Account, asset: Asset },
    #[error("balance overflow for {account} in {asset}")]
    BalanceOverflow { account: Account, asset: Asset },
}

/// Fungible-token operations the engine consumes.
///
/// `vault` is the engine's own holding account; `transfer_in` pulls from a
/// depositor into the vault, `transfer_out` pays from the vault.
pub trait Custody: Send + Sync {
    fn transfer_in(&mut self, from: &Account, asset: &Asset, amount: Wad)
        -> Result<(), CustodyError>;

    fn transfer_out(&mut self, to: &Account, asset: &Asset, amount: Wad)
        -> Result<(), CustodyError>;

    fn balance_of(&self, holder: &Account, asset: &Asset) -> Wad;

    /// The engine's holding account.
    fn vault(&self) -> &Account;
}
