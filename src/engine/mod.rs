//! Pure computation engines for the staking ledger.
//!
//! No I/O and no role checks here: records in, records out. The facade owns
//! sequencing (checkpoint → mutation → conservation check) and custody.

pub mod accrual;
pub mod lifecycle;
pub mod migration;

pub use accrual::{accrue_pool, checkpoint, projected_index, projected_reward, settle_user};
pub use lifecycle::{close, extend, new_round, NewRound};
pub use migration::migrate;
