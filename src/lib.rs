pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod custody;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod ops;

pub use auth::RoleBook;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use custody::{Custody, CustodyError, InMemoryCustody};
pub use domain::{
    Account, Asset, MathError, PoolState, RoundId, RoundState, Timestamp, UserPosition, Wad, WAD,
};
pub use error::AppError;
pub use ledger::Ledger;
pub use ops::{Amount, MigrationReceipt, PoolView, StakingError, StakingFacade, UserView};
