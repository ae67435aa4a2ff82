//! Domain types and determinism layer for the staking-reward engine.
//!
//! This module provides:
//! - Deterministic WAD fixed-point math (no floats in accounting paths)
//! - Domain primitives: Timestamp, RoundId, Account, Asset
//! - The ledger records: PoolState (one per round) and UserPosition
//!   (one per round × account)

pub mod pool;
pub mod position;
pub mod primitives;
pub mod wad;

pub use pool::{PoolState, RoundState};
pub use position::UserPosition;
pub use primitives::{Account, Asset, RoundId, Timestamp};
pub use wad::{MathError, Wad, WAD};
