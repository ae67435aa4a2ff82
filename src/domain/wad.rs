//! Deterministic WAD fixed-point arithmetic.
//!
//! All reward-index and reward-amount math routes through `wad_mul`/`wad_div`
//! so that rounding is reproducible across runs and platforms. Native floats
//! are never used in accounting paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fixed-point scale factor: 10^18.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Arithmetic failure inside the fixed-point layer.
///
/// `DivisionByZero` is unreachable from the public operations (the checkpoint
/// guards the empty-pool case) but kept as an explicit invariant rather than
/// a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
}

/// A WAD-scaled unsigned fixed-point quantity.
///
/// Raw units: the smallest unit of the underlying asset, or a WAD-scaled
/// index value. `Wad(WAD)` reads as 1.0.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Wad(pub u128);

impl Wad {
    pub const ZERO: Wad = Wad(0);

    /// The value 1.0 (one whole unit).
    pub const ONE: Wad = Wad(WAD);

    /// Construct from raw smallest units.
    pub fn from_raw(raw: u128) -> Self {
        Wad(raw)
    }

    /// Construct from a whole-unit count (`n * 10^18` raw).
    pub fn from_units(n: u64) -> Self {
        Wad(n as u128 * WAD)
    }

    /// Raw smallest-unit value.
    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `(a * b + WAD/2) / WAD`, rounding half away from zero.
    pub fn wad_mul(self, rhs: Wad) -> Result<Wad, MathError> {
        let prod = self
            .0
            .checked_mul(rhs.0)
            .ok_or(MathError::Overflow)?
            .checked_add(WAD / 2)
            .ok_or(MathError::Overflow)?;
        Ok(Wad(prod / WAD))
    }

    /// `(a * WAD + b/2) / b`, rounding half away from zero.
    ///
    /// # Errors
    /// `DivisionByZero` when `rhs` is zero.
    pub fn wad_div(self, rhs: Wad) -> Result<Wad, MathError> {
        if rhs.0 == 0 {
            return Err(MathError::DivisionByZero);
        }
        let num = self
            .0
            .checked_mul(WAD)
            .ok_or(MathError::Overflow)?
            .checked_add(rhs.0 / 2)
            .ok_or(MathError::Overflow)?;
        Ok(Wad(num / rhs.0))
    }

    /// Plain integer multiply by a scalar (e.g. rate-per-second × seconds).
    pub fn scale(self, factor: u64) -> Result<Wad, MathError> {
        self.0
            .checked_mul(factor as u128)
            .map(Wad)
            .ok_or(MathError::Overflow)
    }

    pub fn checked_add(self, rhs: Wad) -> Result<Wad, MathError> {
        self.0.checked_add(rhs.0).map(Wad).ok_or(MathError::Overflow)
    }

    /// Subtraction that treats underflow as a broken invariant.
    pub fn checked_sub(self, rhs: Wad) -> Result<Wad, MathError> {
        self.0.checked_sub(rhs.0).map(Wad).ok_or(MathError::Overflow)
    }

    pub fn saturating_sub(self, rhs: Wad) -> Wad {
        Wad(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Wad {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u128>().map(Wad)
    }
}

impl From<u128> for Wad {
    fn from(raw: u128) -> Self {
        Wad(raw)
    }
}
