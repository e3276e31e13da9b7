//! Exact rational duty cycles.

use crate::frequency::gcd;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A clock duty cycle stored as an exact rational in the open interval (0, 1).
///
/// The high fraction of one period: `num / den` with `0 < num < den`, always
/// reduced to lowest terms. The hardware default is 1/2.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DutyCycle {
    num: u32,
    den: u32,
}

impl DutyCycle {
    /// The default 50% duty cycle.
    pub const HALF: DutyCycle = DutyCycle { num: 1, den: 2 };

    /// Creates a duty cycle of `num / den`, reduced to lowest terms.
    ///
    /// Rejects ratios outside the open interval (0, 1): a clock that is
    /// always low or always high is not a clock.
    pub fn new(num: u32, den: u32) -> Result<Self, DutyCycleError> {
        if num == 0 || num >= den {
            return Err(DutyCycleError::OutOfRange { num, den });
        }
        let g = gcd(num as u64, den as u64) as u32;
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Returns the reduced numerator.
    pub fn numer(&self) -> u32 {
        self.num
    }

    /// Returns the reduced denominator.
    pub fn denom(&self) -> u32 {
        self.den
    }

    /// Returns the duty cycle as `f64`, for display purposes only.
    pub fn fraction(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Default for DutyCycle {
    fn default() -> Self {
        Self::HALF
    }
}

impl fmt::Debug for DutyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DutyCycle({}/{})", self.num, self.den)
    }
}

impl fmt::Display for DutyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Errors constructing duty cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DutyCycleError {
    /// The ratio is not strictly between zero and one.
    #[error("duty cycle {num}/{den} is not in (0, 1)")]
    OutOfRange {
        /// The rejected numerator.
        num: u32,
        /// The rejected denominator.
        den: u32,
    },
}
