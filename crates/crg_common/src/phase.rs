//! Clock phase offsets in fixed tenths of a degree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tenths of a degree in a full turn.
const FULL_TURN: i64 = 3600;

/// A clock phase offset stored as an integer number of tenths of a degree,
/// wrapping modulo 360°.
///
/// Phase is an exact value: hardware stages accept a fixed set of phase
/// steps, and comparing or propagating an approximated phase would generate
/// a subtly wrong clock plan. Tenths of a degree is the fixed precision of
/// this representation; floating-point degree values convert at the
/// boundary only when they are a whole number of tenths.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Phase(u16);

impl Phase {
    /// The zero phase offset.
    pub const ZERO: Phase = Phase(0);

    /// Creates a phase from tenths of a degree, wrapping into [0°, 360°).
    ///
    /// Negative values wrap from the top: -900 tenths is 270°.
    pub fn from_tenths(tenths: i64) -> Self {
        Self(tenths.rem_euclid(FULL_TURN) as u16)
    }

    /// Converts a floating-point degree value at the external boundary.
    ///
    /// Accepts only values that are a whole number of tenths of a degree
    /// (within 1e-6° of one, absorbing decimal-literal rounding); anything
    /// finer is rejected with [`PhaseError::NotRepresentable`] rather than
    /// rounded.
    pub fn from_degrees_f64(degrees: f64) -> Result<Self, PhaseError> {
        if !degrees.is_finite() {
            return Err(PhaseError::NotRepresentable(degrees));
        }
        let tenths = degrees * 10.0;
        let nearest = tenths.round();
        if (tenths - nearest).abs() > 1e-5 || nearest.abs() > i64::MAX as f64 {
            return Err(PhaseError::NotRepresentable(degrees));
        }
        Ok(Self::from_tenths(nearest as i64))
    }

    /// Returns the phase in tenths of a degree, in [0, 3600).
    pub fn tenths(&self) -> u16 {
        self.0
    }

    /// Returns the phase in degrees as `f64`, for display purposes only.
    pub fn degrees(&self) -> f64 {
        self.0 as f64 / 10.0
    }

    /// Adds another phase offset, wrapping modulo 360°.
    pub fn wrapping_add(&self, other: Phase) -> Phase {
        Self::from_tenths(self.0 as i64 + other.0 as i64)
    }
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase({self})")
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 10 == 0 {
            write!(f, "{}°", self.0 / 10)
        } else {
            write!(f, "{}.{}°", self.0 / 10, self.0 % 10)
        }
    }
}

/// Errors converting external phase values.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PhaseError {
    /// The value is not a whole number of tenths of a degree.
    #[error("phase {0}° is not representable in tenths of a degree")]
    NotRepresentable(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tenths_in_range() {
        let p = Phase::from_tenths(2700);
        assert_eq!(p.tenths(), 2700);
        assert_eq!(p.degrees(), 270.0);
    }

    #[test]
    fn wraps_above_full_turn() {
        assert_eq!(Phase::from_tenths(3600), Phase::ZERO);
        assert_eq!(Phase::from_tenths(3750).tenths(), 150);
    }

    #[test]
    fn wraps_negative() {
        assert_eq!(Phase::from_tenths(-900).tenths(), 2700);
    }

    #[test]
    fn from_degrees_whole_tenths() {
        assert_eq!(Phase::from_degrees_f64(270.0).unwrap().tenths(), 2700);
        assert_eq!(Phase::from_degrees_f64(250.0).unwrap().tenths(), 2500);
        assert_eq!(Phase::from_degrees_f64(22.5).unwrap().tenths(), 225);
    }

    #[test]
    fn from_degrees_rejects_finer_than_tenths() {
        assert!(matches!(
            Phase::from_degrees_f64(0.05),
            Err(PhaseError::NotRepresentable(_))
        ));
        assert!(matches!(
            Phase::from_degrees_f64(f64::NAN),
            Err(PhaseError::NotRepresentable(_))
        ));
    }

    #[test]
    fn wrapping_add() {
        let a = Phase::from_tenths(2700);
        let b = Phase::from_tenths(1800);
        assert_eq!(a.wrapping_add(b).tenths(), 900);
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", Phase::from_tenths(2700)), "270°");
        assert_eq!(format!("{}", Phase::from_tenths(225)), "22.5°");
    }

    #[test]
    fn serde_roundtrip() {
        let p = Phase::from_tenths(2500);
        let json = serde_json::to_string(&p).unwrap();
        let restored: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(p, restored);
    }
}
