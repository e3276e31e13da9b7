//! Shared foundational value types for the crg clock/reset planning workspace.
//!
//! This crate provides exact rational frequencies with unit parsing, phase
//! offsets in fixed tenths of a degree, and rational duty cycles. All types
//! hold exact integer representations; generating a clock plan from a
//! floating-point approximation silently produces wrong hardware timing, so
//! floating-point values are accepted only at the external boundary and only
//! when they convert exactly.

#![warn(missing_docs)]

pub mod duty;
pub mod frequency;
pub mod phase;

pub use duty::{DutyCycle, DutyCycleError};
pub use frequency::{Frequency, FrequencyError, ParseFrequencyError};
pub use phase::{Phase, PhaseError};
