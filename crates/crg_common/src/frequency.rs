//! Exact rational frequency values with unit parsing and display.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A frequency stored as an exact rational number of Hertz.
///
/// The numerator/denominator pair is always reduced to lowest terms, so two
/// equal frequencies are structurally identical and `==` is exact equality.
/// All arithmetic is integer arithmetic with `u128` intermediates; no
/// floating-point value participates in any comparison or derivation.
///
/// Supports parsing from strings like "50MHz", "100KHz", "1GHz", "48000Hz",
/// and bare numeric values (interpreted as Hz). Decimal strings are parsed
/// digit-wise into an exact rational, never through `f64`, so "33.333333MHz"
/// means 33333333/1000000 MHz and nothing else. Displays using the most
/// appropriate unit; values that are not integral in that unit render as a
/// fraction (66.66̅ MHz displays as "200/3MHz").
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frequency {
    num: u64,
    den: u64,
}

const KHZ: u64 = 1_000;
const MHZ: u64 = 1_000_000;
const GHZ: u64 = 1_000_000_000;

/// Greatest common divisor by Euclid's algorithm.
pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn gcd128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Reduces a `u128` ratio to lowest terms and narrows it to `u64`.
fn reduce(num: u128, den: u128) -> Result<(u64, u64), FrequencyError> {
    if num == 0 || den == 0 {
        return Err(FrequencyError::Zero);
    }
    let g = gcd128(num, den);
    let (num, den) = (num / g, den / g);
    if num > u64::MAX as u128 || den > u64::MAX as u128 {
        return Err(FrequencyError::Overflow);
    }
    Ok((num as u64, den as u64))
}

impl Frequency {
    /// Creates a frequency of `num / den` Hertz, reduced to lowest terms.
    ///
    /// Frequencies are strictly positive: a zero numerator or denominator is
    /// rejected with [`FrequencyError::Zero`].
    pub fn new(num: u64, den: u64) -> Result<Self, FrequencyError> {
        let (num, den) = reduce(num as u128, den as u128)?;
        Ok(Self { num, den })
    }

    /// Creates a frequency from a whole number of Hertz.
    pub fn from_hz(hz: u64) -> Result<Self, FrequencyError> {
        Self::new(hz, 1)
    }

    /// Creates a frequency from a whole number of megahertz.
    pub fn from_mhz(mhz: u64) -> Result<Self, FrequencyError> {
        let hz = (mhz as u128)
            .checked_mul(MHZ as u128)
            .ok_or(FrequencyError::Overflow)?;
        let (num, den) = reduce(hz, 1)?;
        Ok(Self { num, den })
    }

    /// Creates a frequency from a whole number of megahertz, in const
    /// context. For literal board-table frequencies; a zero value fails
    /// const evaluation.
    pub const fn const_mhz(mhz: u64) -> Self {
        assert!(mhz > 0, "frequency must be positive");
        Self {
            num: mhz * MHZ,
            den: 1,
        }
    }

    /// Converts a floating-point Hertz value at the external boundary.
    ///
    /// Accepts only finite values that are exactly a whole number of Hertz;
    /// anything else is rejected with [`FrequencyError::Inexact`] rather than
    /// rounded. Fractional frequencies must be constructed as rationals with
    /// [`Frequency::new`].
    pub fn from_hz_f64(hz: f64) -> Result<Self, FrequencyError> {
        if !hz.is_finite() || hz <= 0.0 || hz.fract() != 0.0 || hz > u64::MAX as f64 {
            return Err(FrequencyError::Inexact(hz));
        }
        Self::from_hz(hz as u64)
    }

    /// Returns the reduced numerator, in Hertz.
    pub fn numer(&self) -> u64 {
        self.num
    }

    /// Returns the reduced denominator.
    pub fn denom(&self) -> u64 {
        self.den
    }

    /// Returns the frequency in Hertz as `f64`, for display purposes only.
    pub fn hz(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Returns the frequency in megahertz as `f64`, for display purposes only.
    pub fn mhz(&self) -> f64 {
        self.hz() / MHZ as f64
    }

    /// Scales this frequency by an exact `multiply / divide` ratio.
    ///
    /// This is the fundamental clock-derivation operation: the output of a
    /// PLL tap running at `input × multiply / divide`. Fails with
    /// [`FrequencyError::Zero`] when either factor is zero and
    /// [`FrequencyError::Overflow`] when the reduced result does not fit.
    pub fn scale(&self, multiply: u64, divide: u64) -> Result<Self, FrequencyError> {
        let num = self.num as u128 * multiply as u128;
        let den = self.den as u128 * divide as u128;
        let (num, den) = reduce(num, den)?;
        Ok(Self { num, den })
    }

    /// Returns `self / reference` as a reduced `(numerator, denominator)` pair.
    ///
    /// This is the exact ratio a planner must realize to produce `self` from
    /// `reference`.
    pub fn ratio_to(&self, reference: Frequency) -> Result<(u64, u64), FrequencyError> {
        let num = self.num as u128 * reference.den as u128;
        let den = self.den as u128 * reference.num as u128;
        reduce(num, den)
    }

    /// Exact comparison against a whole-Hertz threshold.
    fn at_least_hz(&self, hz: u64) -> bool {
        self.num as u128 >= hz as u128 * self.den as u128
    }
}

impl PartialOrd for Frequency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frequency {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num as u128 * other.den as u128;
        let rhs = other.num as u128 * self.den as u128;
        lhs.cmp(&rhs)
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (unit_hz, unit) = if self.at_least_hz(GHZ) {
            (GHZ, "GHz")
        } else if self.at_least_hz(MHZ) {
            (MHZ, "MHz")
        } else if self.at_least_hz(KHZ) {
            (KHZ, "KHz")
        } else {
            (1, "Hz")
        };
        // Value in the chosen unit, reduced. Never overflows: the numerator
        // is unchanged and the denominator grows by at most 10^9.
        let den = self.den as u128 * unit_hz as u128;
        let g = gcd128(self.num as u128, den);
        let (num, den) = (self.num as u128 / g, den / g);
        if den == 1 {
            write!(f, "{num}{unit}")
        } else {
            write!(f, "{num}/{den}{unit}")
        }
    }
}

/// Errors constructing or combining exact frequencies.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FrequencyError {
    /// A frequency or scale factor was zero; frequencies are strictly positive.
    #[error("frequency must be positive")]
    Zero,

    /// The reduced rational does not fit in 64-bit numerator/denominator.
    #[error("frequency arithmetic overflow")]
    Overflow,

    /// A floating-point value at the boundary is not exactly representable.
    #[error("frequency {0} Hz is not exactly representable")]
    Inexact(f64),
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

/// Parses a decimal literal into an exact rational scaled by `unit_hz`.
///
/// "33.333333" with a MHz unit becomes 33333333 × 10^6 / 10^6 Hz, computed
/// entirely in integer arithmetic.
fn parse_decimal(text: &str, unit_hz: u64) -> Option<Frequency> {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let mut num: u128 = 0;
    for c in int_part.chars().chain(frac_part.chars()) {
        num = num.checked_mul(10)?.checked_add((c as u8 - b'0') as u128)?;
    }
    let den = 10u128.checked_pow(frac_part.len() as u32)?;
    let num = num.checked_mul(unit_hz as u128)?;
    reduce(num, den).ok().map(|(num, den)| Frequency { num, den })
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        // Try suffixed formats (case-insensitive)
        let lower = s.to_ascii_lowercase();
        for (suffix, unit_hz) in [("ghz", GHZ), ("mhz", MHZ), ("khz", KHZ), ("hz", 1)] {
            if let Some(num) = lower.strip_suffix(suffix) {
                return parse_decimal(num.trim(), unit_hz).ok_or_else(err);
            }
        }

        // Bare number — interpreted as Hz
        parse_decimal(&lower, 1).ok_or_else(err)
    }
}
