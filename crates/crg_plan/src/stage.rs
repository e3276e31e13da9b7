//! Physical clock-generation stages.
//!
//! A [`PllStage`] models one hardware clock-generation primitive (a PLL or a
//! DCM): a single input reference, one multiply factor shared by every
//! output tap, per-tap divide/phase/duty settings, and one lock signal that
//! reports when the outputs are stable. The shared multiply is a hardware
//! constraint, enforced here by construction — taps carry no multiply of
//! their own.

use crate::error::PlanError;
use crate::planner::{plan_stage, PlanConstraints, TapRequest};
use crg_common::{DutyCycle, Frequency, Phase};
use serde::{Deserialize, Serialize};

/// The kind of hardware primitive realizing a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    /// A phase-locked loop (multi-tap, phase-capable).
    Pll,
    /// A digital clock manager (single synthesized output).
    Dcm,
}

/// One output tap of a planned stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTap {
    /// Name of the clock domain this tap drives.
    pub name: String,
    /// The per-tap divide factor.
    pub divide: u64,
    /// The exact resolved frequency of this tap.
    pub frequency: Frequency,
    /// Phase offset of this tap.
    pub phase: Phase,
    /// Duty cycle of this tap.
    pub duty: DutyCycle,
    /// Domains whose reset must release before this tap's domain.
    #[serde(default)]
    pub reset_after: Vec<String>,
}

/// A planned physical clock-generation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PllStage {
    /// Unique stage name (e.g. "crg_pll").
    pub name: String,
    /// The hardware primitive kind.
    pub kind: StageKind,
    /// The exact input reference frequency.
    pub input: Frequency,
    /// The multiply factor shared by all taps.
    pub multiply: u64,
    /// The output taps.
    pub taps: Vec<StageTap>,
    /// Name of the stage's lock-status signal.
    pub lock_signal: String,
}

impl PllStage {
    /// Plans a stage serving the given tap requests from `input`.
    ///
    /// Delegates ratio planning to [`plan_stage`]; every returned tap
    /// frequency equals its requested target exactly. A DCM synthesizes a
    /// single output, so requesting more than one tap from a
    /// [`StageKind::Dcm`] stage fails with [`PlanError::TooManyTaps`].
    pub fn plan(
        name: impl Into<String>,
        kind: StageKind,
        input: Frequency,
        requests: &[TapRequest],
        constraints: &PlanConstraints,
        lock_signal: impl Into<String>,
    ) -> Result<Self, PlanError> {
        let name = name.into();
        if kind == StageKind::Dcm && requests.len() > 1 {
            return Err(PlanError::TooManyTaps {
                stage: name,
                requested: requests.len(),
            });
        }
        let planned = plan_stage(input, requests, constraints)?;
        let taps = planned
            .taps
            .into_iter()
            .map(|t| StageTap {
                name: t.name,
                divide: t.divide,
                frequency: t.frequency,
                phase: t.phase,
                duty: t.duty,
                reset_after: t.reset_after,
            })
            .collect();
        Ok(Self {
            name,
            kind,
            input,
            multiply: planned.multiply,
            taps,
            lock_signal: lock_signal.into(),
        })
    }

    /// Returns the tap with the given name, if present.
    pub fn tap(&self, name: &str) -> Option<&StageTap> {
        self.taps.iter().find(|t| t.name == name)
    }

    /// Returns the internal frequency `input × multiply` the stage runs at.
    pub fn internal_frequency(&self) -> Result<Frequency, PlanError> {
        Ok(self.input.scale(self.multiply, 1)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mhz(v: u64) -> Frequency {
        Frequency::from_mhz(v).unwrap()
    }

    #[test]
    fn plan_single_tap_dcm() {
        let stage = PllStage::plan(
            "periph_dcm",
            StageKind::Dcm,
            mhz(100),
            &[TapRequest::new("base50", mhz(50))],
            &PlanConstraints::default(),
            "dcm_base50_locked",
        )
        .unwrap();
        assert_eq!(stage.multiply, 1);
        assert_eq!(stage.taps.len(), 1);
        assert_eq!(stage.tap("base50").unwrap().divide, 2);
        assert_eq!(stage.tap("base50").unwrap().frequency, mhz(50));
    }

    #[test]
    fn taps_share_multiply() {
        let stage = PllStage::plan(
            "crg_pll",
            StageKind::Pll,
            mhz(100),
            &[
                TapRequest::new("sys", mhz(75)),
                TapRequest::new("sdram_full", mhz(300)),
            ],
            &PlanConstraints::default(),
            "pll_lckd",
        )
        .unwrap();
        assert_eq!(stage.multiply, 3);
        assert_eq!(stage.tap("sys").unwrap().divide, 4);
        assert_eq!(stage.tap("sdram_full").unwrap().divide, 1);
        assert_eq!(stage.internal_frequency().unwrap(), mhz(300));
    }

    #[test]
    fn tap_lookup_miss() {
        let stage = PllStage::plan(
            "crg_pll",
            StageKind::Pll,
            mhz(100),
            &[TapRequest::new("sys", mhz(75))],
            &PlanConstraints::default(),
            "pll_lckd",
        )
        .unwrap();
        assert!(stage.tap("nope").is_none());
    }

    #[test]
    fn dcm_takes_a_single_tap_only() {
        let err = PllStage::plan(
            "periph_dcm",
            StageKind::Dcm,
            mhz(100),
            &[
                TapRequest::new("base50", mhz(50)),
                TapRequest::new("base25", mhz(25)),
            ],
            &PlanConstraints::default(),
            "dcm_base50_locked",
        )
        .unwrap_err();
        assert_eq!(
            err,
            PlanError::TooManyTaps {
                stage: "periph_dcm".into(),
                requested: 2,
            }
        );
    }

    #[test]
    fn unattainable_tap_propagates() {
        let constraints = PlanConstraints {
            max_divide: 4,
            ..PlanConstraints::default()
        };
        let err = PllStage::plan(
            "crg_pll",
            StageKind::Pll,
            mhz(100),
            &[TapRequest::new("odd", mhz(17))],
            &constraints,
            "pll_lckd",
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::NoExactSolution { .. }));
    }

    #[test]
    fn stage_serde_roundtrip() {
        let stage = PllStage::plan(
            "crg_pll",
            StageKind::Pll,
            mhz(100),
            &[TapRequest::new("sys", mhz(75)).with_phase(Phase::from_tenths(2700))],
            &PlanConstraints::default(),
            "pll_lckd",
        )
        .unwrap();
        let json = serde_json::to_string(&stage).unwrap();
        let restored: PllStage = serde_json::from_str(&json).unwrap();
        assert_eq!(stage, restored);
    }
}
