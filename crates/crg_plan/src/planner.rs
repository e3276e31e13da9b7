//! Exact rational clock planning.
//!
//! Given a reference frequency and a target frequency, [`plan`] finds the
//! exact multiply/divide configuration realizing the target, or fails with
//! [`PlanError::NoExactSolution`]. There is no approximation path: the ratio
//! is reduced with the greatest common divisor, checked against hardware
//! bounds, and the result is verified by exact re-multiplication.
//!
//! [`plan_stage`] extends this to the multi-tap case of one physical PLL:
//! all taps of a stage share one multiply factor (a hardware constraint), so
//! the planner takes the least common multiple of the per-tap reduced
//! numerators and derives an integer divide per tap.

use crate::error::PlanError;
use crg_common::{DutyCycle, Frequency, Phase};
use serde::{Deserialize, Serialize};

/// Hardware bounds a planned ratio must respect.
///
/// The defaults match a Spartan-6 style PLL: multiply up to 64, per-output
/// divide up to 128, arbitrary integer divides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConstraints {
    /// Largest multiply factor the stage supports.
    pub max_multiply: u64,
    /// Largest divide factor a single stage supports.
    pub max_divide: u64,
    /// Whether divide factors are restricted to powers of two.
    pub divide_must_be_power_of_two: bool,
}

impl Default for PlanConstraints {
    fn default() -> Self {
        Self {
            max_multiply: 64,
            max_divide: 128,
            divide_must_be_power_of_two: false,
        }
    }
}

/// One multiply/divide pair applied by a clock-generation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockRatio {
    /// The multiply factor.
    pub multiply: u64,
    /// The divide factor.
    pub divide: u64,
}

/// The result of planning one reference/target pair.
///
/// Contains one stage for ratios that fit a single stage's bounds, or two
/// cascaded stages (coarse feeding fine) when the divide had to be factored
/// into two in-bound cofactors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioPlan {
    /// The stages to cascade, in signal order.
    pub stages: Vec<ClockRatio>,
}

impl RatioPlan {
    /// Returns the overall (multiply, divide) product across all stages.
    pub fn overall(&self) -> (u64, u64) {
        self.stages
            .iter()
            .fold((1, 1), |(m, d), s| (m * s.multiply, d * s.divide))
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Plans an exact multiply/divide configuration producing `target` from
/// `reference`.
///
/// The reduced ratio's numerator becomes the multiply factor and its
/// denominator the divide factor. A divide over bound is factored into two
/// cascaded cofactors, each within bound; a multiply over bound, or a divide
/// with no in-bound factoring, fails with [`PlanError::NoExactSolution`].
/// The returned plan is verified to reproduce `target` by re-multiplication.
pub fn plan(
    reference: Frequency,
    target: Frequency,
    constraints: &PlanConstraints,
) -> Result<RatioPlan, PlanError> {
    let (multiply, divide) = target.ratio_to(reference)?;
    let fail = || PlanError::NoExactSolution { reference, target };

    if multiply > constraints.max_multiply {
        return Err(fail());
    }
    if constraints.divide_must_be_power_of_two && !divide.is_power_of_two() {
        return Err(fail());
    }

    let stages = if divide <= constraints.max_divide {
        vec![ClockRatio { multiply, divide }]
    } else {
        // Two-stage decomposition: find a cofactor pair of the divide with
        // both halves within bound. Any divisor of a power of two is itself
        // a power of two, so the constraint holds for the cofactors.
        let (first, second) = (2..=constraints.max_divide)
            .filter(|d1| divide % d1 == 0)
            .map(|d1| (d1, divide / d1))
            .find(|&(_, d2)| d2 <= constraints.max_divide)
            .ok_or_else(fail)?;
        vec![
            ClockRatio {
                multiply,
                divide: first,
            },
            ClockRatio {
                multiply: 1,
                divide: second,
            },
        ]
    };

    // Exact re-multiplication check, never a floating-point tolerance.
    let mut achieved = reference;
    for stage in &stages {
        achieved = achieved.scale(stage.multiply, stage.divide)?;
    }
    if achieved != target {
        return Err(fail());
    }

    Ok(RatioPlan { stages })
}

/// One requested output tap of a physical stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapRequest {
    /// Name of the clock domain this tap will drive.
    pub name: String,
    /// Exact target frequency of the tap.
    pub target: Frequency,
    /// Phase offset of the tap.
    pub phase: Phase,
    /// Duty cycle of the tap.
    pub duty: DutyCycle,
    /// Domains whose reset must release before this tap's domain, beyond
    /// the clock source itself.
    #[serde(default)]
    pub reset_after: Vec<String>,
}

impl TapRequest {
    /// Creates a request with zero phase and the default 1/2 duty cycle.
    pub fn new(name: impl Into<String>, target: Frequency) -> Self {
        Self {
            name: name.into(),
            target,
            phase: Phase::ZERO,
            duty: DutyCycle::HALF,
            reset_after: Vec::new(),
        }
    }

    /// Sets the phase offset.
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    /// Sets the duty cycle.
    pub fn with_duty(mut self, duty: DutyCycle) -> Self {
        self.duty = duty;
        self
    }

    /// Adds a reset-only upstream dependency on another domain.
    pub fn with_reset_after(mut self, domain: impl Into<String>) -> Self {
        self.reset_after.push(domain.into());
        self
    }
}

/// A planned output tap: the divide realizing the requested frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTap {
    /// Name of the clock domain this tap drives.
    pub name: String,
    /// The per-tap divide factor.
    pub divide: u64,
    /// The resolved tap frequency (equal to the requested target, exactly).
    pub frequency: Frequency,
    /// Phase offset of the tap.
    pub phase: Phase,
    /// Duty cycle of the tap.
    pub duty: DutyCycle,
    /// Reset-only upstream domains carried over from the request.
    #[serde(default)]
    pub reset_after: Vec<String>,
}

/// A planned multi-tap stage: one shared multiply, one divide per tap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagePlan {
    /// The multiply factor shared by every tap.
    pub multiply: u64,
    /// The planned taps, in request order.
    pub taps: Vec<PlannedTap>,
}

/// Plans one physical stage serving several taps from a common reference.
///
/// The shared multiply factor is the least common multiple of the reduced
/// numerators of every `target / reference` ratio — the smallest factor from
/// which every tap's divide is an integer. Any larger valid multiply would
/// only scale every divide, so the least one is canonical. A tap whose
/// divide falls outside the constraints fails with
/// [`PlanError::NoExactSolution`] naming that tap's target: a tap that is
/// infeasible on its own is blamed directly, even when another tap's
/// numerator would have pushed a feasible sibling over the bound first.
pub fn plan_stage(
    reference: Frequency,
    requests: &[TapRequest],
    constraints: &PlanConstraints,
) -> Result<StagePlan, PlanError> {
    let mut ratios = Vec::with_capacity(requests.len());
    let mut multiply: u64 = 1;

    for request in requests {
        let (m, d) = request.target.ratio_to(reference)?;
        let fail = || PlanError::NoExactSolution {
            reference,
            target: request.target,
        };
        // The reduced divide is the smallest this tap can ever get; the
        // shared multiply only scales it up. A reduced divide with an odd
        // factor can never become a power of two either.
        if d > constraints.max_divide
            || (constraints.divide_must_be_power_of_two && !d.is_power_of_two())
        {
            return Err(fail());
        }
        multiply = (multiply / gcd(multiply, m))
            .checked_mul(m)
            .ok_or_else(fail)?;
        if multiply > constraints.max_multiply {
            return Err(fail());
        }
        ratios.push((m, d));
    }

    let mut taps = Vec::with_capacity(requests.len());
    for (request, (m, d)) in requests.iter().zip(ratios) {
        let fail = || PlanError::NoExactSolution {
            reference,
            target: request.target,
        };
        // multiply is a multiple of m by construction.
        let divide = (multiply / m).checked_mul(d).ok_or_else(fail)?;
        if divide > constraints.max_divide
            || (constraints.divide_must_be_power_of_two && !divide.is_power_of_two())
        {
            return Err(fail());
        }
        let frequency = reference.scale(multiply, divide)?;
        if frequency != request.target {
            return Err(fail());
        }
        taps.push(PlannedTap {
            name: request.name.clone(),
            divide,
            frequency,
            phase: request.phase,
            duty: request.duty,
            reset_after: request.reset_after.clone(),
        });
    }

    Ok(StagePlan { multiply, taps })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mhz(v: u64) -> Frequency {
        Frequency::from_mhz(v).unwrap()
    }

    #[test]
    fn reduces_to_lowest_terms() {
        let plan = plan(mhz(100), mhz(75), &PlanConstraints::default()).unwrap();
        assert_eq!(
            plan.stages,
            vec![ClockRatio {
                multiply: 3,
                divide: 4
            }]
        );
    }

    #[test]
    fn identity_ratio() {
        let plan = plan(mhz(100), mhz(100), &PlanConstraints::default()).unwrap();
        assert_eq!(plan.overall(), (1, 1));
    }

    #[test]
    fn non_terminating_decimal_is_exact_rational() {
        // 100 MHz / 3 never terminates in decimal but is exactly 1/3.
        let target = Frequency::new(100_000_000, 3).unwrap();
        let plan = plan(mhz(100), target, &PlanConstraints::default()).unwrap();
        assert_eq!(
            plan.stages,
            vec![ClockRatio {
                multiply: 1,
                divide: 3
            }]
        );
    }

    #[test]
    fn divide_over_bound_fails() {
        let constraints = PlanConstraints {
            max_divide: 4,
            ..PlanConstraints::default()
        };
        // 17/100 needs divide 100 with no cofactor pair within 4.
        let err = plan(mhz(100), mhz(17), &constraints).unwrap_err();
        assert_eq!(
            err,
            PlanError::NoExactSolution {
                reference: mhz(100),
                target: mhz(17),
            }
        );
    }

    #[test]
    fn multiply_over_bound_fails() {
        let err = plan(mhz(1), mhz(100), &PlanConstraints::default()).unwrap_err();
        assert!(matches!(err, PlanError::NoExactSolution { .. }));
    }

    #[test]
    fn two_stage_decomposition() {
        let constraints = PlanConstraints {
            max_divide: 16,
            ..PlanConstraints::default()
        };
        // 1/100 needs divide 100 = 10 × 10 within bound 16.
        let plan = plan(mhz(100), mhz(1), &constraints).unwrap();
        assert_eq!(plan.stages.len(), 2);
        assert_eq!(plan.overall(), (1, 100));
        for stage in &plan.stages {
            assert!(stage.divide <= 16);
        }
    }

    #[test]
    fn power_of_two_constraint() {
        let constraints = PlanConstraints {
            max_divide: 16,
            divide_must_be_power_of_two: true,
            ..PlanConstraints::default()
        };
        // divide 3 is not a power of two
        let target = Frequency::new(100_000_000, 3).unwrap();
        assert!(plan(mhz(100), target, &constraints).is_err());
        // divide 256 = 16 × 16, both powers of two
        let target = Frequency::new(100_000_000, 256).unwrap();
        let plan = plan(mhz(100), target, &constraints).unwrap();
        assert_eq!(plan.overall(), (1, 256));
        assert!(plan.stages.iter().all(|s| s.divide.is_power_of_two()));
    }

    #[test]
    fn achieved_frequency_is_exact() {
        let reference = mhz(100);
        for target_mhz in [25, 50, 75, 150, 200, 300] {
            let target = mhz(target_mhz);
            let plan = plan(reference, target, &PlanConstraints::default()).unwrap();
            let (m, d) = plan.overall();
            assert_eq!(reference.scale(m, d).unwrap(), target);
        }
    }

    #[test]
    fn stage_common_multiply_matches_pll_adv() {
        // The six-tap Spartan-6 PLL configuration: everything from 100 MHz
        // with one shared multiply of 6.
        let reference = mhz(100);
        let requests = vec![
            TapRequest::new("sdram_full", mhz(300)),
            TapRequest::new("encoder", Frequency::new(200_000_000, 3).unwrap()),
            TapRequest::new("sdram_half", mhz(150)),
            TapRequest::new("base50", mhz(50)),
            TapRequest::new("sys", mhz(75)),
        ];
        let stage = plan_stage(reference, &requests, &PlanConstraints::default()).unwrap();
        assert_eq!(stage.multiply, 6);
        let divides: Vec<u64> = stage.taps.iter().map(|t| t.divide).collect();
        assert_eq!(divides, vec![2, 9, 4, 12, 8]);
        for tap in &stage.taps {
            assert_eq!(reference.scale(stage.multiply, tap.divide).unwrap(), tap.frequency);
        }
    }

    #[test]
    fn stage_unattainable_tap_fails_fast() {
        let constraints = PlanConstraints {
            max_divide: 4,
            ..PlanConstraints::default()
        };
        let requests = vec![
            TapRequest::new("sys", mhz(75)),
            TapRequest::new("odd", mhz(17)),
        ];
        let err = plan_stage(mhz(100), &requests, &constraints).unwrap_err();
        assert_eq!(
            err,
            PlanError::NoExactSolution {
                reference: mhz(100),
                target: mhz(17),
            }
        );
    }

    #[test]
    fn stage_inflated_divide_blames_current_tap() {
        let constraints = PlanConstraints {
            max_divide: 8,
            ..PlanConstraints::default()
        };
        // Each tap fits on its own (divides 2 and 7), but the shared
        // multiply of 3 lifts the second tap's divide to 21.
        let seventh = Frequency::new(100_000_000, 7).unwrap();
        let requests = vec![
            TapRequest::new("fast", mhz(150)),
            TapRequest::new("slow", seventh),
        ];
        let err = plan_stage(mhz(100), &requests, &constraints).unwrap_err();
        assert_eq!(
            err,
            PlanError::NoExactSolution {
                reference: mhz(100),
                target: seventh,
            }
        );
    }

    #[test]
    fn stage_multiply_over_bound_blames_tap() {
        let constraints = PlanConstraints {
            max_multiply: 4,
            ..PlanConstraints::default()
        };
        let requests = vec![
            TapRequest::new("a", mhz(75)),                                   // 3/4
            TapRequest::new("b", Frequency::new(500_000_000, 7).unwrap()),   // 5/7
        ];
        let err = plan_stage(mhz(100), &requests, &constraints).unwrap_err();
        assert_eq!(
            err,
            PlanError::NoExactSolution {
                reference: mhz(100),
                target: Frequency::new(500_000_000, 7).unwrap(),
            }
        );
    }

    #[test]
    fn stage_empty_requests() {
        let stage = plan_stage(mhz(100), &[], &PlanConstraints::default()).unwrap();
        assert_eq!(stage.multiply, 1);
        assert!(stage.taps.is_empty());
    }

    #[test]
    fn tap_request_builder() {
        let phase = Phase::from_tenths(2700);
        let duty = DutyCycle::new(1, 4).unwrap();
        let req = TapRequest::new("sdram_half", mhz(150))
            .with_phase(phase)
            .with_duty(duty);
        assert_eq!(req.phase, phase);
        assert_eq!(req.duty, duty);
    }

    #[test]
    fn plan_serde_roundtrip() {
        let plan = plan(mhz(100), mhz(75), &PlanConstraints::default()).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        let restored: RatioPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan, restored);
    }
}
