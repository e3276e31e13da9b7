//! Clock-domain planning and reset synchronization for FPGA SoC generation.
//!
//! This crate is the algorithmic core of the crg workspace: given exact
//! reference frequencies and a set of required output clock domains, it
//! computes exact rational PLL/DCM multiply/divide configurations, validates
//! the clock-domain dependency graph, and derives the reset-release sequence
//! that brings each domain up only after its clock source is locked and
//! stable.
//!
//! All of it is a pure, single-shot planning pass over immutable inputs.
//! There is no approximation anywhere: frequencies are exact rationals, a
//! plan either reproduces every target bit-for-bit or fails with a
//! [`PlanError`] naming the offending domain or stage.
//!
//! # Usage
//!
//! ```ignore
//! use crg_plan::{
//!     ClockDomainGraph, ClockSource, DomainSpec, LockSignals, ResetSequencer,
//! };
//!
//! let mut graph = ClockDomainGraph::new();
//! graph.add_reference("clk100", clk100)?;
//! graph.add_domain(DomainSpec::new("sys", source, 3, 4, sys_freq).with_stage("pll"))?;
//! let resolved = graph.resolve()?;
//! let resets = ResetSequencer::new()
//!     .derive(&resolved, &LockSignals::new().with("pll", "pll_lckd"))?;
//! ```
//!
//! # Architecture
//!
//! - [`planner`] — exact rational ratio planning, single- and multi-tap
//! - [`stage`] — physical PLL/DCM stage model (shared multiply, per-tap
//!   divide/phase/duty, lock signal)
//! - [`graph`] — clock-domain graph construction and resolution
//! - [`reset`] — reset precondition derivation and release discipline
//! - [`error`] — the fatal, deterministic error taxonomy

#![warn(missing_docs)]

pub mod error;
pub mod graph;
pub mod ids;
pub mod planner;
pub mod reset;
pub mod stage;

pub use error::PlanError;
pub use graph::{ClockDomainGraph, ClockSource, DomainSpec, ReferenceInput, ResolvedDomain, ResolvedGraph};
pub use ids::{DomainId, RefClockId};
pub use planner::{plan, plan_stage, ClockRatio, PlanConstraints, PlannedTap, RatioPlan, StagePlan, TapRequest};
pub use reset::{LockSignals, ResetCondition, ResetNode, ResetPlan, ResetSequencer};
pub use stage::{PllStage, StageKind, StageTap};

#[cfg(test)]
mod tests {
    use super::*;
    use crg_common::{Frequency, Phase};

    fn mhz(v: u64) -> Frequency {
        Frequency::from_mhz(v).unwrap()
    }

    #[test]
    fn full_pipeline_plan_resolve_sequence() {
        let clk100 = mhz(100);

        // Plan one PLL stage serving two domains.
        let stage = PllStage::plan(
            "crg_pll",
            StageKind::Pll,
            clk100,
            &[
                TapRequest::new("sys", mhz(75)),
                TapRequest::new("sdram_half", mhz(150)).with_phase(Phase::from_tenths(2700)),
            ],
            &PlanConstraints::default(),
            "pll_lckd",
        )
        .unwrap();

        // Assemble the graph from the planned taps.
        let mut graph = ClockDomainGraph::new();
        graph.add_reference("clk100", clk100).unwrap();
        for tap in &stage.taps {
            graph
                .add_domain(
                    DomainSpec::new(
                        tap.name.clone(),
                        ClockSource::Reference("clk100".into()),
                        stage.multiply,
                        tap.divide,
                        tap.frequency,
                    )
                    .with_phase(tap.phase)
                    .with_stage(stage.name.clone()),
                )
                .unwrap();
        }
        let resolved = graph.resolve().unwrap();
        assert_eq!(resolved.domain("sys").unwrap().frequency, mhz(75));
        assert_eq!(
            resolved.domain("sdram_half").unwrap().phase,
            Phase::from_tenths(2700)
        );

        // Derive resets: every domain waits on the PLL lock.
        let locks = LockSignals::new().with("crg_pll", "pll_lckd");
        let resets = ResetSequencer::new().derive(&resolved, &locks).unwrap();
        for node in resets.nodes() {
            assert!(node
                .preconditions
                .contains(&ResetCondition::LockAsserted("pll_lckd".into())));
        }
    }

    #[test]
    fn reexports_available() {
        let _ = ClockDomainGraph::new();
        let _ = PlanConstraints::default();
        let _ = LockSignals::new();
        let _ = ResetSequencer::new();
        let _ = DomainId::from_raw(0);
        let _ = RefClockId::from_raw(0);
    }
}
