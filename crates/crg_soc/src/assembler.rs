//! Assembles board descriptors and stage requests into a finished clocking
//! plan.
//!
//! This is the integration seam between the board tables, the rational
//! planner, and the reset sequencer: one pass, immutable inputs, and either
//! a fully resolved [`SocClocking`] or a [`PlanError`]. The result is what
//! the surrounding SoC integration layer consumes when wiring CPU, memory
//! controller, and peripherals.

use crg_board::BoardDescriptor;
use crg_plan::{
    ClockDomainGraph, ClockSource, DomainSpec, LockSignals, PlanConstraints, PlanError, PllStage,
    ResetPlan, ResetSequencer, ResolvedGraph, StageKind, TapRequest,
};
use serde::{Deserialize, Serialize};

/// A request to plan one physical clock-generation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRequest {
    /// Unique stage name.
    pub name: String,
    /// The hardware primitive realizing the stage.
    pub kind: StageKind,
    /// Name of the stage's lock-status signal.
    pub lock_signal: String,
    /// Hardware bounds for this stage's ratios.
    pub constraints: PlanConstraints,
    /// The output taps the stage must provide.
    pub taps: Vec<TapRequest>,
}

/// A complete, immutable clock/reset plan for one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocClocking {
    /// The board the plan was assembled for.
    pub board: String,
    /// The planned stages, in request order.
    pub stages: Vec<PllStage>,
    /// The resolved clock-domain graph.
    pub graph: ResolvedGraph,
    /// The derived reset-release plan.
    pub resets: ResetPlan,
}

/// Plans every requested stage from the named board reference clock,
/// assembles and resolves the clock-domain graph, and derives the reset
/// plan.
///
/// Fails with [`PlanError::UnknownSource`] when the board has no reference
/// clock of that name, and otherwise propagates planner/graph/sequencer
/// errors unchanged. There is no partial success: every domain resolves
/// exactly or the whole assembly fails.
pub fn assemble(
    board: &BoardDescriptor,
    reference: &str,
    requests: &[StageRequest],
    sequencer: &ResetSequencer,
) -> Result<SocClocking, PlanError> {
    let ref_clock = board
        .reference_clock(reference)
        .ok_or_else(|| PlanError::UnknownSource {
            domain: board.name.clone(),
            source_name: reference.to_string(),
        })?;

    let mut graph = ClockDomainGraph::new();
    graph.add_reference(&ref_clock.name, ref_clock.frequency)?;

    let mut stages = Vec::with_capacity(requests.len());
    let mut locks = LockSignals::new();
    for request in requests {
        let stage = PllStage::plan(
            &request.name,
            request.kind,
            ref_clock.frequency,
            &request.taps,
            &request.constraints,
            &request.lock_signal,
        )?;
        locks = locks.with(&stage.name, &stage.lock_signal);
        for tap in &stage.taps {
            let mut spec = DomainSpec::new(
                tap.name.clone(),
                ClockSource::Reference(ref_clock.name.clone()),
                stage.multiply,
                tap.divide,
                tap.frequency,
            )
            .with_phase(tap.phase)
            .with_duty(tap.duty)
            .with_stage(stage.name.clone());
            for upstream in &tap.reset_after {
                spec = spec.with_reset_after(upstream.clone());
            }
            graph.add_domain(spec)?;
        }
        stages.push(stage);
    }

    let graph = graph.resolve()?;
    let resets = sequencer.derive(&graph, &locks)?;

    Ok(SocClocking {
        board: board.name.clone(),
        stages,
        graph,
        resets,
    })
}
