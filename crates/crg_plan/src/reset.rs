//! Reset sequencing over a resolved clock-domain graph.
//!
//! Each clock domain comes out of reset only after every clock it depends on
//! is valid: its upstream domain must have released reset, and the PLL/DCM
//! stage generating its clock must have asserted lock. [`ResetSequencer`]
//! derives those preconditions from a [`ResolvedGraph`] and emits a
//! [`ResetPlan`] in topological order.
//!
//! Every reset in the plan is asserted asynchronously (immediately on
//! power-up or on any precondition going false) and released synchronously,
//! on an edge of the domain's own clock, through a synchronizer chain —
//! releasing a reset asynchronously into a clocked domain risks
//! metastability at the crossing.

use crate::error::PlanError;
use crate::graph::{ClockSource, ResolvedGraph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default depth of the release-synchronizer flip-flop chain.
const DEFAULT_SYNC_STAGES: u8 = 2;

/// Default power-on hold, in cycles of the root domain's clock.
const DEFAULT_POWER_ON_CYCLES: u32 = 1 << 11;

/// Maps generating-stage names to their lock-status signal names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSignals {
    signals: BTreeMap<String, String>,
}

impl LockSignals {
    /// Creates an empty lock-signal map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the lock signal of a stage. Returns `self` for chaining.
    pub fn with(mut self, stage: impl Into<String>, signal: impl Into<String>) -> Self {
        self.signals.insert(stage.into(), signal.into());
        self
    }

    /// Returns the lock signal registered for `stage`, if any.
    pub fn get(&self, stage: &str) -> Option<&str> {
        self.signals.get(stage).map(String::as_str)
    }
}

/// One condition that must hold before a domain's reset may release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetCondition {
    /// The external user/power-on reset input is deasserted.
    ExternalReset,
    /// The named upstream domain has released its reset.
    DomainReleased(String),
    /// The named stage lock signal is asserted.
    LockAsserted(String),
}

/// The reset specification for one clock domain.
///
/// The reset is asserted asynchronously whenever any precondition is false,
/// and released synchronously on the domain's own clock once all
/// preconditions have been stable, through `sync_stages` flip-flops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetNode {
    /// The clock domain this reset belongs to.
    pub domain: String,
    /// All conditions that must hold, ANDed, before release.
    pub preconditions: Vec<ResetCondition>,
    /// Depth of the release-synchronizer chain.
    pub sync_stages: u8,
    /// Cycles of the domain's own clock to hold reset after power-up.
    /// Nonzero only for domains fed directly by an external reference,
    /// where the external reset enters the system.
    pub power_on_cycles: u32,
}

/// The derived reset-release plan, in topological domain order.
///
/// Siblings with no dependency between them are independent by construction
/// and may release in any order; the stored order is the graph's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPlan {
    nodes: Vec<ResetNode>,
    index: BTreeMap<String, usize>,
}

impl ResetPlan {
    /// Returns the reset nodes in release order.
    pub fn nodes(&self) -> &[ResetNode] {
        &self.nodes
    }

    /// Returns the reset node for the named domain, if present.
    pub fn node(&self, domain: &str) -> Option<&ResetNode> {
        self.index.get(domain).map(|&i| &self.nodes[i])
    }

    /// Returns the number of reset nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the plan is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Derives reset-release plans from resolved clock-domain graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSequencer {
    /// Depth of every release-synchronizer chain.
    pub sync_stages: u8,
    /// Power-on hold applied to reference-fed domains.
    pub power_on_cycles: u32,
}

impl Default for ResetSequencer {
    fn default() -> Self {
        Self {
            sync_stages: DEFAULT_SYNC_STAGES,
            power_on_cycles: DEFAULT_POWER_ON_CYCLES,
        }
    }
}

impl ResetSequencer {
    /// Creates a sequencer with the default synchronizer depth and
    /// power-on hold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the reset plan for `graph`.
    ///
    /// For every domain the precondition set is the AND of its upstream
    /// domain's release (or the external reset input, for reference-fed
    /// domains), the release of every reset-only upstream declared on the
    /// domain, and, when the domain is generated by a stage, that stage's
    /// lock signal — looked up in `locks`, failing with
    /// [`PlanError::UnknownStage`] when absent. Only resolved graphs are
    /// accepted, so cyclic dependency sets cannot reach this point; the
    /// cycle check lives in [`ClockDomainGraph::resolve`].
    ///
    /// [`ClockDomainGraph::resolve`]: crate::graph::ClockDomainGraph::resolve
    pub fn derive(&self, graph: &ResolvedGraph, locks: &LockSignals) -> Result<ResetPlan, PlanError> {
        let mut nodes = Vec::with_capacity(graph.len());
        for domain in graph.domains() {
            let mut preconditions = Vec::new();
            let mut power_on_cycles = 0;
            match &domain.source {
                ClockSource::Reference(_) => {
                    preconditions.push(ResetCondition::ExternalReset);
                    power_on_cycles = self.power_on_cycles;
                }
                ClockSource::Domain(name) => {
                    preconditions.push(ResetCondition::DomainReleased(name.clone()));
                }
            }
            for upstream in &domain.reset_after {
                let condition = ResetCondition::DomainReleased(upstream.clone());
                if !preconditions.contains(&condition) {
                    preconditions.push(condition);
                }
            }
            if let Some(stage) = &domain.stage {
                let signal = locks.get(stage).ok_or_else(|| PlanError::UnknownStage {
                    domain: domain.name.clone(),
                    stage: stage.clone(),
                })?;
                preconditions.push(ResetCondition::LockAsserted(signal.to_string()));
            }
            nodes.push(ResetNode {
                domain: domain.name.clone(),
                preconditions,
                sync_stages: self.sync_stages,
                power_on_cycles,
            });
        }
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.domain.clone(), i))
            .collect();
        Ok(ResetPlan { nodes, index })
    }
}
