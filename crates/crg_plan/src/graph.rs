//! The clock-domain graph and its resolved, validated form.
//!
//! [`ClockDomainGraph`] is a directed acyclic graph of named clock domains
//! rooted at external reference inputs. Construction is declare-before-use:
//! a domain may only name a source that already exists, which makes cycles
//! unconstructible through the API. [`ClockDomainGraph::resolve`] then
//! re-validates the whole graph as a pure function — duplicate names,
//! unknown sources, a defensive cycle check, and exact recomputation of
//! every domain's frequency — and produces an immutable [`ResolvedGraph`].
//!
//! The graph owns every node; everything else refers to domains by
//! [`DomainId`] or by name.

use crate::error::PlanError;
use crate::ids::{DomainId, RefClockId};
use crg_common::{DutyCycle, Frequency, Phase};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// The clock source a domain derives from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockSource {
    /// An external reference-clock input, by name.
    Reference(String),
    /// Another clock domain's output tap, by name.
    Domain(String),
}

impl ClockSource {
    /// Returns the name of the source clock.
    pub fn name(&self) -> &str {
        match self {
            ClockSource::Reference(name) | ClockSource::Domain(name) => name,
        }
    }
}

/// An external reference-clock input (a board oscillator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceInput {
    /// Unique name of the reference (e.g. "clk100").
    pub name: String,
    /// The exact reference frequency.
    pub frequency: Frequency,
}

/// The declaration of one clock domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainSpec {
    /// Unique domain name (e.g. "sys", "sdram_half").
    pub name: String,
    /// Where this domain's clock comes from.
    pub source: ClockSource,
    /// Multiply factor applied to the source frequency.
    pub multiply: u64,
    /// Divide factor applied to the source frequency.
    pub divide: u64,
    /// Phase offset of this domain's clock.
    pub phase: Phase,
    /// Duty cycle of this domain's clock.
    pub duty: DutyCycle,
    /// The declared target frequency; must equal source × multiply / divide
    /// exactly, checked at resolve time.
    pub target: Frequency,
    /// The generating stage, when this domain is produced by a PLL/DCM tap.
    /// Root domains wired straight to a reference have none.
    pub stage: Option<String>,
    /// Domains whose reset must release before this one's, beyond the clock
    /// source itself. Used when a domain's reset is wired from another
    /// domain's reset line without a clock edge between them.
    #[serde(default)]
    pub reset_after: Vec<String>,
}

impl DomainSpec {
    /// Creates a spec with zero phase and the default 1/2 duty cycle.
    pub fn new(
        name: impl Into<String>,
        source: ClockSource,
        multiply: u64,
        divide: u64,
        target: Frequency,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            multiply,
            divide,
            phase: Phase::ZERO,
            duty: DutyCycle::HALF,
            target,
            stage: None,
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

    /// Sets the generating stage name.
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Adds a reset-only upstream dependency on another domain.
    ///
    /// Unlike [`ClockSource`] this carries no frequency relation; it only
    /// forces the named domain's reset to release first. The name is
    /// validated at resolve time, so it may refer to a domain declared
    /// later.
    pub fn with_reset_after(mut self, domain: impl Into<String>) -> Self {
        self.reset_after.push(domain.into());
        self
    }
}

/// A directed acyclic graph of clock domains under construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockDomainGraph {
    references: Vec<ReferenceInput>,
    domains: Vec<DomainSpec>,
}

impl ClockDomainGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn name_in_use(&self, name: &str) -> bool {
        self.references.iter().any(|r| r.name == name)
            || self.domains.iter().any(|d| d.name == name)
    }

    /// Adds an external reference-clock input and returns its ID.
    ///
    /// References and domains share one namespace, so reusing any declared
    /// name fails with [`PlanError::DuplicateName`].
    pub fn add_reference(
        &mut self,
        name: impl Into<String>,
        frequency: Frequency,
    ) -> Result<RefClockId, PlanError> {
        let name = name.into();
        if self.name_in_use(&name) {
            return Err(PlanError::DuplicateName(name));
        }
        let id = RefClockId::from_raw(self.references.len() as u32);
        self.references.push(ReferenceInput { name, frequency });
        Ok(id)
    }

    /// Adds a clock domain and returns its ID.
    ///
    /// Fails with [`PlanError::DuplicateName`] if the name is taken and
    /// [`PlanError::UnknownSource`] if the named source has not been
    /// declared yet — sources must be declared before dependents, which
    /// rules out forward references and therefore accidental cycles.
    pub fn add_domain(&mut self, spec: DomainSpec) -> Result<DomainId, PlanError> {
        if self.name_in_use(&spec.name) {
            return Err(PlanError::DuplicateName(spec.name));
        }
        let source_exists = match &spec.source {
            ClockSource::Reference(name) => self.references.iter().any(|r| &r.name == name),
            ClockSource::Domain(name) => self.domains.iter().any(|d| &d.name == name),
        };
        if !source_exists {
            return Err(PlanError::UnknownSource {
                domain: spec.name,
                source_name: spec.source.name().to_string(),
            });
        }
        let id = DomainId::from_raw(self.domains.len() as u32);
        self.domains.push(spec);
        Ok(id)
    }

    /// Returns the declared reference inputs.
    pub fn references(&self) -> &[ReferenceInput] {
        &self.references
    }

    /// Returns the declared domains, in declaration order.
    pub fn domains(&self) -> &[DomainSpec] {
        &self.domains
    }

    /// Validates the graph and resolves every domain's frequency.
    ///
    /// Performs a topological walk from the reference roots (Kahn's
    /// algorithm), recomputing each domain's frequency as
    /// `source × multiply / divide` and checking it against the declared
    /// target with exact equality. Reset-only dependencies participate in
    /// the ordering (and are name-checked here), so the resolved domain
    /// order is safe to release resets in. Construction order already
    /// prevents source cycles, but the walk re-detects them defensively so
    /// a graph mutated programmatically (e.g. deserialized) still fails
    /// with [`PlanError::CycleDetected`] instead of resolving nonsense.
    ///
    /// Resolution is pure and idempotent: resolving the same graph twice
    /// yields identical output.
    pub fn resolve(&self) -> Result<ResolvedGraph, PlanError> {
        // Re-validate names; the graph may not have been built through
        // add_reference/add_domain.
        let mut names: BTreeMap<&str, ()> = BTreeMap::new();
        for name in self
            .references
            .iter()
            .map(|r| r.name.as_str())
            .chain(self.domains.iter().map(|d| d.name.as_str()))
        {
            if names.insert(name, ()).is_some() {
                return Err(PlanError::DuplicateName(name.to_string()));
            }
        }

        let ref_by_name: BTreeMap<&str, usize> = self
            .references
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.as_str(), i))
            .collect();
        let domain_by_name: BTreeMap<&str, usize> = self
            .domains
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.as_str(), i))
            .collect();

        // Kahn's algorithm over the domain→domain edges. Reset-only
        // dependencies count as ordering edges too, so the resolved order is
        // also a valid reset-release order.
        let mut indegree = vec![0usize; self.domains.len()];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.domains.len()];
        for (idx, spec) in self.domains.iter().enumerate() {
            match &spec.source {
                ClockSource::Reference(name) => {
                    if !ref_by_name.contains_key(name.as_str()) {
                        return Err(PlanError::UnknownSource {
                            domain: spec.name.clone(),
                            source_name: name.clone(),
                        });
                    }
                }
                ClockSource::Domain(name) => {
                    let parent =
                        *domain_by_name
                            .get(name.as_str())
                            .ok_or_else(|| PlanError::UnknownSource {
                                domain: spec.name.clone(),
                                source_name: name.clone(),
                            })?;
                    indegree[idx] += 1;
                    children[parent].push(idx);
                }
            }
            for upstream in &spec.reset_after {
                let parent =
                    *domain_by_name
                        .get(upstream.as_str())
                        .ok_or_else(|| PlanError::UnknownSource {
                            domain: spec.name.clone(),
                            source_name: upstream.clone(),
                        })?;
                indegree[idx] += 1;
                children[parent].push(idx);
            }
        }
        let mut queue: VecDeque<usize> = (0..self.domains.len())
            .filter(|&idx| indegree[idx] == 0)
            .collect();

        let mut resolved: Vec<Option<Frequency>> = vec![None; self.domains.len()];
        let mut order = Vec::with_capacity(self.domains.len());
        while let Some(idx) = queue.pop_front() {
            let spec = &self.domains[idx];
            let source_frequency = match &spec.source {
                ClockSource::Reference(name) => {
                    self.references[ref_by_name[name.as_str()]].frequency
                }
                ClockSource::Domain(name) => {
                    // Parent was processed before this node was enqueued.
                    resolved[domain_by_name[name.as_str()]]
                        .ok_or_else(|| PlanError::CycleDetected(spec.name.clone()))?
                }
            };
            let computed = source_frequency.scale(spec.multiply, spec.divide)?;
            if computed != spec.target {
                return Err(PlanError::FrequencyMismatch {
                    domain: spec.name.clone(),
                    declared: spec.target,
                    computed,
                });
            }
            resolved[idx] = Some(computed);
            order.push(idx);
            for &child in &children[idx] {
                indegree[child] -= 1;
                if indegree[child] == 0 {
                    queue.push_back(child);
                }
            }
        }

        if order.len() != self.domains.len() {
            // Some domain never became reachable from a root: it sits on a
            // cycle. Report the first one in declaration order.
            let stuck = self
                .domains
                .iter()
                .enumerate()
                .find(|(idx, _)| resolved[*idx].is_none())
                .map(|(_, d)| d.name.clone())
                .unwrap_or_default();
            return Err(PlanError::CycleDetected(stuck));
        }

        let domains = order
            .into_iter()
            .map(|idx| {
                let spec = &self.domains[idx];
                ResolvedDomain {
                    id: DomainId::from_raw(idx as u32),
                    name: spec.name.clone(),
                    source: spec.source.clone(),
                    frequency: resolved[idx].unwrap_or(spec.target),
                    multiply: spec.multiply,
                    divide: spec.divide,
                    phase: spec.phase,
                    duty: spec.duty,
                    stage: spec.stage.clone(),
                    reset_after: spec.reset_after.clone(),
                }
            })
            .collect::<Vec<_>>();
        let index = domains
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();

        Ok(ResolvedGraph {
            references: self.references.clone(),
            domains,
            index,
        })
    }
}

/// A fully validated clock domain with its exact resolved frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDomain {
    /// The domain's ID (its declaration index in the graph).
    pub id: DomainId,
    /// The domain name.
    pub name: String,
    /// Where this domain's clock comes from.
    pub source: ClockSource,
    /// The resolved frequency, equal to the declared target exactly.
    pub frequency: Frequency,
    /// Multiply factor applied to the source frequency.
    pub multiply: u64,
    /// Divide factor applied to the source frequency.
    pub divide: u64,
    /// Phase offset of this domain's clock.
    pub phase: Phase,
    /// Duty cycle of this domain's clock.
    pub duty: DutyCycle,
    /// The generating stage, when fed by a PLL/DCM tap.
    pub stage: Option<String>,
    /// Reset-only upstream domains, validated against the graph.
    pub reset_after: Vec<String>,
}

/// The immutable result of resolving a [`ClockDomainGraph`].
///
/// Domains are stored in topological order: every domain appears after the
/// domain or reference it derives its clock from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGraph {
    references: Vec<ReferenceInput>,
    domains: Vec<ResolvedDomain>,
    index: BTreeMap<String, usize>,
}

impl ResolvedGraph {
    /// Returns the resolved domains in topological order.
    pub fn domains(&self) -> &[ResolvedDomain] {
        &self.domains
    }

    /// Returns the reference inputs the graph is rooted at.
    pub fn references(&self) -> &[ReferenceInput] {
        &self.references
    }

    /// Returns the domain with the given name, if present.
    pub fn domain(&self, name: &str) -> Option<&ResolvedDomain> {
        self.index.get(name).map(|&i| &self.domains[i])
    }

    /// Returns the number of resolved domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Returns whether the graph has no domains.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
