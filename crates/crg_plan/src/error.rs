//! Error types for clock/reset plan construction.
//!
//! Every error here is deterministic and detected at plan-construction time.
//! None is transient and none is recoverable: an approximate clock frequency
//! or an unsynchronized reset edge is a correctness bug in the generated
//! hardware, so a plan either resolves completely or fails outright, naming
//! the offending domain or stage.

use crg_common::{Frequency, FrequencyError};

/// Errors that can occur while planning clocks or deriving resets.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// No exact multiply/divide configuration reaches the target frequency
    /// within the hardware constraints.
    #[error("no exact solution for {target} from {reference} within constraints")]
    NoExactSolution {
        /// The reference frequency the stage is driven from.
        reference: Frequency,
        /// The unreachable target frequency.
        target: Frequency,
    },

    /// A reference clock or domain name was declared twice.
    #[error("duplicate clock name '{0}'")]
    DuplicateName(String),

    /// A domain names a source that has not been declared. Sources must be
    /// declared before their dependents; forward references are rejected.
    ///
    /// The field is `source_name` rather than `source` because thiserror
    /// reserves that name for the wrapped-error chain.
    #[error("domain '{domain}' references unknown source '{source_name}'")]
    UnknownSource {
        /// The domain being added.
        domain: String,
        /// The undeclared source name.
        source_name: String,
    },

    /// A domain's declared target frequency does not equal the frequency
    /// computed from its source and multiply/divide factors. This indicates
    /// a configuration bug, never a value to approximate.
    #[error("domain '{domain}' declares {declared} but resolves to {computed}")]
    FrequencyMismatch {
        /// The offending domain.
        domain: String,
        /// The frequency the domain declared.
        declared: Frequency,
        /// The frequency computed from source × multiply / divide.
        computed: Frequency,
    },

    /// A domain transitively depends on its own clock output.
    #[error("clock domain '{0}' transitively depends on itself")]
    CycleDetected(String),

    /// Reset sequencing found a domain generated by a stage that has no
    /// registered lock signal.
    #[error("domain '{domain}' is generated by stage '{stage}' which has no lock signal")]
    UnknownStage {
        /// The domain whose reset is being derived.
        domain: String,
        /// The stage missing from the lock-signal map.
        stage: String,
    },

    /// A stage was asked for more output taps than its hardware primitive
    /// provides.
    #[error("DCM stage '{stage}' synthesizes one output but {requested} taps were requested")]
    TooManyTaps {
        /// The over-subscribed stage.
        stage: String,
        /// How many taps were requested.
        requested: usize,
    },

    /// Frequency arithmetic failed (zero factor or overflow).
    #[error(transparent)]
    Frequency(#[from] FrequencyError),
}
