//! Pipeline error taxonomy.
//!
//! Validation-class conditions (unknown step prefixes, unresolvable
//! extraction names) are handled as warn-and-skip inside the orchestrator
//! and never become errors. Everything here is I/O-class or a hard
//! configuration miss: it terminates the run at the current step boundary.

use lakeline_catalog::CatalogError;

use crate::source::SourceError;

/// A hard failure during pipeline execution.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required registry entry, file, or header field is absent.
    #[error("configuration entry missing: {0}")]
    ConfigMissing(String),

    /// The external source could not be reached or queried.
    #[error(transparent)]
    Connection(#[from] SourceError),

    /// Catalog attach or store failure outside a specific step.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Extraction aborted while writing the raw layer; the previous table
    /// contents are untouched.
    #[error("extraction of '{table}' failed: {source}")]
    Extraction {
        table: String,
        #[source]
        source: CatalogError,
    },

    /// A transformation unit body failed against the store; nothing was
    /// exported for it.
    #[error("transformation '{unit}' failed: {source}")]
    Execution {
        unit: String,
        #[source]
        source: CatalogError,
    },
}

impl PipelineError {
    /// True for transformation-body failures.
    #[must_use]
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution { .. })
    }
}

/// A pipeline run that stopped before completing all resolved steps.
///
/// `step` is the index of the failing transform step (0 when the run
/// failed before or during extraction); `completed` counts the transform
/// steps that finished successfully.
#[derive(Debug, thiserror::Error)]
#[error("run stopped at step {step} ({completed} completed): {source}")]
pub struct RunFailure {
    pub step: usize,
    pub completed: usize,
    #[source]
    pub source: PipelineError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_error_carries_unit_name() {
        let err = PipelineError::Execution {
            unit: "customers_cleaned".into(),
            source: CatalogError::MissingOutput("cleaned.customers_cleaned".into()),
        };
        assert!(err.is_execution());
        assert!(err.to_string().contains("customers_cleaned"));
    }

    #[test]
    fn run_failure_reports_step_index() {
        let failure = RunFailure {
            step: 2,
            completed: 2,
            source: PipelineError::ConfigMissing("x".into()),
        };
        assert!(failure.to_string().contains("step 2"));
    }
}
