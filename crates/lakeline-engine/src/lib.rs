//! Orchestration core of the Lakeline pipeline engine.
//!
//! Decides which tables need (re)materializing, sequences extraction and
//! transformation steps, and records provenance for everything it builds.
//! Storage lives in `lakeline-catalog`; this crate drives it.

#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod extract;
pub mod freshness;
pub mod layout;
pub mod orchestrator;
pub mod result;
pub mod source;
pub mod transform;

pub use error::{PipelineError, RunFailure};
pub use extract::Extractor;
pub use freshness::{FreshnessOracle, DEFAULT_MAX_AGE};
pub use orchestrator::Orchestrator;
pub use result::{ExtractOutcome, RunReport, TransformOutcome};
pub use transform::TransformationExecutor;
