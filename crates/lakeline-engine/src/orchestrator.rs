//! Pipeline orchestration.
//!
//! Steps run in the literal order the definition declares them —
//! `depends_on` headers are informational, never a sort key — and the run
//! stops at the first hard failure, reporting the failing step index.

use std::path::{Component, Path, PathBuf};

use lakeline_catalog::CatalogSession;
use lakeline_types::{Layer, TableRef};

use crate::config::types::{ConnectionConfig, NamedPipelines, PipelineConfig, SourceTablesConfig};
use crate::error::{PipelineError, RunFailure};
use crate::extract::Extractor;
use crate::freshness::{FreshnessOracle, DEFAULT_MAX_AGE};
use crate::result::RunReport;
use crate::source::{self, SourceConnector, SourceError};
use crate::transform::TransformationExecutor;

type SourceFactory<'a> =
    Box<dyn Fn(&ConnectionConfig) -> Result<Box<dyn SourceConnector>, SourceError> + 'a>;

/// Drives extraction and transformation for one pipeline run.
///
/// Holds the run's [`CatalogSession`] by reference; the session outlives
/// every step and is the only route to the store.
pub struct Orchestrator<'a> {
    session: &'a CatalogSession,
    base_dir: PathBuf,
    export_dir: Option<PathBuf>,
    source_factory: SourceFactory<'a>,
}

impl<'a> Orchestrator<'a> {
    /// Orchestrator resolving step paths against `base_dir`.
    #[must_use]
    pub fn new(session: &'a CatalogSession, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            session,
            base_dir: base_dir.into(),
            export_dir: None,
            source_factory: Box::new(|config| source::connect(config)),
        }
    }

    /// Export every materialized table under `dir`.
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    /// Replace how source connectors are opened (tests use a double).
    #[must_use]
    pub fn with_source_factory(
        mut self,
        factory: impl Fn(&ConnectionConfig) -> Result<Box<dyn SourceConnector>, SourceError> + 'a,
    ) -> Self {
        self.source_factory = Box::new(factory);
        self
    }

    /// Execute a pipeline definition's transform steps in declared order.
    ///
    /// # Errors
    ///
    /// Returns [`RunFailure`] carrying the failing step index; steps after
    /// it never execute.
    pub fn run(&self, pipeline: &PipelineConfig) -> Result<RunReport, RunFailure> {
        tracing::info!(
            pipeline = %pipeline.name,
            steps = pipeline.steps.len(),
            "Starting pipeline run"
        );
        let mut report = RunReport::new(&pipeline.name);
        self.run_steps(&mut report, &pipeline.steps)?;
        tracing::info!(
            pipeline = %pipeline.name,
            completed = report.steps_completed,
            skipped = report.steps_skipped,
            "Pipeline completed"
        );
        Ok(report)
    }

    /// Execute a named pipeline: extraction subset first, then transforms.
    ///
    /// Requested extractions with no source-registry entry are skipped
    /// with a warning; extraction and transformation errors stop the run.
    ///
    /// # Errors
    ///
    /// Returns [`RunFailure`]; an unknown pipeline name fails before any
    /// step executes.
    pub fn run_named(
        &self,
        name: &str,
        registry: &NamedPipelines,
        source: &SourceTablesConfig,
    ) -> Result<RunReport, RunFailure> {
        let Some(named) = registry.get(name) else {
            return Err(RunFailure {
                step: 0,
                completed: 0,
                source: PipelineError::ConfigMissing(format!("named pipeline '{name}'")),
            });
        };
        tracing::info!(
            pipeline = name,
            description = named.description.as_deref().unwrap_or(""),
            "Running named pipeline"
        );

        let mut report = RunReport::new(name);

        if let Some(extract) = &named.extract {
            self.run_extractions(&mut report, &extract.tables, source)?;
        }
        if let Some(transform) = &named.transform {
            self.run_steps(&mut report, &transform.steps)?;
        }

        Ok(report)
    }

    fn run_extractions(
        &self,
        report: &mut RunReport,
        requested: &[String],
        source: &SourceTablesConfig,
    ) -> Result<(), RunFailure> {
        let oracle = FreshnessOracle::new(self.session);
        let extractor = Extractor::new(self.session);
        // One connection serves every stale table; none is opened when
        // everything is fresh.
        let mut connector: Option<Box<dyn SourceConnector>> = None;

        for request in requested {
            let short = request.rsplit('.').next().unwrap_or(request.as_str());
            let Some(entry) = source.table(short) else {
                tracing::warn!(
                    table = %request,
                    "No source registry entry for requested extraction, skipping"
                );
                report.extraction_skipped.push(request.clone());
                continue;
            };

            let table = TableRef::new(Layer::Raw, &entry.name);
            let stale = oracle
                .is_stale(&table, DEFAULT_MAX_AGE)
                .map_err(|err| self.extraction_failure(report, err.into()))?;
            if !stale {
                tracing::info!(table = %table, "Table is fresh, skipping extraction");
                report.extraction_fresh.push(entry.name.clone());
                continue;
            }

            let conn = match &mut connector {
                Some(conn) => conn,
                empty => {
                    let created = (self.source_factory)(&source.connection)
                        .map_err(|err| self.extraction_failure(report, err.into()))?;
                    empty.insert(created)
                }
            };

            extractor
                .extract_with(conn.as_mut(), entry, false)
                .map_err(|err| self.extraction_failure(report, err))?;
            report.extracted.push(entry.name.clone());
        }

        Ok(())
    }

    fn run_steps(&self, report: &mut RunReport, steps: &[String]) -> Result<(), RunFailure> {
        for (index, step) in steps.iter().enumerate() {
            let Some(layer) = step_layer(step) else {
                tracing::warn!(step = %step, "Unknown step path, skipping");
                report.steps_skipped += 1;
                continue;
            };

            let path = self.base_dir.join(step);
            let text = std::fs::read_to_string(&path).map_err(|err| RunFailure {
                step: index,
                completed: report.steps_completed,
                source: PipelineError::ConfigMissing(format!(
                    "transformation unit '{}': {err}",
                    path.display()
                )),
            })?;

            let executor = match &self.export_dir {
                Some(dir) => TransformationExecutor::with_export_dir(self.session, dir),
                None => TransformationExecutor::new(self.session),
            };
            executor.run(&text, layer).map_err(|source| RunFailure {
                step: index,
                completed: report.steps_completed,
                source,
            })?;
            report.steps_completed += 1;
        }
        Ok(())
    }

    /// Extraction happens before any transform step runs.
    fn extraction_failure(&self, report: &RunReport, source: PipelineError) -> RunFailure {
        RunFailure {
            step: 0,
            completed: report.steps_completed,
            source,
        }
    }
}

/// Target layer from a step path: its innermost `cleaned`/`curated`
/// directory. Anything else is unrecognized and the step is skipped.
fn step_layer(step: &str) -> Option<Layer> {
    let parent = Path::new(step).parent()?;
    for component in parent.components().rev() {
        if let Component::Normal(os) = component {
            match os.to_str() {
                Some("cleaned") => return Some(Layer::Cleaned),
                Some("curated") => return Some(Layer::Curated),
                _ => {}
            }
        }
    }
    None
}
