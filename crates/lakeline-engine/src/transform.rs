//! Transformation unit execution.

use std::path::PathBuf;

use lakeline_catalog::CatalogSession;
use lakeline_types::{Layer, ProvenanceInput, TableRef, TransformUnit};

use crate::error::PipelineError;
use crate::result::TransformOutcome;

/// Runs one transformation unit against the catalog.
///
/// The unit body is trusted to (re)create exactly one table named
/// `<target_layer>.<header name>`; the executor never chooses output
/// names, it only records provenance under the parsed name and exports
/// under it.
pub struct TransformationExecutor<'a> {
    session: &'a CatalogSession,
    export_dir: Option<PathBuf>,
}

impl<'a> TransformationExecutor<'a> {
    /// Executor without parquet export.
    #[must_use]
    pub fn new(session: &'a CatalogSession) -> Self {
        Self {
            session,
            export_dir: None,
        }
    }

    /// Executor that exports each materialized table to
    /// `<dir>/<layer>/<name>.parquet`.
    #[must_use]
    pub fn with_export_dir(session: &'a CatalogSession, dir: impl Into<PathBuf>) -> Self {
        Self {
            session,
            export_dir: Some(dir.into()),
        }
    }

    /// Parse, execute, record provenance, and optionally export.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigMissing`] when the header has no
    /// `name`, [`PipelineError::Execution`] when the body fails — in which
    /// case no file is exported.
    pub fn run(
        &self,
        unit_text: &str,
        target_layer: Layer,
    ) -> Result<TransformOutcome, PipelineError> {
        let unit = TransformUnit::parse(unit_text);
        let Some(name) = unit.header.name.clone() else {
            return Err(PipelineError::ConfigMissing(
                "transformation unit has no 'name' header".into(),
            ));
        };
        let table = TableRef::new(target_layer, &name);

        if let Some(declared) = unit.header.layer {
            if declared != target_layer {
                tracing::warn!(
                    unit = %name,
                    declared = %declared,
                    target = %target_layer,
                    "Unit header declares a different layer than its step path"
                );
            }
        }
        for dep in &unit.header.depends_on {
            if let Some((dep_layer, _)) = dep.split_once('.') {
                if let Ok(dep_layer) = dep_layer.parse::<Layer>() {
                    if dep_layer > target_layer {
                        tracing::warn!(
                            unit = %name,
                            dependency = %dep,
                            "Unit reads from a layer above its own output layer"
                        );
                    }
                }
            }
        }

        tracing::info!(unit = %name, layer = %target_layer, "Executing transformation");

        let prov = ProvenanceInput {
            produced_by: name.clone(),
            description: unit.header.description.clone(),
            depends_on: unit.header.depends_on.clone(),
            source_table: None,
            source_query: None,
        };
        let metadata = self
            .session
            .materialize(unit.body, &table, &prov)
            .map_err(|source| PipelineError::Execution {
                unit: name.clone(),
                source,
            })?;

        let export_path = match &self.export_dir {
            Some(dir) => {
                let path = dir
                    .join(target_layer.as_str())
                    .join(format!("{name}.parquet"));
                self.session
                    .export_parquet(&table, &path)
                    .map_err(|source| PipelineError::Execution {
                        unit: name.clone(),
                        source,
                    })?;
                tracing::info!(unit = %name, path = %path.display(), "Exported table");
                Some(path)
            }
            None => None,
        };

        tracing::info!(unit = %name, rows = metadata.row_count, "Transformation complete");
        Ok(TransformOutcome {
            metadata,
            export_path,
        })
    }
}
