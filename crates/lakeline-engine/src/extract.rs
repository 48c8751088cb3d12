//! Source-to-raw extraction.

use lakeline_catalog::{validate_identifier, CatalogSession};
use lakeline_types::{Layer, ProvenanceInput, TableRef};

use crate::config::types::{SourceTableEntry, SourceTablesConfig};
use crate::error::PipelineError;
use crate::freshness::{FreshnessOracle, DEFAULT_MAX_AGE};
use crate::result::ExtractOutcome;
use crate::source::{self, SourceConnector};

/// Pulls source tables into the raw layer, subject to freshness.
pub struct Extractor<'a> {
    session: &'a CatalogSession,
}

impl<'a> Extractor<'a> {
    #[must_use]
    pub fn new(session: &'a CatalogSession) -> Self {
        Self { session }
    }

    /// Extract one table, connecting to the source described by `source`.
    ///
    /// When the raw table is fresh and `force` is false, returns
    /// immediately without resolving a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Connection`] for source failures and
    /// [`PipelineError::Extraction`] for catalog write failures; either
    /// way the previous table contents are untouched.
    pub fn extract(
        &self,
        source: &SourceTablesConfig,
        entry: &SourceTableEntry,
        force: bool,
    ) -> Result<ExtractOutcome, PipelineError> {
        if let Some(fresh) = self.fresh_outcome(entry, force)? {
            return Ok(fresh);
        }
        let mut connector = source::connect(&source.connection)?;
        self.run_extraction(connector.as_mut(), entry)
    }

    /// Extract one table through an already-open connector. Same freshness
    /// gate as [`extract`](Self::extract).
    ///
    /// # Errors
    ///
    /// See [`extract`](Self::extract).
    pub fn extract_with(
        &self,
        connector: &mut dyn SourceConnector,
        entry: &SourceTableEntry,
        force: bool,
    ) -> Result<ExtractOutcome, PipelineError> {
        if let Some(fresh) = self.fresh_outcome(entry, force)? {
            return Ok(fresh);
        }
        self.run_extraction(connector, entry)
    }

    fn fresh_outcome(
        &self,
        entry: &SourceTableEntry,
        force: bool,
    ) -> Result<Option<ExtractOutcome>, PipelineError> {
        if force {
            return Ok(None);
        }
        let table = TableRef::new(Layer::Raw, &entry.name);
        let oracle = FreshnessOracle::new(self.session);
        if oracle.is_stale(&table, DEFAULT_MAX_AGE)? {
            return Ok(None);
        }
        match self.session.table_metadata(&table)? {
            Some(meta) => {
                tracing::info!(table = %table, "Table is fresh, skipping extraction");
                Ok(Some(ExtractOutcome::Fresh(meta)))
            }
            None => Ok(None),
        }
    }

    fn run_extraction(
        &self,
        connector: &mut dyn SourceConnector,
        entry: &SourceTableEntry,
    ) -> Result<ExtractOutcome, PipelineError> {
        let table = TableRef::new(Layer::Raw, &entry.name);
        let source_table = format!("{}.{}", entry.schema, entry.name);
        let query = match &entry.query {
            Some(query) => query.clone(),
            None => {
                validate_identifier(&entry.schema)?;
                validate_identifier(&entry.name)?;
                format!("SELECT * FROM {source_table}")
            }
        };

        tracing::info!(table = %source_table, "Extracting table");
        let data = connector.fetch(&query)?;
        tracing::info!(table = %source_table, rows = data.row_count(), "Extraction query complete");

        let prov = ProvenanceInput {
            produced_by: format!("extract:{}", entry.name),
            description: entry
                .description
                .clone()
                .or_else(|| Some(format!("Raw extract from {source_table}"))),
            depends_on: Vec::new(),
            source_table: Some(source_table),
            source_query: Some(query),
        };

        let meta = self
            .session
            .replace_table(&table, &data, &prov)
            .map_err(|source| PipelineError::Extraction {
                table: table.qualified(),
                source,
            })?;

        tracing::info!(table = %table, rows = meta.row_count, "Raw table replaced");
        Ok(ExtractOutcome::Extracted(meta))
    }
}
