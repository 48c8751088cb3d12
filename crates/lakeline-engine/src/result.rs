//! Run outcome types.

use std::path::PathBuf;

use lakeline_types::TableMetadata;

/// Result of one extraction request.
#[derive(Debug, Clone)]
pub enum ExtractOutcome {
    /// The raw table was within its freshness window; the source was not
    /// contacted. Carries the existing provenance unchanged.
    Fresh(TableMetadata),
    /// The table was re-extracted and fully replaced.
    Extracted(TableMetadata),
}

impl ExtractOutcome {
    /// Provenance of the table after this call.
    #[must_use]
    pub fn metadata(&self) -> &TableMetadata {
        match self {
            Self::Fresh(meta) | Self::Extracted(meta) => meta,
        }
    }

    /// True when extraction was skipped as fresh.
    #[must_use]
    pub fn was_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

/// Result of one transformation step.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    pub metadata: TableMetadata,
    /// Where the table was exported, when an export directory is set.
    pub export_path: Option<PathBuf>,
}

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub pipeline: String,
    /// Transform steps that ran to completion.
    pub steps_completed: usize,
    /// Steps skipped for an unrecognized layer prefix.
    pub steps_skipped: usize,
    /// Tables re-extracted this run.
    pub extracted: Vec<String>,
    /// Tables left alone because they were fresh.
    pub extraction_fresh: Vec<String>,
    /// Requested extraction names with no registry entry.
    pub extraction_skipped: Vec<String>,
}

impl RunReport {
    #[must_use]
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            ..Self::default()
        }
    }
}
