//! Project directory layout.
//!
//! All paths derive from one base directory:
//!
//! ```text
//! config/          source_tables.yml, pipeline.yml, named_pipelines.yml
//! sql/cleaned/     cleaning transformation units
//! sql/curated/     analytics transformation units
//! data/            catalog database and parquet exports (gitignored)
//! ```

use std::path::{Path, PathBuf};

use lakeline_catalog::CatalogConfig;

/// Alias the catalog database is attached under.
const CATALOG_NAME: &str = "lakeline";

/// Paths of one Lakeline project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    base_dir: PathBuf,
}

impl ProjectLayout {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.base_dir.join("config")
    }

    #[must_use]
    pub fn sql_dir(&self) -> PathBuf {
        self.base_dir.join("sql")
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Parquet exports land under `data/<layer>/<table>.parquet`.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.data_dir()
    }

    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir().join("catalog.duckdb")
    }

    #[must_use]
    pub fn source_tables_path(&self) -> PathBuf {
        self.config_dir().join("source_tables.yml")
    }

    #[must_use]
    pub fn pipeline_path(&self) -> PathBuf {
        self.config_dir().join("pipeline.yml")
    }

    #[must_use]
    pub fn named_pipelines_path(&self) -> PathBuf {
        self.config_dir().join("named_pipelines.yml")
    }

    /// Catalog location for this project.
    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            catalog_path: self.catalog_path(),
            catalog_name: CATALOG_NAME.to_string(),
        }
    }

    /// Create the project directory tree if missing.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if a directory cannot be created.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [
            self.config_dir(),
            self.sql_dir().join("cleaned"),
            self.sql_dir().join("curated"),
            self.data_dir(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}
