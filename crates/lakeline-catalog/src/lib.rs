//! Snapshot-versioned catalog storage for the Lakeline engine.
//!
//! Provides [`CatalogSession`], the single owner of a DuckDB connection
//! for the lifetime of one pipeline run: attach/detach lifecycle, layer
//! bootstrap, transactional table materialization with snapshot and
//! provenance bookkeeping, and parquet export.

#![warn(clippy::pedantic)]

pub mod error;
pub mod ident;
pub mod session;

pub use error::{CatalogError, Result};
pub use ident::validate_identifier;
pub use session::{CatalogConfig, CatalogSession, CatalogStats, SnapshotRecord, TableStats};
