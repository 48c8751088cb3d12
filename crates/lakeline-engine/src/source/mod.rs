//! Source connectivity: the connector contract and concrete clients.

pub mod postgres;

use crate::config::parser::env_snapshot;
use crate::config::types::ConnectionConfig;
use lakeline_types::ResultSet;

/// Errors from the external source boundary.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The configured connection `type` has no client.
    #[error("unsupported source type '{0}'")]
    UnsupportedKind(String),

    /// The source could not be reached or refused the session.
    #[error("could not connect to source: {0}")]
    Connect(String),

    /// The extraction query failed or returned an unmappable column.
    #[error("source query failed: {0}")]
    Query(String),
}

/// A live client against one relational source.
///
/// Object-safe so the extractor can run against a test double.
pub trait SourceConnector {
    /// Run `query` and return the full result set.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Query`] on query or row-mapping failure.
    fn fetch(&mut self, query: &str) -> Result<ResultSet, SourceError>;
}

/// Open a connector for `config`, resolving `${VAR}` placeholders in the
/// connection parameters against the current process environment.
///
/// # Errors
///
/// Returns [`SourceError::UnsupportedKind`] for an unknown `type`,
/// [`SourceError::Connect`] when the source is unreachable.
pub fn connect(config: &ConnectionConfig) -> Result<Box<dyn SourceConnector>, SourceError> {
    let resolved = config.resolved(&env_snapshot());
    match resolved.kind.as_str() {
        "postgres" => Ok(Box::new(postgres::PostgresConnector::connect(&resolved)?)),
        other => Err(SourceError::UnsupportedKind(other.to_string())),
    }
}
