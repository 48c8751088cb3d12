//! Semantic validation for parsed registry values.

use anyhow::{bail, Result};
use lakeline_catalog::validate_identifier;

use crate::config::types::{PipelineConfig, SourceTablesConfig};

/// Validate the source-table registry.
/// Returns `Ok(())` if valid, Err listing every problem found if not.
///
/// # Errors
///
/// Returns an error listing all validation failures.
pub fn validate_source_tables(config: &SourceTablesConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.connection.kind.trim().is_empty() {
        errors.push("Connection type must not be empty".to_string());
    }
    if config.connection.server.trim().is_empty() {
        errors.push("Connection server must not be empty".to_string());
    }
    if config.connection.database.trim().is_empty() {
        errors.push("Connection database must not be empty".to_string());
    }
    if !config.connection.trusted_connection && config.connection.username.is_none() {
        errors.push(
            "Connection must set trusted_connection or provide username/password".to_string(),
        );
    }

    for (i, table) in config.tables.iter().enumerate() {
        if let Err(err) = validate_identifier(&table.name) {
            errors.push(format!("Table {i}: {err}"));
        }
        if let Err(err) = validate_identifier(&table.schema) {
            errors.push(format!("Table {i} ('{}'): schema: {err}", table.name));
        }
    }

    finish(errors)
}

/// Validate a pipeline definition.
///
/// # Errors
///
/// Returns an error listing all validation failures.
pub fn validate_pipeline(config: &PipelineConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.name.trim().is_empty() {
        errors.push("Pipeline name must not be empty".to_string());
    }
    if config.steps.is_empty() {
        errors.push("Pipeline must declare at least one step".to_string());
    }
    for (i, step) in config.steps.iter().enumerate() {
        if step.trim().is_empty() {
            errors.push(format!("Step {i} is empty"));
        }
    }

    finish(errors)
}

fn finish(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        bail!("Validation failed:\n  - {}", errors.join("\n  - "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{ConnectionConfig, SourceTableEntry};

    fn connection() -> ConnectionConfig {
        ConnectionConfig {
            kind: "postgres".into(),
            server: "localhost:5432".into(),
            database: "shop".into(),
            trusted_connection: true,
            username: None,
            password: None,
            connect_timeout_secs: None,
        }
    }

    #[test]
    fn valid_source_registry_passes() {
        let config = SourceTablesConfig {
            connection: connection(),
            tables: vec![SourceTableEntry {
                name: "customers".into(),
                schema: "sales".into(),
                description: None,
                query: None,
            }],
        };
        validate_source_tables(&config).unwrap();
    }

    #[test]
    fn unsafe_table_name_is_reported() {
        let config = SourceTablesConfig {
            connection: connection(),
            tables: vec![SourceTableEntry {
                name: "cust; DROP TABLE x".into(),
                schema: "sales".into(),
                description: None,
                query: None,
            }],
        };
        let err = validate_source_tables(&config).unwrap_err();
        assert!(err.to_string().contains("Table 0"));
    }

    #[test]
    fn missing_auth_is_reported() {
        let mut config = SourceTablesConfig {
            connection: connection(),
            tables: vec![],
        };
        config.connection.trusted_connection = false;
        let err = validate_source_tables(&config).unwrap_err();
        assert!(err.to_string().contains("trusted_connection"));
    }

    #[test]
    fn all_errors_are_collected() {
        let config = PipelineConfig {
            name: "  ".into(),
            description: None,
            steps: vec![],
        };
        let err = validate_pipeline(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("at least one step"));
    }
}
