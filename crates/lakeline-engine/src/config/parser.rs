//! Registry file loading and `${VAR}` placeholder substitution.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::types::{NamedPipelines, PipelineConfig, SourceTablesConfig};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex")
});

/// Substitute `${VAR}` patterns from `env`.
///
/// The one substitution point for connection parameters: placeholders
/// whose variable is absent from `env` are left verbatim, so a missing
/// secret surfaces as a connect failure rather than a parse failure.
#[must_use]
pub fn resolve_placeholders(input: &str, env: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            env.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Snapshot of the process environment for placeholder resolution.
#[must_use]
pub fn env_snapshot() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Load the source-table registry.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
pub fn load_source_tables(path: &Path) -> Result<SourceTablesConfig> {
    let content = read(path)?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse source tables: {}", path.display()))
}

/// Load a pipeline definition.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
pub fn load_pipeline(path: &Path) -> Result<PipelineConfig> {
    let content = read(path)?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse pipeline: {}", path.display()))
}

/// Load the named-pipeline registry.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
pub fn load_named_pipelines(path: &Path) -> Result<NamedPipelines> {
    let content = read(path)?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse named pipelines: {}", path.display()))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn known_placeholders_are_substituted() {
        let out = resolve_placeholders(
            "host=${DB_HOST} port=5432",
            &env(&[("DB_HOST", "db.internal")]),
        );
        assert_eq!(out, "host=db.internal port=5432");
    }

    #[test]
    fn unknown_placeholders_stay_verbatim() {
        let out = resolve_placeholders("pw=${NOT_SET_ANYWHERE}", &env(&[]));
        assert_eq!(out, "pw=${NOT_SET_ANYWHERE}");
    }

    #[test]
    fn multiple_placeholders_in_one_string() {
        let out = resolve_placeholders(
            "${A} and ${B} and ${A}",
            &env(&[("A", "alpha"), ("B", "beta")]),
        );
        assert_eq!(out, "alpha and beta and alpha");
    }

    #[test]
    fn malformed_placeholders_pass_through() {
        let out = resolve_placeholders("${} $HOME ${1BAD}", &env(&[("HOME", "/root")]));
        assert_eq!(out, "${} $HOME ${1BAD}");
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load_pipeline(Path::new("/nonexistent/pipeline.yml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pipeline.yml"));
    }

    #[test]
    fn pipeline_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yml");
        std::fs::write(
            &path,
            "name: main\nsteps:\n  - sql/cleaned/customers_cleaned.sql\n",
        )
        .unwrap();

        let pipeline = load_pipeline(&path).unwrap();
        assert_eq!(pipeline.name, "main");
        assert_eq!(pipeline.steps.len(), 1);
    }
}
