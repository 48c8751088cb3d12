//! Registry structures resolved from the project's YAML files.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::parser::resolve_placeholders;

/// `config/source_tables.yml`: connection descriptor plus the tables that
/// may be extracted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTablesConfig {
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub tables: Vec<SourceTableEntry>,
}

impl SourceTablesConfig {
    /// Find a source table by its short name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&SourceTableEntry> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Connection descriptor for the external source.
///
/// Every string field may carry `${VAR}` placeholders; they are resolved
/// against a process-environment snapshot at connect time, and unresolved
/// placeholders are left verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub server: String,
    pub database: String,
    /// OS-level authentication; no password is sent.
    #[serde(default)]
    pub trusted_connection: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Connect timeout in seconds; connects hang on the driver default
    /// otherwise.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl ConnectionConfig {
    /// Copy of this descriptor with `${VAR}` placeholders substituted from
    /// `env`.
    #[must_use]
    pub fn resolved(&self, env: &HashMap<String, String>) -> Self {
        Self {
            kind: resolve_placeholders(&self.kind, env),
            server: resolve_placeholders(&self.server, env),
            database: resolve_placeholders(&self.database, env),
            trusted_connection: self.trusted_connection,
            username: self
                .username
                .as_deref()
                .map(|v| resolve_placeholders(v, env)),
            password: self
                .password
                .as_deref()
                .map(|v| resolve_placeholders(v, env)),
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }
}

/// One extractable table in the source registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTableEntry {
    pub name: String,
    pub schema: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Overrides the default `SELECT * FROM <schema>.<name>`.
    #[serde(default)]
    pub query: Option<String>,
}

/// `config/pipeline.yml`: an ordered transformation step list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// `config/named_pipelines.yml`: reusable pipelines looked up by name.
/// `BTreeMap` keeps listing order deterministic.
pub type NamedPipelines = BTreeMap<String, NamedPipeline>;

/// A named pipeline: optional extraction subset plus transform steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedPipeline {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extract: Option<ExtractSpec>,
    #[serde(default)]
    pub transform: Option<TransformSpec>,
}

/// Tables a named pipeline wants extracted first. Entries may be
/// qualified (`sales.customers`); matching is by short name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractSpec {
    #[serde(default)]
    pub tables: Vec<String>,
}

/// Transform step list of a named pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformSpec {
    #[serde(default)]
    pub steps: Vec<String>,
}
