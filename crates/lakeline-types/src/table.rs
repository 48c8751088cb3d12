//! Table references and provenance records.

use serde::{Deserialize, Serialize};

use crate::layer::Layer;

/// Logical table identifier: a layer plus a table name.
///
/// Unique within the catalog. The referenced table may be replaced
/// wholesale by re-running its producing step; the reference itself never
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub layer: Layer,
    pub name: String,
}

impl TableRef {
    /// Create a reference to `<layer>.<name>`.
    #[must_use]
    pub fn new(layer: Layer, name: impl Into<String>) -> Self {
        Self {
            layer,
            name: name.into(),
        }
    }

    /// Schema-qualified name, e.g. `raw.customers`.
    #[must_use]
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.layer, self.name)
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.layer, self.name)
    }
}

/// Provenance fields supplied by the producer of a table.
///
/// The catalog completes these into a [`TableMetadata`] by adding counts,
/// column names, and the materialization timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvenanceInput {
    /// Name of the producing unit or extraction.
    pub produced_by: String,
    /// Free-text description of the table.
    pub description: Option<String>,
    /// Declared inputs, informational only.
    pub depends_on: Vec<String>,
    /// Fully qualified source table, for extracted tables.
    pub source_table: Option<String>,
    /// Query used to read the source, for extracted tables.
    pub source_query: Option<String>,
}

/// Provenance record attached to a table in the catalog.
///
/// Written whole on every materialization and overwritten whole on the
/// next one; there is exactly one current record per [`TableRef`].
/// `recorded_at` is an RFC 3339 UTC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub table: TableRef,
    pub produced_by: String,
    pub recorded_at: String,
    pub row_count: u64,
    pub column_count: u64,
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_query: Option<String>,
}
