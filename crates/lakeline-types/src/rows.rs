//! Row values exchanged between source connectors and the catalog.

use serde::{Deserialize, Serialize};

/// A single value read from a relational source.
///
/// Deliberately small: the catalog infers column types from these and
/// anything a connector cannot map losslessly travels as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SourceValue {
    /// True when this value is SQL NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A complete source query result: column names plus row-major values.
///
/// Every row is expected to have exactly `columns.len()` values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SourceValue>>,
}

impl ResultSet {
    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> u64 {
        self.rows.len() as u64
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> u64 {
        self.columns.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_shape() {
        let rs = ResultSet {
            columns: vec!["id".into(), "name".into()],
            rows: vec![
                vec![SourceValue::Int(1), SourceValue::Text("a".into())],
                vec![SourceValue::Int(2), SourceValue::Null],
            ],
        };
        assert_eq!(rs.row_count(), 2);
        assert_eq!(rs.column_count(), 2);
    }

    #[test]
    fn null_detection() {
        assert!(SourceValue::Null.is_null());
        assert!(!SourceValue::Int(0).is_null());
    }
}
