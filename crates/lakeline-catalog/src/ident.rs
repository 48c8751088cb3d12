//! Allow-listed identifier validation.
//!
//! Every schema, table, or column name interpolated into DDL or COPY text
//! must pass through here first; configuration-sourced identifiers are
//! otherwise an injection vector.

use crate::error::{CatalogError, Result};

/// Validate a single (unqualified) identifier.
///
/// Accepts `[A-Za-z0-9_]` with a leading letter or underscore.
///
/// # Errors
///
/// Returns [`CatalogError::Identifier`] describing the first violation.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CatalogError::Identifier(
            "identifier must not be empty".into(),
        ));
    }

    let mut chars = name.chars();
    let first = chars.next().unwrap_or_default();
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(CatalogError::Identifier(format!(
            "identifier '{name}' must start with a letter or underscore"
        )));
    }

    for ch in chars {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(CatalogError::Identifier(format!(
                "identifier '{name}' contains invalid character '{ch}'"
            )));
        }
    }

    Ok(())
}
