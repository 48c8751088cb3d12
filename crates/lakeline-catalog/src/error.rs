//! Catalog error types.

/// Errors produced by [`CatalogSession`](crate::CatalogSession) operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog database could not be attached. Never retried: a locked
    /// file means another session owns the catalog.
    #[error("could not attach catalog: {message}")]
    Attach { message: String },

    /// Underlying DuckDB failure.
    #[error("catalog store error: {0}")]
    Store(#[from] duckdb::Error),

    /// File-system I/O failure (e.g. creating the data directory).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// An identifier failed the allow-list check.
    #[error("invalid identifier: {0}")]
    Identifier(String),

    /// A unit body ran to completion without creating its declared table.
    #[error("execution did not produce table '{0}'")]
    MissingOutput(String),

    /// A result set with no columns cannot become a table.
    #[error("cannot materialize '{0}' from an empty column set")]
    EmptyColumns(String),

    /// A bookkeeping row could not be decoded.
    #[error("malformed catalog record: {0}")]
    Malformed(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_error_displays_message() {
        let err = CatalogError::Attach {
            message: "file is locked".into(),
        };
        assert!(err.to_string().contains("file is locked"));
    }

    #[test]
    fn io_error_wraps() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CatalogError::Io(inner);
        assert!(err.to_string().contains("i/o"));
    }

    #[test]
    fn missing_output_names_the_table() {
        let err = CatalogError::MissingOutput("cleaned.customers".into());
        assert!(err.to_string().contains("cleaned.customers"));
    }
}
