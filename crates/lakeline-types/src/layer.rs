//! Refinement layers of the analytical store.

use serde::{Deserialize, Serialize};

/// Refinement stage of a table.
///
/// Layers form a total order `Raw < Cleaned < Curated`; a transformation's
/// output layer is expected to sit at or above every layer it reads from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Untransformed extracts from source systems.
    Raw,
    /// Standardized and validated data.
    Cleaned,
    /// Analytics-ready derived tables.
    Curated,
}

impl Layer {
    /// All layers in refinement order.
    pub const ALL: [Self; 3] = [Self::Raw, Self::Cleaned, Self::Curated];

    /// Schema name for storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Cleaned => "cleaned",
            Self::Curated => "curated",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known layer name.
#[derive(Debug, thiserror::Error)]
#[error("unknown layer '{0}', expected raw, cleaned, or curated")]
pub struct ParseLayerError(pub String);

impl std::str::FromStr for Layer {
    type Err = ParseLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "cleaned" => Ok(Self::Cleaned),
            "curated" => Ok(Self::Curated),
            other => Err(ParseLayerError(other.to_string())),
        }
    }
}
