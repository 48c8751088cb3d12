//! Table staleness decisions.

use std::time::Duration;

use chrono::{DateTime, Utc};
use lakeline_catalog::{CatalogError, CatalogSession};
use lakeline_types::TableRef;

/// Default rebuild window: a table older than this is rebuilt.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Decides whether a table must be (re)materialized.
///
/// Absence is a normal "needs work" signal, never an error; only store
/// failures propagate.
pub struct FreshnessOracle<'a> {
    session: &'a CatalogSession,
}

impl<'a> FreshnessOracle<'a> {
    #[must_use]
    pub fn new(session: &'a CatalogSession) -> Self {
        Self { session }
    }

    /// True when `table` must be rebuilt: it was never materialized, its
    /// last snapshot time cannot be resolved, or that snapshot is older
    /// than `max_age`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on store failure only.
    pub fn is_stale(&self, table: &TableRef, max_age: Duration) -> Result<bool, CatalogError> {
        if self.session.table_metadata(table)?.is_none() {
            return Ok(true);
        }
        let Some(last) = self.session.last_snapshot_time(table)? else {
            // Provenance without a snapshot record should not happen, but
            // serving possibly-absent data is worse than rebuilding.
            return Ok(true);
        };
        Ok(exceeds_max_age(last, Utc::now(), max_age))
    }
}

/// Strict staleness comparison: an age of exactly `max_age` is fresh.
fn exceeds_max_age(last: DateTime<Utc>, now: DateTime<Utc>, max_age: Duration) -> bool {
    let age = now.signed_duration_since(last);
    let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);
    age > max_age
}
