//! DuckDB-backed catalog session.
//!
//! One [`CatalogSession`] is opened per orchestrator run and owns the
//! store connection exclusively for that run. Every materialization is a
//! single transaction that replaces the table, appends a snapshot record,
//! and overwrites the table's provenance, so readers never observe a
//! half-updated catalog.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::types::Value;
use duckdb::{params, params_from_iter, Connection};

use lakeline_types::{Layer, ProvenanceInput, ResultSet, SourceValue, TableMetadata, TableRef};

use crate::error::{CatalogError, Result};
use crate::ident::validate_identifier;

/// Catalog timestamp format: fixed-width RFC 3339 UTC, so lexicographic
/// order equals chronological order.
const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Idempotent bootstrap DDL: layer schemas plus bookkeeping tables.
const BOOTSTRAP: &str = "
CREATE SCHEMA IF NOT EXISTS raw;
CREATE SCHEMA IF NOT EXISTS cleaned;
CREATE SCHEMA IF NOT EXISTS curated;

CREATE TABLE IF NOT EXISTS lake_snapshots (
    snapshot_id BIGINT NOT NULL,
    committed_at VARCHAR NOT NULL,
    layer VARCHAR NOT NULL,
    table_name VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS lake_provenance (
    layer VARCHAR NOT NULL,
    table_name VARCHAR NOT NULL,
    produced_by VARCHAR NOT NULL,
    recorded_at VARCHAR NOT NULL,
    row_count BIGINT NOT NULL,
    column_count BIGINT NOT NULL,
    columns VARCHAR NOT NULL,
    description VARCHAR,
    depends_on VARCHAR,
    source_table VARCHAR,
    source_query VARCHAR,
    PRIMARY KEY (layer, table_name)
);
";

/// Location and name of the catalog database.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog database file.
    pub catalog_path: PathBuf,
    /// Alias the catalog is attached under.
    pub catalog_name: String,
}

/// One row of the snapshot log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub snapshot_id: i64,
    pub committed_at: String,
    pub table: TableRef,
}

/// Per-table summary for `status` output.
#[derive(Debug, Clone)]
pub struct TableStats {
    pub table: TableRef,
    pub produced_by: String,
    pub row_count: u64,
    pub column_count: u64,
    pub last_snapshot: Option<String>,
}

/// Whole-catalog summary.
#[derive(Debug, Clone)]
pub struct CatalogStats {
    pub snapshot_count: u64,
    pub tables: Vec<TableStats>,
}

/// Live session against the snapshot-versioned catalog store.
///
/// Lifecycle: construct with [`open`](CatalogSession::open) (or
/// [`in_memory`](CatalogSession::in_memory) in tests), call
/// [`ensure_layers`](CatalogSession::ensure_layers) once, use, then drop or
/// [`close`](CatalogSession::close). A closed session cannot be reopened;
/// construct a new one.
pub struct CatalogSession {
    conn: Connection,
    attached: Option<String>,
}

impl CatalogSession {
    /// Open the catalog: a neutral in-memory connection with the catalog
    /// database attached and selected.
    ///
    /// If the catalog's parent directory does not exist it is created and
    /// the attach retried once; any other attach failure (most importantly
    /// a file locked by another session) is returned as
    /// [`CatalogError::Attach`] and never retried.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Attach`] when the catalog cannot be
    /// attached, [`CatalogError::Identifier`] for a bad catalog name.
    pub fn open(config: &CatalogConfig) -> Result<Self> {
        validate_identifier(&config.catalog_name)?;
        let conn = Connection::open_in_memory()?;

        if !is_attached(&conn, &config.catalog_name)? {
            attach_or_create(&conn, config)?;
        }
        conn.execute_batch(&format!("USE {};", config.catalog_name))?;

        tracing::info!(
            catalog = %config.catalog_name,
            path = %config.catalog_path.display(),
            "Catalog attached"
        );
        Ok(Self {
            conn,
            attached: Some(config.catalog_name.clone()),
        })
    }

    /// Purely in-memory session, for tests.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the in-memory database cannot be
    /// initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            attached: None,
        })
    }

    /// Create the raw/cleaned/curated schemas and bookkeeping tables.
    /// Safe to call on every open.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] on DDL failure.
    pub fn ensure_layers(&self) -> Result<()> {
        self.conn.execute_batch(BOOTSTRAP)?;
        Ok(())
    }

    /// Detach and release the connection.
    ///
    /// Equivalent to dropping the session; provided so callers can make
    /// the release point explicit. Detach failure is logged, not returned:
    /// the neutral `USE` beforehand already released the catalog file for
    /// the common cases, and the process is on its way out.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(name) = self.attached.take() else {
            return;
        };
        if let Err(err) = self.conn.execute_batch("USE memory;") {
            tracing::warn!(catalog = %name, error = %err, "Could not switch off catalog before detach");
        }
        match self.conn.execute_batch(&format!("DETACH {name};")) {
            Ok(()) => tracing::info!(catalog = %name, "Catalog detached"),
            Err(err) => {
                tracing::warn!(catalog = %name, error = %err, "Catalog detach failed");
            }
        }
    }

    // -----------------------------------------------------------------
    // Materialization
    // -----------------------------------------------------------------

    /// Replace `table` with the contents of `data`, transactionally.
    ///
    /// Creates the table from scratch (types inferred per column from the
    /// first non-null value), inserts every row, appends a snapshot
    /// record, and overwrites provenance — all in one commit. On any
    /// failure the previous table contents are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Identifier`] for a bad table or column
    /// name, [`CatalogError::EmptyColumns`] for a column-less result set,
    /// or [`CatalogError::Store`] on write failure.
    pub fn replace_table(
        &self,
        table: &TableRef,
        data: &ResultSet,
        prov: &ProvenanceInput,
    ) -> Result<TableMetadata> {
        validate_identifier(&table.name)?;
        if data.columns.is_empty() {
            return Err(CatalogError::EmptyColumns(table.qualified()));
        }
        for column in &data.columns {
            validate_identifier(column)?;
        }

        let column_defs = data
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| format!("{name} {}", column_ddl_type(&data.rows, idx)))
            .collect::<Vec<_>>()
            .join(", ");
        let create_sql = format!(
            "CREATE OR REPLACE TABLE {} ({column_defs});",
            table.qualified()
        );
        let placeholders = vec!["?"; data.columns.len()].join(", ");
        let insert_sql = format!("INSERT INTO {} VALUES ({placeholders})", table.qualified());

        self.with_txn(|conn| {
            conn.execute_batch(&create_sql)?;
            let mut stmt = conn.prepare(&insert_sql)?;
            for row in &data.rows {
                stmt.execute(params_from_iter(row.iter().map(sql_value)))?;
            }
            record_materialization(conn, table, prov, data.row_count(), &data.columns)
        })
    }

    /// Execute an opaque unit body expected to (re)create `table`, then
    /// record snapshot and provenance for it — one transaction.
    ///
    /// The body is trusted to target `table`; if the table does not exist
    /// once the body has run, the transaction is rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] when the body fails against the
    /// store and [`CatalogError::MissingOutput`] when it completes without
    /// producing `table`.
    pub fn materialize(
        &self,
        body: &str,
        table: &TableRef,
        prov: &ProvenanceInput,
    ) -> Result<TableMetadata> {
        validate_identifier(&table.name)?;

        self.with_txn(|conn| {
            conn.execute_batch(body)?;

            let columns = list_columns(conn, table)?;
            if columns.is_empty() {
                return Err(CatalogError::MissingOutput(table.qualified()));
            }
            let row_count: i64 = conn.query_row(
                &format!("SELECT count(*) FROM {}", table.qualified()),
                [],
                |row| row.get(0),
            )?;
            #[allow(clippy::cast_sign_loss)]
            let row_count = row_count as u64;
            record_materialization(conn, table, prov, row_count, &columns)
        })
    }

    /// Export the table's full current contents as one parquet file,
    /// overwriting any previous export.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the target directory cannot be
    /// created, [`CatalogError::Store`] on COPY failure.
    pub fn export_parquet(&self, table: &TableRef, path: &Path) -> Result<()> {
        validate_identifier(&table.name)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.conn.execute_batch(&format!(
            "COPY {} TO '{}' (FORMAT PARQUET);",
            table.qualified(),
            escape_literal(&path.to_string_lossy())
        ))?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Lookups — absence is a value, not an error
    // -----------------------------------------------------------------

    /// Current provenance record for `table`, if it was ever materialized.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] on store failure only.
    pub fn table_metadata(&self, table: &TableRef) -> Result<Option<TableMetadata>> {
        let result = self.conn.query_row(
            "SELECT produced_by, recorded_at, row_count, column_count, columns, \
                    description, depends_on, source_table, source_query \
             FROM lake_provenance WHERE layer = ? AND table_name = ?",
            params![table.layer.as_str(), table.name],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, Option<String>>(8)?,
                ))
            },
        );

        match result {
            Ok((
                produced_by,
                recorded_at,
                row_count,
                column_count,
                columns,
                description,
                depends_on,
                source_table,
                source_query,
            )) => {
                #[allow(clippy::cast_sign_loss)]
                let (row_count, column_count) = (row_count as u64, column_count as u64);
                Ok(Some(TableMetadata {
                    table: table.clone(),
                    produced_by,
                    recorded_at,
                    row_count,
                    column_count,
                    columns: decode_json_list(&columns),
                    description,
                    depends_on: depends_on.as_deref().map(decode_json_list).unwrap_or_default(),
                    source_table,
                    source_query,
                }))
            }
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CatalogError::Store(e)),
        }
    }

    /// Timestamp of the most recent snapshot that touched `table`.
    ///
    /// `None` when the table has never been part of a commit, or when the
    /// stored timestamp cannot be decoded — callers treat both as "needs
    /// work".
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] on store failure only.
    pub fn last_snapshot_time(&self, table: &TableRef) -> Result<Option<DateTime<Utc>>> {
        let raw: Option<String> = self.conn.query_row(
            "SELECT max(committed_at) FROM lake_snapshots WHERE layer = ? AND table_name = ?",
            params![table.layer.as_str(), table.name],
            |row| row.get(0),
        )?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }

    /// Whether `table` currently exists in the store.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] on store failure.
    pub fn table_exists(&self, table: &TableRef) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT count(*) FROM information_schema.tables \
             WHERE table_catalog = current_database() \
               AND table_schema = ? AND table_name = ?",
            params![table.layer.as_str(), table.name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Live `(rows, columns)` counts of the table's current contents.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] when the table is absent or the
    /// store fails.
    pub fn table_counts(&self, table: &TableRef) -> Result<(u64, u64)> {
        validate_identifier(&table.name)?;
        let rows: i64 = self.conn.query_row(
            &format!("SELECT count(*) FROM {}", table.qualified()),
            [],
            |row| row.get(0),
        )?;
        let columns = list_columns(&self.conn, table)?;
        #[allow(clippy::cast_sign_loss)]
        let rows = rows as u64;
        Ok((rows, columns.len() as u64))
    }

    /// Column names of the table's current contents, in ordinal order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] on store failure.
    pub fn table_columns(&self, table: &TableRef) -> Result<Vec<String>> {
        list_columns(&self.conn, table)
    }

    /// `(rows, columns)` of a parquet file, read back through the store.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] when the file cannot be read.
    pub fn parquet_file_counts(&self, path: &Path) -> Result<(u64, u64)> {
        let literal = escape_literal(&path.to_string_lossy());
        let rows: i64 = self.conn.query_row(
            &format!("SELECT count(*) FROM read_parquet('{literal}')"),
            [],
            |row| row.get(0),
        )?;
        let columns: i64 = self.conn.query_row(
            &format!("SELECT count(*) FROM (DESCRIBE SELECT * FROM read_parquet('{literal}'))"),
            [],
            |row| row.get(0),
        )?;
        #[allow(clippy::cast_sign_loss)]
        let (rows, columns) = (rows as u64, columns as u64);
        Ok((rows, columns))
    }

    // -----------------------------------------------------------------
    // Snapshot log
    // -----------------------------------------------------------------

    /// The full snapshot log, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] on store failure,
    /// [`CatalogError::Malformed`] if a log row cannot be decoded.
    pub fn snapshots(&self) -> Result<Vec<SnapshotRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT snapshot_id, committed_at, layer, table_name \
             FROM lake_snapshots ORDER BY snapshot_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (snapshot_id, committed_at, layer, table_name) = row?;
            let layer: Layer = layer
                .parse()
                .map_err(|_| CatalogError::Malformed(format!("snapshot layer '{layer}'")))?;
            out.push(SnapshotRecord {
                snapshot_id,
                committed_at,
                table: TableRef::new(layer, table_name),
            });
        }
        Ok(out)
    }

    /// Most recent snapshot at or before `at`, if any — the time-travel
    /// request surface.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] on store failure,
    /// [`CatalogError::Malformed`] for an undecodable log row.
    pub fn snapshot_as_of(&self, at: &DateTime<Utc>) -> Result<Option<SnapshotRecord>> {
        let cutoff = format_timestamp(at);
        let result = self.conn.query_row(
            "SELECT snapshot_id, committed_at, layer, table_name \
             FROM lake_snapshots WHERE committed_at <= ? \
             ORDER BY snapshot_id DESC LIMIT 1",
            params![cutoff],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        );

        match result {
            Ok((snapshot_id, committed_at, layer, table_name)) => {
                let layer: Layer = layer
                    .parse()
                    .map_err(|_| CatalogError::Malformed(format!("snapshot layer '{layer}'")))?;
                Ok(Some(SnapshotRecord {
                    snapshot_id,
                    committed_at,
                    table: TableRef::new(layer, table_name),
                }))
            }
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CatalogError::Store(e)),
        }
    }

    /// Catalog-wide statistics for `status` output.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] on store failure,
    /// [`CatalogError::Malformed`] for an undecodable provenance row.
    pub fn stats(&self) -> Result<CatalogStats> {
        let snapshot_count: i64 =
            self.conn
                .query_row("SELECT count(*) FROM lake_snapshots", [], |row| row.get(0))?;

        let mut stmt = self.conn.prepare(
            "SELECT p.layer, p.table_name, p.produced_by, p.row_count, p.column_count, \
                    (SELECT max(s.committed_at) FROM lake_snapshots s \
                      WHERE s.layer = p.layer AND s.table_name = p.table_name) \
             FROM lake_provenance p ORDER BY p.layer, p.table_name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut tables = Vec::new();
        for row in rows {
            let (layer, table_name, produced_by, row_count, column_count, last_snapshot) = row?;
            let layer: Layer = layer
                .parse()
                .map_err(|_| CatalogError::Malformed(format!("provenance layer '{layer}'")))?;
            #[allow(clippy::cast_sign_loss)]
            tables.push(TableStats {
                table: TableRef::new(layer, table_name),
                produced_by,
                row_count: row_count as u64,
                column_count: column_count as u64,
                last_snapshot,
            });
        }

        #[allow(clippy::cast_sign_loss)]
        let snapshot_count = snapshot_count as u64;
        Ok(CatalogStats {
            snapshot_count,
            tables,
        })
    }

    // -----------------------------------------------------------------

    fn with_txn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN TRANSACTION;")?;
        match f(&self.conn) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK;") {
                    tracing::warn!(error = %rollback_err, "Rollback after failed commit also failed");
                }
                Err(err)
            }
        }
    }
}

impl Drop for CatalogSession {
    fn drop(&mut self) {
        self.release();
    }
}

// ---------------------------------------------------------------------
// Free helpers
// ---------------------------------------------------------------------

fn is_attached(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM duckdb_databases() WHERE database_name = ?",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn attach_or_create(conn: &Connection, config: &CatalogConfig) -> Result<()> {
    let attach_sql = format!(
        "ATTACH '{}' AS {};",
        escape_literal(&config.catalog_path.to_string_lossy()),
        config.catalog_name
    );

    match conn.execute_batch(&attach_sql) {
        Ok(()) => Ok(()),
        Err(err) => {
            // Only a missing data directory counts as "does not exist yet";
            // a locked or corrupt catalog must surface, not be recreated.
            let missing_dir = config
                .catalog_path
                .parent()
                .is_some_and(|dir| !dir.as_os_str().is_empty() && !dir.exists());
            if !missing_dir {
                return Err(CatalogError::Attach {
                    message: err.to_string(),
                });
            }
            if let Some(dir) = config.catalog_path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            conn.execute_batch(&attach_sql)
                .map_err(|retry_err| CatalogError::Attach {
                    message: retry_err.to_string(),
                })?;
            tracing::info!(
                path = %config.catalog_path.display(),
                "Created new catalog"
            );
            Ok(())
        }
    }
}

/// Append a snapshot record and overwrite provenance for `table`.
/// Must run inside the same transaction as the table replacement.
fn record_materialization(
    conn: &Connection,
    table: &TableRef,
    prov: &ProvenanceInput,
    row_count: u64,
    columns: &[String],
) -> Result<TableMetadata> {
    let recorded_at = format_timestamp(&Utc::now());

    conn.execute(
        "INSERT INTO lake_snapshots \
         SELECT coalesce(max(snapshot_id), 0) + 1, ?, ?, ? FROM lake_snapshots",
        params![recorded_at, table.layer.as_str(), table.name],
    )?;

    let columns_json = serde_json::to_string(columns).unwrap_or_else(|_| "[]".into());
    let depends_on_json = if prov.depends_on.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&prov.depends_on).unwrap_or_else(|_| "[]".into()))
    };

    #[allow(clippy::cast_possible_wrap)]
    conn.execute(
        "INSERT OR REPLACE INTO lake_provenance \
         (layer, table_name, produced_by, recorded_at, row_count, column_count, \
          columns, description, depends_on, source_table, source_query) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            table.layer.as_str(),
            table.name,
            prov.produced_by,
            recorded_at,
            row_count as i64,
            columns.len() as i64,
            columns_json,
            prov.description,
            depends_on_json,
            prov.source_table,
            prov.source_query,
        ],
    )?;

    Ok(TableMetadata {
        table: table.clone(),
        produced_by: prov.produced_by.clone(),
        recorded_at,
        row_count,
        column_count: columns.len() as u64,
        columns: columns.to_vec(),
        description: prov.description.clone(),
        depends_on: prov.depends_on.clone(),
        source_table: prov.source_table.clone(),
        source_query: prov.source_query.clone(),
    })
}

fn list_columns(conn: &Connection, table: &TableRef) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_catalog = current_database() \
           AND table_schema = ? AND table_name = ? ORDER BY ordinal_position",
    )?;
    let rows = stmt.query_map(params![table.layer.as_str(), table.name], |row| {
        row.get::<_, String>(0)
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// DDL type for one column, from the first non-null value in that column.
/// All-null columns default to VARCHAR.
fn column_ddl_type(rows: &[Vec<SourceValue>], idx: usize) -> &'static str {
    for row in rows {
        match row.get(idx) {
            Some(SourceValue::Bool(_)) => return "BOOLEAN",
            Some(SourceValue::Int(_)) => return "BIGINT",
            Some(SourceValue::Float(_)) => return "DOUBLE",
            Some(SourceValue::Text(_)) => return "VARCHAR",
            Some(SourceValue::Null) | None => {}
        }
    }
    "VARCHAR"
}

fn sql_value(value: &SourceValue) -> Value {
    match value {
        SourceValue::Null => Value::Null,
        SourceValue::Bool(b) => Value::Boolean(*b),
        SourceValue::Int(i) => Value::BigInt(*i),
        SourceValue::Float(f) => Value::Double(*f),
        SourceValue::Text(s) => Value::Text(s.clone()),
    }
}

fn escape_literal(raw: &str) -> String {
    raw.replace('\'', "''")
}

/// Decode a stored JSON string array; malformed bookkeeping decodes empty
/// rather than failing a read path.
fn decode_json_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FMT).to_string()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FMT)
        .ok()
        .map(|naive| naive.and_utc())
}
