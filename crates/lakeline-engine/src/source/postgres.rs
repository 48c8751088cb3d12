//! Synchronous Postgres source client.

use std::time::Duration;

use postgres::types::Type;
use postgres::{Client, Column, NoTls, Row};

use lakeline_types::{ResultSet, SourceValue};

use crate::config::types::ConnectionConfig;
use crate::source::{SourceConnector, SourceError};

/// Postgres-backed [`SourceConnector`].
pub struct PostgresConnector {
    client: Client,
}

impl PostgresConnector {
    /// Connect using an already-resolved connection descriptor.
    ///
    /// `server` is `host` or `host:port`. With `trusted_connection` and no
    /// explicit username, the OS user name is used.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Connect`] when the session cannot be
    /// established.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, SourceError> {
        let (host, port) = split_server(&config.server);

        let mut pg = postgres::Config::new();
        pg.host(host);
        if let Some(port) = port {
            pg.port(port);
        }
        pg.dbname(&config.database);
        if let Some(username) = &config.username {
            pg.user(username);
        } else if config.trusted_connection {
            if let Ok(os_user) = std::env::var("USER") {
                pg.user(&os_user);
            }
        }
        if let Some(password) = &config.password {
            pg.password(password);
        }
        if let Some(secs) = config.connect_timeout_secs {
            pg.connect_timeout(Duration::from_secs(secs));
        }

        let client = pg
            .connect(NoTls)
            .map_err(|e| SourceError::Connect(e.to_string()))?;
        tracing::debug!(server = %config.server, database = %config.database, "Source connected");
        Ok(Self { client })
    }
}

impl SourceConnector for PostgresConnector {
    fn fetch(&mut self, query: &str) -> Result<ResultSet, SourceError> {
        let stmt = self
            .client
            .prepare(query)
            .map_err(|e| SourceError::Query(e.to_string()))?;
        let columns: Vec<String> = stmt
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = self
            .client
            .query(&stmt, &[])
            .map_err(|e| SourceError::Query(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut values = Vec::with_capacity(columns.len());
            for (idx, column) in stmt.columns().iter().enumerate() {
                values.push(map_value(row, idx, column)?);
            }
            out.push(values);
        }

        Ok(ResultSet { columns, rows: out })
    }
}

/// Split `host` / `host:port`; a non-numeric port falls back to the host
/// string as given so the driver reports it.
fn split_server(server: &str) -> (&str, Option<u16>) {
    match server.rsplit_once(':') {
        Some((host, port)) => match port.parse::<u16>() {
            Ok(port) => (host, Some(port)),
            Err(_) => (server, None),
        },
        None => (server, None),
    }
}

fn map_value(row: &Row, idx: usize, column: &Column) -> Result<SourceValue, SourceError> {
    let ty = column.type_();

    let mapped: Result<Option<SourceValue>, postgres::Error> = if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(idx)
            .map(|v| v.map(SourceValue::Bool))
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)
            .map(|v| v.map(|n| SourceValue::Int(n.into())))
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)
            .map(|v| v.map(|n| SourceValue::Int(n.into())))
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(idx)
            .map(|v| v.map(SourceValue::Int))
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx)
            .map(|v| v.map(|n| SourceValue::Float(n.into())))
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx)
            .map(|v| v.map(SourceValue::Float))
    } else if *ty == Type::TIMESTAMP {
        row.try_get::<_, Option<chrono::NaiveDateTime>>(idx)
            .map(|v| v.map(|t| SourceValue::Text(t.to_string())))
    } else if *ty == Type::TIMESTAMPTZ {
        row.try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)
            .map(|v| v.map(|t| SourceValue::Text(t.to_rfc3339())))
    } else if *ty == Type::DATE {
        row.try_get::<_, Option<chrono::NaiveDate>>(idx)
            .map(|v| v.map(|d| SourceValue::Text(d.to_string())))
    } else {
        // Text-ish types; anything the driver cannot read as text is
        // surfaced below rather than silently dropped.
        row.try_get::<_, Option<String>>(idx)
            .map(|v| v.map(SourceValue::Text))
    };

    match mapped {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Ok(SourceValue::Null),
        Err(err) => Err(SourceError::Query(format!(
            "column '{}' of type {ty}: {err}",
            column.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_with_port_splits() {
        assert_eq!(split_server("db.internal:5433"), ("db.internal", Some(5433)));
    }

    #[test]
    fn server_without_port_passes_through() {
        assert_eq!(split_server("localhost"), ("localhost", None));
    }

    #[test]
    fn non_numeric_port_is_left_to_the_driver() {
        assert_eq!(split_server("localhost:socket"), ("localhost:socket", None));
    }
}
