// caseline-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// Imports Hexagonaux
use crate::domain::warehouse::Dialect;
use crate::error::CaselineError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::Connector;

/// Column description returned by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CaselineError> {
        self.conn.lock().map_err(|_| {
            CaselineError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                "DuckDB Mutex Poisoned",
            )))
        })
    }

    /// First column of the first row, as an integer (`SELECT COUNT(*) ...`).
    pub fn query_scalar(&self, query: &str) -> Result<i64, CaselineError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let row = rows
            .next()
            .map_err(db_err)?
            .ok_or_else(|| CaselineError::InternalError("No scalar value returned".into()))?;

        row.get::<_, i64>(0).map_err(db_err)
    }

    pub fn fetch_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnSchema>, CaselineError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info('{}.{}')", schema, table))
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ColumnSchema {
                    name: row.get("name")?,
                    data_type: row.get("type")?,
                    is_nullable: !row.get::<_, bool>("notnull")?,
                })
            })
            .map_err(db_err)?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row.map_err(db_err)?);
        }
        Ok(columns)
    }

    /// Rows rendered as strings, for display. NULL becomes an empty cell.
    pub fn fetch_rows(&self, query: &str) -> Result<Vec<Vec<String>>, CaselineError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(db_err)? {
            let width = row.as_ref().column_count();
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                let value: duckdb::types::Value = row.get(i).map_err(db_err)?;
                cells.push(display_value(value));
            }
            out.push(cells);
        }
        Ok(out)
    }
}

fn db_err(e: duckdb::Error) -> CaselineError {
    CaselineError::Infrastructure(InfrastructureError::Database(DatabaseError::DuckDB(e)))
}

fn display_value(value: duckdb::types::Value) -> String {
    use duckdb::types::Value;
    match value {
        Value::Null => String::new(),
        Value::Boolean(b) => b.to_string(),
        Value::TinyInt(v) => v.to_string(),
        Value::SmallInt(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::BigInt(v) => v.to_string(),
        Value::HugeInt(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Text(s) => s,
        other => format!("{:?}", other),
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), CaselineError> {
        let conn = self.lock()?;
        // execute_batch accepte aussi les statements sans résultat (COPY, SECRET)
        conn.execute_batch(query).map_err(db_err)
    }

    fn dialect(&self) -> Dialect {
        Dialect::DuckDB
    }

    fn engine_name(&self) -> &str {
        "DuckDB"
    }
}
