// caseline-core/src/domain/warehouse/compiler.rs

// Turns dialect-free warehouse statements into SQL text.
// Object names are trusted identifiers; column names and literals go
// through sqlparser's quoting so embedded quotes are escaped.

use sqlparser::ast::{Ident, Value};

use crate::domain::artifact::ArtifactLocation;
use crate::domain::record::schema::{ColumnType, FIELD_MAPPINGS};
use crate::domain::warehouse::statement::{
    CsvFileFormat, Dialect, StageCredentials, WarehouseStatement, WarehouseTarget,
};

pub struct StatementCompiler {
    dialect: Dialect,
    target: WarehouseTarget,
    format: CsvFileFormat,
}

impl StatementCompiler {
    pub fn new(dialect: Dialect, target: WarehouseTarget) -> Self {
        Self {
            dialect,
            target,
            format: CsvFileFormat::default(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn target(&self) -> &WarehouseTarget {
        &self.target
    }

    /// `None` when the dialect has no equivalent object (DuckDB has no
    /// databases or named file formats).
    pub fn render(&self, statement: &WarehouseStatement) -> Option<String> {
        match self.dialect {
            Dialect::Snowflake => Some(self.render_snowflake(statement)),
            Dialect::DuckDB => self.render_duckdb(statement),
        }
    }

    // --- SNOWFLAKE ---

    fn render_snowflake(&self, statement: &WarehouseStatement) -> String {
        let t = &self.target;
        let ns = format!("{}.{}", t.database, t.schema);

        match statement {
            WarehouseStatement::CreateDatabase => {
                format!("CREATE DATABASE IF NOT EXISTS {}", t.database)
            }
            WarehouseStatement::CreateSchema => format!("CREATE SCHEMA IF NOT EXISTS {}", ns),
            WarehouseStatement::CreateTable => format!(
                "CREATE TABLE IF NOT EXISTS {}.{} ({})",
                ns,
                t.table,
                self.column_list()
            ),
            WarehouseStatement::CreateStage {
                location,
                credentials,
            } => {
                let mut sql = format!(
                    "CREATE OR REPLACE STAGE {}.{} URL = {}",
                    ns,
                    t.stage,
                    literal(&location.uri())
                );
                if let Some(c) = credentials {
                    sql.push_str(&format!(
                        " CREDENTIALS = (AWS_KEY_ID = {} AWS_SECRET_KEY = {})",
                        literal(&c.key_id),
                        literal(&c.secret)
                    ));
                }
                sql
            }
            WarehouseStatement::CreateFileFormat => {
                let f = &self.format;
                format!(
                    "CREATE OR REPLACE FILE FORMAT {}.{} TYPE = 'CSV' COMPRESSION = 'AUTO' \
                     FIELD_DELIMITER = {} RECORD_DELIMITER = '{}' SKIP_HEADER = {} \
                     TRIM_SPACE = {} FIELD_OPTIONALLY_ENCLOSED_BY = {}",
                    ns,
                    t.file_format,
                    literal(&f.field_delimiter.to_string()),
                    f.record_delimiter,
                    f.skip_header,
                    if f.trim_space { "TRUE" } else { "FALSE" },
                    literal(&f.enclosed_by.to_string()),
                )
            }
            WarehouseStatement::CopyInto { .. } => format!(
                "COPY INTO {ns}.{} FROM @{ns}.{} FILE_FORMAT = (FORMAT_NAME = '{ns}.{}')",
                t.table, t.stage, t.file_format
            ),
        }
    }

    // --- DUCKDB ---

    fn render_duckdb(&self, statement: &WarehouseStatement) -> Option<String> {
        let t = &self.target;

        match statement {
            // The opened database file is the catalog
            WarehouseStatement::CreateDatabase => None,
            WarehouseStatement::CreateSchema => {
                Some(format!("CREATE SCHEMA IF NOT EXISTS {}", t.schema))
            }
            WarehouseStatement::CreateTable => Some(format!(
                "CREATE TABLE IF NOT EXISTS {}.{} ({})",
                t.schema,
                t.table,
                self.column_list()
            )),
            WarehouseStatement::CreateStage {
                location: ArtifactLocation::S3 { .. },
                credentials: Some(c),
            } => Some(self.duckdb_secret(statement, c)),
            // Local files and public buckets need no secret
            WarehouseStatement::CreateStage { .. } => None,
            // Format options are inlined in COPY
            WarehouseStatement::CreateFileFormat => None,
            WarehouseStatement::CopyInto { location } => {
                let f = &self.format;
                Some(format!(
                    "COPY {}.{} FROM {} (FORMAT CSV, DELIMITER {}, HEADER {}, QUOTE {})",
                    t.schema,
                    t.table,
                    literal(&location.readable_path()),
                    literal(&f.field_delimiter.to_string()),
                    f.skip_header > 0,
                    literal(&f.enclosed_by.to_string()),
                ))
            }
        }
    }

    fn duckdb_secret(&self, statement: &WarehouseStatement, c: &StageCredentials) -> String {
        let scope = match statement {
            WarehouseStatement::CreateStage { location, .. } => location.uri(),
            _ => String::new(),
        };
        let region = c
            .region
            .as_deref()
            .map(|r| format!(", REGION {}", literal(r)))
            .unwrap_or_default();
        format!(
            "CREATE OR REPLACE SECRET {} (TYPE S3, KEY_ID {}, SECRET {}{}, SCOPE {})",
            self.target.stage,
            literal(&c.key_id),
            literal(&c.secret),
            region,
            literal(&scope)
        )
    }

    fn column_list(&self) -> String {
        FIELD_MAPPINGS
            .iter()
            .map(|m| {
                format!(
                    "{} {}",
                    Ident::with_quote('"', m.target),
                    self.type_name(m.column_type)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn type_name(&self, column_type: ColumnType) -> &'static str {
        match (self.dialect, column_type) {
            (Dialect::Snowflake, ColumnType::Integer) => "INT",
            (Dialect::DuckDB, ColumnType::Integer) => "INTEGER",
            (_, ColumnType::Text) => "VARCHAR",
            (Dialect::Snowflake, ColumnType::DateTime) => "DATETIME",
            (Dialect::DuckDB, ColumnType::DateTime) => "TIMESTAMP",
        }
    }
}

fn literal(value: &str) -> String {
    Value::SingleQuotedString(value.to_string()).to_string()
}
