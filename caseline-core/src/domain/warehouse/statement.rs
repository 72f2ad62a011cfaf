// caseline-core/src/domain/warehouse/statement.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::artifact::ArtifactLocation;

/// SQL flavour of the destination warehouse.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Snowflake,
    DuckDB,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Snowflake => f.write_str("snowflake"),
            Dialect::DuckDB => f.write_str("duckdb"),
        }
    }
}

/// Named warehouse objects the pipeline owns. Names are plain identifiers
/// (validated at config load), rendered unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseTarget {
    pub database: String,
    pub schema: String,
    pub table: String,
    pub stage: String,
    pub file_format: String,
}

/// Storage credentials embedded in the stage definition.
#[derive(Clone, PartialEq, Eq)]
pub struct StageCredentials {
    pub key_id: String,
    pub secret: String,
    pub region: Option<String>,
}

impl StageCredentials {
    pub fn redacted(&self) -> Self {
        Self {
            key_id: "****".into(),
            secret: "****".into(),
            region: self.region.clone(),
        }
    }
}

impl fmt::Debug for StageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageCredentials")
            .field("key_id", &"****")
            .field("secret", &"****")
            .field("region", &self.region)
            .finish()
    }
}

/// CSV parsing descriptor used by the bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFileFormat {
    pub field_delimiter: char,
    /// Escaped form, as written inside a SQL literal.
    pub record_delimiter: &'static str,
    pub skip_header: u32,
    pub trim_space: bool,
    pub enclosed_by: char,
}

impl Default for CsvFileFormat {
    fn default() -> Self {
        Self {
            field_delimiter: ',',
            record_delimiter: "\\n",
            skip_header: 1,
            trim_space: false,
            enclosed_by: '"',
        }
    }
}

/// One warehouse operation of the pipeline, independent of dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum WarehouseStatement {
    CreateDatabase,
    CreateSchema,
    CreateTable,
    CreateStage {
        location: ArtifactLocation,
        credentials: Option<StageCredentials>,
    },
    CreateFileFormat,
    CopyInto {
        location: ArtifactLocation,
    },
}

impl WarehouseStatement {
    pub fn redacted(&self) -> Self {
        match self {
            WarehouseStatement::CreateStage {
                location,
                credentials,
            } => WarehouseStatement::CreateStage {
                location: location.clone(),
                credentials: credentials.as_ref().map(StageCredentials::redacted),
            },
            other => other.clone(),
        }
    }
}
