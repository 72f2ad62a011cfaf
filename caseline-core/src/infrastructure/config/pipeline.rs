// caseline-core/src/infrastructure/config/pipeline.rs

use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::domain::retry::RetryPolicy;
use crate::domain::warehouse::{Dialect, WarehouseTarget};

#[allow(clippy::expect_used)]
static RE_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]{0,254}$").expect("identifier pattern is a valid literal")
});

/// Object names are spliced unquoted into DDL, so only plain identifiers pass.
fn validate_identifier(value: &str) -> Result<(), ValidationError> {
    if RE_IDENTIFIER.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("sql_identifier");
        err.message = Some(format!("'{}' is not a plain SQL identifier", value).into());
        Err(err)
    }
}

fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("http_url"))
    }
}

fn validate_endpoint(value: &str) -> Result<(), ValidationError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("endpoint_must_start_with_slash"))
    }
}

fn validate_timezone(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Tz>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("unknown_timezone"))
}

// --- ROOT ---

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct PipelineConfig {
    #[validate(length(min = 1, message = "Pipeline name cannot be empty"))]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[validate(nested)]
    pub source: SourceConfig,

    #[validate(nested)]
    pub storage: StorageConfig,

    #[validate(nested)]
    pub warehouse: WarehouseConfig,

    #[validate(nested)]
    #[serde(default)]
    pub notification: NotificationConfig,

    #[validate(nested)]
    #[serde(default)]
    pub retry: RetryConfig,
}

// --- SOURCE ---

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct SourceConfig {
    #[validate(custom(function = "validate_http_url"))]
    pub base_url: String,

    #[validate(custom(function = "validate_endpoint"))]
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_poke_interval")]
    pub poke_interval_secs: u64,

    #[validate(range(min = 1))]
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Hard cap on pokes, on top of the deadline.
    #[validate(range(min = 1))]
    #[serde(default)]
    pub max_pokes: Option<u32>,

    #[validate(range(min = 1, max = 600))]
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub strict_fields: bool,
}

impl SourceConfig {
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint)
    }
}

// --- STORAGE ---

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    Local,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    #[validate(length(min = 3, max = 63, message = "Bucket names are 3 to 63 characters"))]
    pub bucket: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_object_key")]
    pub key: String,

    #[serde(default)]
    pub region: Option<String>,

    /// S3-compatible endpoint override (MinIO, LocalStack).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Root directory of the `local` backend, relative to the project.
    #[serde(default = "default_local_root")]
    pub local_root: String,
}

// --- WAREHOUSE ---

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct WarehouseConfig {
    #[serde(default)]
    pub engine: Dialect,

    #[validate(custom(function = "validate_identifier"))]
    pub database: String,

    #[validate(custom(function = "validate_identifier"))]
    pub schema: String,

    #[validate(custom(function = "validate_identifier"))]
    pub table: String,

    #[validate(custom(function = "validate_identifier"))]
    #[serde(default = "default_stage")]
    pub stage: String,

    #[validate(custom(function = "validate_identifier"))]
    #[serde(default = "default_file_format")]
    pub file_format: String,

    #[serde(default = "default_duckdb_path")]
    pub duckdb_path: String,

    #[serde(default)]
    pub snowflake: Option<SnowflakeConfig>,
}

impl WarehouseConfig {
    pub fn target(&self) -> WarehouseTarget {
        WarehouseTarget {
            database: self.database.clone(),
            schema: self.schema.clone(),
            table: self.table.clone(),
            stage: self.stage.clone(),
            file_format: self.file_format.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct SnowflakeConfig {
    /// Account locator, e.g. `xy12345.ap-southeast-1`.
    #[validate(length(min = 1))]
    pub account: String,

    #[serde(default)]
    pub warehouse: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    #[validate(range(min = 1, max = 3600))]
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_secs: u64,
}

impl SnowflakeConfig {
    /// Account host. Status URLs returned by the API are relative to it.
    pub fn base_url(&self) -> String {
        format!("https://{}.snowflakecomputing.com", self.account)
    }

    pub fn api_url(&self) -> String {
        format!("{}/api/v2/statements", self.base_url())
    }
}

// --- NOTIFICATION ---

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[validate(length(min = 1))]
    #[serde(default = "default_channel")]
    pub channel: String,

    #[validate(length(min = 1))]
    #[serde(default = "default_message")]
    pub message: String,

    #[validate(custom(function = "validate_timezone"))]
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel: default_channel(),
            message: default_message(),
            timezone: default_timezone(),
        }
    }
}

impl NotificationConfig {
    /// Falls back to UTC if the zone somehow escaped validation.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }
}

// --- RETRY ---

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct RetryConfig {
    #[validate(range(max = 10))]
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[validate(range(max = 3600))]
    #[serde(default = "default_retry_delay")]
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            delay_secs: default_retry_delay(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            delay: Duration::from_secs(self.delay_secs),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_endpoint() -> String {
    "/api/Cases/today-cases-line-lists".to_string()
}
fn default_poke_interval() -> u64 {
    60
}
fn default_probe_timeout() -> u64 {
    7 * 24 * 60 * 60
}
fn default_request_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_object_key() -> String {
    "weekly_covid_patient_information.csv".to_string()
}
fn default_local_root() -> String {
    "target/bucket".to_string()
}
fn default_stage() -> String {
    "s3_stage".to_string()
}
fn default_file_format() -> String {
    "csv_format".to_string()
}
fn default_duckdb_path() -> String {
    "caseline.duckdb".to_string()
}
fn default_token_type() -> String {
    "KEYPAIR_JWT".to_string()
}
fn default_statement_timeout() -> u64 {
    60
}
fn default_channel() -> String {
    "#weekly-covid-patient-information".to_string()
}
fn default_message() -> String {
    "Loaded data into {{ engine }} successfully on {{ started_at }}".to_string()
}
fn default_timezone() -> String {
    "Asia/Bangkok".to_string()
}
fn default_retries() -> u32 {
    2
}
fn default_retry_delay() -> u64 {
    60
}
