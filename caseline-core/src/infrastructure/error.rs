// caseline-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(caseline::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Snowflake statement failed [{code}]: {message}")]
    #[diagnostic(
        code(caseline::infra::database::snowflake),
        help("Check warehouse permissions and the rendered statement (`caseline plan`).")
    )]
    Snowflake {
        code: String,
        message: String,
        retriable: bool,
    },
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- HTTP (source API, webhooks, SQL API) ---
    #[error("HTTP request failed: {0}")]
    #[diagnostic(
        code(caseline::infra::http),
        help("Check network connectivity and the configured base URL.")
    )]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    #[diagnostic(code(caseline::infra::http_status))]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Source API at {url} not ready after {pokes} pokes ({elapsed_secs}s)")]
    #[diagnostic(
        code(caseline::infra::probe_exhausted),
        help("The readiness probe ran out of pokes or hit its deadline.")
    )]
    ProbeExhausted {
        url: String,
        pokes: u32,
        elapsed_secs: u64,
    },

    // --- OBJECT STORAGE ---
    #[error("Object Storage Error: {0}")]
    #[diagnostic(
        code(caseline::infra::storage),
        help("Check bucket name, region and credentials.")
    )]
    Storage(#[from] object_store::Error),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(caseline::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("Run lock held at '{0}': another run is in progress")]
    #[diagnostic(
        code(caseline::infra::run_in_progress),
        help("Wait for the other run to finish, or remove the stale lock file.")
    )]
    RunInProgress(String),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(caseline::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(caseline::infra::config_invalid))]
    ConfigInvalid(#[from] validator::ValidationErrors),

    #[error("Pipeline configuration not found: {0}")]
    #[diagnostic(code(caseline::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Missing secret: environment variable {0} is not set")]
    #[diagnostic(code(caseline::infra::secret_missing))]
    MissingSecret(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(caseline::infra::template),
        help("Check the Jinja syntax ({{ ... }}) of the notification message.")
    )]
    TemplateError(#[from] minijinja::Error),
}

impl InfrastructureError {
    /// Transient failures worth replaying: network, storage, warehouse engine,
    /// probe exhaustion. Configuration and client-side HTTP errors are terminal.
    pub fn is_retriable(&self) -> bool {
        match self {
            InfrastructureError::Database(DatabaseError::DuckDB(_)) => true,
            InfrastructureError::Database(DatabaseError::Snowflake { retriable, .. }) => {
                *retriable
            }
            InfrastructureError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(|s| is_retriable_status(s.as_u16()))
            }
            InfrastructureError::HttpStatus { status, .. } => is_retriable_status(*status),
            InfrastructureError::ProbeExhausted { .. } => true,
            InfrastructureError::Storage(e) => !matches!(
                e,
                object_store::Error::NotImplemented
                    | object_store::Error::InvalidPath { .. }
                    | object_store::Error::UnknownConfigurationKey { .. }
                    | object_store::Error::PermissionDenied { .. }
                    | object_store::Error::Unauthenticated { .. }
            ),
            InfrastructureError::Io(_) => true,
            InfrastructureError::RunInProgress(_)
            | InfrastructureError::YamlError(_)
            | InfrastructureError::ConfigError(_)
            | InfrastructureError::ConfigInvalid(_)
            | InfrastructureError::ConfigNotFound(_)
            | InfrastructureError::MissingSecret(_)
            | InfrastructureError::TemplateError(_) => false,
        }
    }
}

pub(crate) fn is_retriable_status(status: u16) -> bool {
    status == 408 || status == 429 || status >= 500
}

// Shortcut for `?` on duckdb calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
