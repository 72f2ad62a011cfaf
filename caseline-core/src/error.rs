// caseline-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaselineError {
    // --- ERREURS DU DOMAINE (Payload, Validation, Graphe) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (Réseau, Stockage, Warehouse, Config) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

impl CaselineError {
    /// Only transient infrastructure failures are replayed by the orchestrator.
    /// Domain errors reproduce identically on every attempt.
    pub fn is_retriable(&self) -> bool {
        match self {
            CaselineError::Infrastructure(e) => e.is_retriable(),
            CaselineError::Domain(_)
            | CaselineError::InternalError(_)
            | CaselineError::UnsafePath(_) => false,
        }
    }
}

impl From<std::io::Error> for CaselineError {
    fn from(err: std::io::Error) -> Self {
        CaselineError::Infrastructure(InfrastructureError::Io(err))
    }
}
