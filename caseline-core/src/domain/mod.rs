// caseline-core/src/domain/mod.rs

pub mod artifact;
pub mod error;
pub mod graph;
pub mod record;
pub mod retry;
pub mod warehouse;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use artifact::ArtifactLocation;
pub use error::DomainError;
pub use retry::RetryPolicy;
