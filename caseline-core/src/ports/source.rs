// caseline-core/src/ports/source.rs

use crate::error::CaselineError;
use async_trait::async_trait;
use bytes::Bytes;

/// Result of a single readiness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokeOutcome {
    Ready,
    NotReady { reason: String },
}

/// The upstream line-list API.
#[async_trait]
pub trait CaseSource: Send + Sync {
    /// One GET against the endpoint. Only reachability matters; the body is
    /// ignored. Transport failures are reported as `NotReady`.
    async fn poke(&self) -> PokeOutcome;

    /// Full snapshot body. Non-2xx statuses are errors.
    async fn fetch(&self) -> Result<Bytes, CaselineError>;

    fn endpoint(&self) -> String;
}
