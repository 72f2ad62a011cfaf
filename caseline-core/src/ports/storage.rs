// caseline-core/src/ports/storage.rs

use crate::domain::artifact::ArtifactLocation;
use crate::error::CaselineError;
use async_trait::async_trait;
use bytes::Bytes;

/// Single-slot artifact storage. `put` replaces the object at `key` in one
/// operation; readers never observe a partially written object.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes) -> Result<ArtifactLocation, CaselineError>;

    /// Location `key` would be published at, without touching storage.
    fn location(&self, key: &str) -> ArtifactLocation;
}
