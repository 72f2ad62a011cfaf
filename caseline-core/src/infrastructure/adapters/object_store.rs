// caseline-core/src/infrastructure/adapters/object_store.rs

// Artifact storage over the `object_store` crate: S3 for real runs, a local
// directory for development, memory for tests. Every backend replaces the
// object in a single put (LocalFileSystem writes a temp file and renames).

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::artifact::ArtifactLocation;
use crate::domain::warehouse::StageCredentials;
use crate::error::CaselineError;
use crate::infrastructure::config::{StorageBackend, StorageConfig};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::storage::ArtifactStore;

#[derive(Debug, Clone)]
enum Backend {
    S3 { bucket: String },
    Local { root: PathBuf },
    Memory,
}

pub struct ObjectStoreArtifacts {
    store: Arc<dyn ObjectStore>,
    backend: Backend,
}

impl ObjectStoreArtifacts {
    pub fn from_config(
        config: &StorageConfig,
        project_dir: &Path,
        credentials: Option<&StageCredentials>,
    ) -> Result<Self, InfrastructureError> {
        match config.backend {
            StorageBackend::S3 => Self::s3(config, credentials),
            StorageBackend::Local => Self::local(&project_dir.join(&config.local_root)),
            StorageBackend::Memory => Ok(Self::memory()),
        }
    }

    /// Where `from_config` would publish, without building a client or
    /// touching the filesystem. Local paths are not canonicalized.
    pub fn planned_location(config: &StorageConfig, project_dir: &Path) -> ArtifactLocation {
        match config.backend {
            StorageBackend::S3 => ArtifactLocation::S3 {
                bucket: config.bucket.clone(),
                key: config.key.clone(),
            },
            StorageBackend::Local => ArtifactLocation::File {
                path: project_dir.join(&config.local_root).join(&config.key),
            },
            StorageBackend::Memory => ArtifactLocation::Memory {
                key: config.key.clone(),
            },
        }
    }

    pub fn s3(
        config: &StorageConfig,
        credentials: Option<&StageCredentials>,
    ) -> Result<Self, InfrastructureError> {
        // from_env: reprend la chaîne AWS standard si aucun secret explicite
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(&config.bucket);
        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }
        if let Some(c) = credentials {
            builder = builder
                .with_access_key_id(&c.key_id)
                .with_secret_access_key(&c.secret);
        }

        Ok(Self {
            store: Arc::new(builder.build()?),
            backend: Backend::S3 {
                bucket: config.bucket.clone(),
            },
        })
    }

    pub fn local(root: &Path) -> Result<Self, InfrastructureError> {
        std::fs::create_dir_all(root)?;
        let root = std::fs::canonicalize(root)?;
        Ok(Self {
            store: Arc::new(LocalFileSystem::new_with_prefix(&root)?),
            backend: Backend::Local { root },
        })
    }

    pub fn memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            backend: Backend::Memory,
        }
    }

    /// Current content of `key`.
    pub async fn read(&self, key: &str) -> Result<Bytes, CaselineError> {
        let path = ObjectPath::parse(key)
            .map_err(object_store::Error::from)
            .map_err(InfrastructureError::from)?;
        let result = self
            .store
            .get(&path)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(result.bytes().await.map_err(InfrastructureError::from)?)
    }
}

#[async_trait]
impl ArtifactStore for ObjectStoreArtifacts {
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    async fn put(&self, key: &str, body: Bytes) -> Result<ArtifactLocation, CaselineError> {
        let path = ObjectPath::parse(key)
            .map_err(object_store::Error::from)
            .map_err(InfrastructureError::from)?;

        self.store
            .put(&path, PutPayload::from(body))
            .await
            .map_err(InfrastructureError::from)?;

        let location = self.location(key);
        info!(location = %location, "Artifact published");
        Ok(location)
    }

    fn location(&self, key: &str) -> ArtifactLocation {
        match &self.backend {
            Backend::S3 { bucket } => ArtifactLocation::S3 {
                bucket: bucket.clone(),
                key: key.to_string(),
            },
            Backend::Local { root } => ArtifactLocation::File {
                path: root.join(key),
            },
            Backend::Memory => ArtifactLocation::Memory {
                key: key.to_string(),
            },
        }
    }
}
