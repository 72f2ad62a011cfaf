// caseline-core/src/domain/artifact.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where the run's CSV artifact was published. Produced by the publish
/// task and handed, as-is, to the stage task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum ArtifactLocation {
    S3 { bucket: String, key: String },
    File { path: PathBuf },
    Memory { key: String },
}

impl ArtifactLocation {
    pub fn uri(&self) -> String {
        match self {
            ArtifactLocation::S3 { bucket, key } => format!("s3://{}/{}", bucket, key),
            ArtifactLocation::File { path } => format!("file://{}", path.display()),
            ArtifactLocation::Memory { key } => format!("memory://{}", key),
        }
    }

    /// Path a local engine can read directly (DuckDB `COPY ... FROM`).
    pub fn readable_path(&self) -> String {
        match self {
            ArtifactLocation::File { path } => path.display().to_string(),
            other => other.uri(),
        }
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}
