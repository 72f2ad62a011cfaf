// caseline-core/src/application/clean.rs

use crate::error::CaselineError;
use crate::infrastructure::config::project::load_pipeline_config;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::LOCK_FILE;
use std::fs;
use std::path::Path;

/// Removes the target directory (run results, local bucket, lock).
/// Refuses while a run holds the lock.
pub fn clean_project(project_dir: &Path) -> Result<(), CaselineError> {
    tracing::info!("🧹 Initializing caseline cleanup sequence...");

    let config = load_pipeline_config(project_dir)?;
    let full_path = project_dir.join(&config.target_path);

    // Zero-Trust Path Traversal Guard
    let root = fs::canonicalize(project_dir)?;
    if full_path.exists() {
        let resolved = fs::canonicalize(&full_path)?;
        if !resolved.starts_with(&root) || resolved == root {
            return Err(CaselineError::UnsafePath(config.target_path));
        }
        if resolved.join(LOCK_FILE).exists() {
            return Err(InfrastructureError::RunInProgress(
                resolved.join(LOCK_FILE).display().to_string(),
            )
            .into());
        }

        if resolved.is_dir() {
            fs::remove_dir_all(&resolved)?;
        } else {
            fs::remove_file(&resolved)?;
        }
        println!("   🗑️  Artifact removed: {}", config.target_path);
    }

    Ok(())
}
