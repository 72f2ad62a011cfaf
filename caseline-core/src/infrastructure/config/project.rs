// caseline-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::warehouse::Dialect;
use crate::infrastructure::config::pipeline::{PipelineConfig, StorageBackend};
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["caseline.yaml", "caseline_project_conf.yaml"];

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_pipeline_config(project_dir: &Path) -> Result<PipelineConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading pipeline manifest");

    // 2. Chargement YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config = parse_pipeline_config(&content)?;

    // 3. Override via variables d'environnement (layering)
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    // 4. Validation après override: un override invalide doit échouer aussi
    check_config(&config)?;

    Ok(config)
}

pub fn parse_pipeline_config(content: &str) -> Result<PipelineConfig, InfrastructureError> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// Field validation plus the cross-field rules `validator` cannot express.
pub fn check_config(config: &PipelineConfig) -> Result<(), InfrastructureError> {
    config.validate()?;

    if config.warehouse.engine == Dialect::Snowflake && config.warehouse.snowflake.is_none() {
        return Err(InfrastructureError::ConfigError(
            "warehouse.engine is 'snowflake' but the 'warehouse.snowflake' section is missing"
                .into(),
        ));
    }
    if let Some(sf) = &config.warehouse.snowflake {
        sf.validate()?;
    }
    // Neither warehouse can read a memory:// stage
    if config.storage.backend == StorageBackend::Memory {
        return Err(InfrastructureError::ConfigError(format!(
            "storage.backend 'memory' cannot be loaded by the '{}' warehouse; use 's3' or 'local'",
            config.warehouse.engine
        )));
    }
    Ok(())
}

/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_env_overrides<F>(
    config: &mut PipelineConfig,
    lookup: F,
) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("CASELINE_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = lookup("CASELINE_WAREHOUSE_ENGINE") {
        let engine = match val.to_lowercase().as_str() {
            "snowflake" => Dialect::Snowflake,
            "duckdb" => Dialect::DuckDB,
            other => {
                return Err(InfrastructureError::ConfigError(format!(
                    "CASELINE_WAREHOUSE_ENGINE: unknown engine '{}'",
                    other
                )));
            }
        };
        info!(old = %config.warehouse.engine, new = %engine, "Overriding warehouse engine via ENV");
        config.warehouse.engine = engine;
    }
    if let Some(val) = lookup("CASELINE_STORAGE_BACKEND") {
        let backend = match val.to_lowercase().as_str() {
            "s3" => StorageBackend::S3,
            "local" => StorageBackend::Local,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(InfrastructureError::ConfigError(format!(
                    "CASELINE_STORAGE_BACKEND: unknown backend '{}'",
                    other
                )));
            }
        };
        info!(old = ?config.storage.backend, new = ?backend, "Overriding storage backend via ENV");
        config.storage.backend = backend;
    }
    if let Some(val) = lookup("CASELINE_SOURCE_BASE_URL") {
        info!(old = ?config.source.base_url, new = ?val, "Overriding source URL via ENV");
        config.source.base_url = val;
    }
    Ok(())
}
