// caseline-core/src/infrastructure/config/mod.rs

pub mod pipeline;
pub mod project;
pub mod secrets;

pub use pipeline::{
    NotificationConfig, PipelineConfig, RetryConfig, SnowflakeConfig, SourceConfig,
    StorageBackend, StorageConfig, WarehouseConfig,
};
pub use project::{apply_env_overrides, check_config, find_main_config, load_pipeline_config};
pub use secrets::Secrets;
