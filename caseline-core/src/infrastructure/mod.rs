// caseline-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;
pub mod templating;

pub use config::{PipelineConfig, Secrets, load_pipeline_config};
pub use error::InfrastructureError;
