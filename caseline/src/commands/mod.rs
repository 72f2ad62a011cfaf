// caseline/src/commands/mod.rs

pub mod clean;
pub mod inspect;
pub mod plan;
pub mod probe;
pub mod run;

use anyhow::Context;
use std::path::Path;

use caseline_core::infrastructure::config::PipelineConfig;
use caseline_core::infrastructure::config::project::load_pipeline_config;

/// Loads the manifest, rendering config diagnostics with miette.
pub(crate) fn load_config(project_dir: &Path) -> anyhow::Result<PipelineConfig> {
    println!("⚙️  Loading configuration...");
    let config = load_pipeline_config(project_dir)
        .map_err(|e| anyhow::anyhow!("{:?}", miette::Report::new(e)))
        .with_context(|| {
            format!(
                "Failed to load pipeline configuration from {:?}",
                project_dir
            )
        })?;
    println!("   Pipeline: {} (v{})", config.name, config.version);
    Ok(config)
}
