// caseline-core/src/application/mod.rs

pub mod clean;
pub mod engine;
pub mod notify;
pub mod pipeline;
pub mod ports;
pub mod probe;
pub mod publish;
pub mod warehouse;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI fait `use caseline_core::application::{run_pipeline, clean_project};`
// sans connaître la structure interne des fichiers.

pub use clean::clean_project;
pub use engine::execute_query;
pub use notify::format_started_at;
pub use pipeline::{PipelineServices, RunResult, TaskReport, planned_tasks, run_pipeline};
pub use probe::{ProbeSettings, wait_until_ready};
pub use publish::{PublishOutcome, transform_and_publish};
pub use warehouse::plan_statements;
