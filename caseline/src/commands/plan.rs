// caseline/src/commands/plan.rs
//
// USE CASE: Show what a run would do. Nothing is executed, nothing is
// written; credentials are masked.

use comfy_table::Table;
use std::path::PathBuf;

use caseline_core::application::{plan_statements, planned_tasks};
use caseline_core::domain::graph::TaskId;
use caseline_core::domain::warehouse::StatementCompiler;
use caseline_core::infrastructure::adapters::ObjectStoreArtifacts;
use caseline_core::infrastructure::config::Secrets;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;
    let secrets = Secrets::from_env();

    let tasks = planned_tasks(&config)?;
    let location = ObjectStoreArtifacts::planned_location(&config.storage, &project_dir);
    let credentials = secrets.stage_credentials(config.storage.region.clone());
    let compiler = StatementCompiler::new(config.warehouse.engine, config.warehouse.target());
    let statements = plan_statements(&compiler, &location, credentials.as_ref())?;

    println!("   Engine: {}", config.warehouse.engine);
    println!("   Artifact: {}", location);
    println!(
        "📝 Execution Plan: {} tasks, {} retries each ({}s apart)",
        tasks.len(),
        config.retry.retries,
        config.retry.delay_secs
    );

    let mut table = Table::new();
    table.set_header(vec!["#", "Task", "Action"]);
    for (i, task) in tasks.iter().enumerate() {
        let action = match statements.iter().find(|(t, _)| t == task) {
            Some((_, Some(sql))) => sql.clone(),
            Some((_, None)) => "(skipped for this engine)".to_string(),
            None => match task {
                TaskId::SourceApiReady => format!("GET {} until 2xx", config.source.url()),
                TaskId::TransformPublish => format!("fetch, reshape, put {}", location),
                _ => format!("post to {}", config.notification.channel),
            },
        };
        table.add_row(vec![(i + 1).to_string(), task.to_string(), action]);
    }
    println!("{table}");

    Ok(())
}
