// caseline/src/commands/run.rs
//
// USE CASE: Run the pipeline once.

use anyhow::Context;
use chrono::{DateTime, Utc};
use comfy_table::Table;
use std::path::PathBuf;

use caseline_core::application::{PipelineServices, RunResult, run_pipeline};
use caseline_core::domain::warehouse::Dialect;
use caseline_core::infrastructure::adapters::{
    DuckDBConnector, HttpCaseSource, ObjectStoreArtifacts, SlackWebhookNotifier,
    SnowflakeConnector,
};
use caseline_core::infrastructure::config::Secrets;
use caseline_core::infrastructure::templating::JinjaRenderer;
use caseline_core::ports::{Connector, Notifier};

pub async fn execute(project_dir: PathBuf, started_at: DateTime<Utc>) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // A. Load the Config (Infra)
    let config = super::load_config(&project_dir)?;
    let secrets = Secrets::from_env();
    tracing::debug!(secrets = ?secrets, "Secrets resolved from environment");
    let credentials = secrets.stage_credentials(config.storage.region.clone());

    // B. Instantiate the adapters
    let source = HttpCaseSource::new(&config.source)?;
    let store =
        ObjectStoreArtifacts::from_config(&config.storage, &project_dir, credentials.as_ref())
            .context("Failed to initialize artifact storage")?;

    let connector: Box<dyn Connector> = match config.warehouse.engine {
        Dialect::DuckDB => {
            println!("   Engine: DuckDB 🦆");
            let db_path = project_dir.join(&config.warehouse.duckdb_path);
            let db_path = db_path.to_string_lossy();
            Box::new(
                DuckDBConnector::new(&db_path)
                    .with_context(|| format!("Failed to initialize DuckDB at {}", db_path))?,
            )
        }
        Dialect::Snowflake => {
            println!("   Engine: Snowflake ❄️");
            let sf = config
                .warehouse
                .snowflake
                .clone()
                .context("warehouse.snowflake section is required for the snowflake engine")?;
            let token = secrets.snowflake_token()?.to_string();
            Box::new(SnowflakeConnector::new(sf, token)?)
        }
    };

    // Secret manquant: on échoue avant de toucher quoi que ce soit
    let notifier = if config.notification.enabled {
        Some(SlackWebhookNotifier::new(secrets.slack_webhook_url()?.to_string())?)
    } else {
        None
    };
    let renderer = JinjaRenderer::new();

    // C. Run the Pipeline (Application Layer)
    let services = PipelineServices {
        source: &source,
        store: &store,
        connector: connector.as_ref(),
        notifier: notifier.as_ref().map(|n| n as &dyn Notifier),
        renderer: &renderer,
    };

    let result = run_pipeline(&services, &config, &project_dir, started_at, credentials).await;

    match result {
        Ok(run_res) => {
            print_summary(&run_res);
            if run_res.success {
                println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
            } else {
                let failed = run_res
                    .failed_task()
                    .map(|t| t.task.to_string())
                    .unwrap_or_default();
                eprintln!("\n❌ FAILURE. Task '{}' failed.", failed);
                // Exit with error code for schedulers / CI
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("\n💥 CRITICAL PIPELINE ERROR: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_summary(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec!["Task", "State", "Attempts", "Duration", "Detail"]);
    for report in &result.tasks {
        let detail = report
            .error
            .as_deref()
            .or(report.detail.as_deref())
            .unwrap_or("");
        table.add_row(vec![
            report.task.to_string(),
            report.state.to_string(),
            report.attempts.to_string(),
            format!("{} ms", report.duration_ms),
            detail.to_string(),
        ]);
    }
    println!("\n{table}");
}
