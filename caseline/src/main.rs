// caseline/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Horodatage du run: capturé au démarrage du process, pas à l'envoi
    let started_at = chrono::Utc::now();

    // RUST_LOG=debug caseline run ... pour voir les détails
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { project_dir } => commands::run::execute(project_dir, started_at).await,
        Commands::Plan { project_dir } => commands::plan::execute(project_dir),
        Commands::Probe { project_dir } => commands::probe::execute(project_dir).await,
        Commands::Inspect {
            db_path,
            table,
            limit,
        } => commands::inspect::execute(db_path, table, limit),
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    }
}
