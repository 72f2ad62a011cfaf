// caseline/src/commands/probe.rs
//
// USE CASE: Readiness probe only.

use std::path::PathBuf;

use caseline_core::application::{ProbeSettings, wait_until_ready};
use caseline_core::infrastructure::adapters::HttpCaseSource;
use caseline_core::ports::CaseSource;

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let config = super::load_config(&project_dir)?;
    let source = HttpCaseSource::new(&config.source)?;

    println!("📡 Probing {} ...", source.endpoint());
    match wait_until_ready(&source, ProbeSettings::from(&config.source)).await {
        Ok(pokes) => {
            println!("✅ Source API ready after {} poke(s)", pokes);
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
