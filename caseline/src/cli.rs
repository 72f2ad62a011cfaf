// caseline/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "caseline")]
#[command(about = "Daily case line-list loader: source API -> CSV -> object storage -> warehouse", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the pipeline once (probe -> publish -> provision -> load -> notify)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📝 Prints the task chain and the warehouse statements, executes nothing
    Plan {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📡 Checks whether the source API is ready
    Probe {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Inspects a DuckDB table (schema + sample rows)
    Inspect {
        /// Path to the DuckDB database file
        #[arg(long, default_value = "caseline.duckdb")]
        db_path: String,

        /// Table to inspect, optionally schema-qualified (ex: "CovidTH.weekly_covid_patient_information")
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_defaults() {
        let args = Cli::parse_from(["caseline", "run"]);
        match args.command {
            Commands::Run { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_plan_project_dir() {
        let args = Cli::parse_from(["caseline", "plan", "--project-dir", "/tmp/covid"]);
        match args.command {
            Commands::Plan { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp/covid");
            }
            _ => panic!("Expected Plan command"),
        }
    }

    #[test]
    fn test_cli_parse_inspect() {
        let args = Cli::parse_from([
            "caseline",
            "inspect",
            "-t",
            "CovidTH.weekly_covid_patient_information",
            "--limit",
            "10",
        ]);
        match args.command {
            Commands::Inspect {
                db_path,
                table,
                limit,
            } => {
                assert_eq!(db_path, "caseline.duckdb");
                assert_eq!(table, "CovidTH.weekly_covid_patient_information");
                assert_eq!(limit, 10);
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_inspect_requires_table() {
        assert!(Cli::try_parse_from(["caseline", "inspect"]).is_err());
    }
}
