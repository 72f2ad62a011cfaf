// caseline/tests/cli_tests.rs

use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const ENV_OVERRIDES: [&str; 9] = [
    "CASELINE_TARGET_PATH",
    "CASELINE_WAREHOUSE_ENGINE",
    "CASELINE_STORAGE_BACKEND",
    "CASELINE_SOURCE_BASE_URL",
    "CASELINE_AWS_ACCESS_KEY_ID",
    "CASELINE_AWS_SECRET_ACCESS_KEY",
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "SLACK_WEBHOOK_URL",
];

/// A throwaway project directory holding one `caseline.yaml`.
struct CaselineTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl CaselineTestEnv {
    fn new(config: &str) -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("project");
        fs::create_dir_all(&root)?;
        fs::write(root.join("caseline.yaml"), config)?;
        Ok(Self { _tmp: tmp, root })
    }

    fn cmd(&self, args: &[&str]) -> Result<Command> {
        let mut cmd = Command::cargo_bin("caseline")?;
        for var in ENV_OVERRIDES {
            cmd.env_remove(var);
        }
        cmd.args(args).arg("--project-dir").arg(&self.root);
        Ok(cmd)
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}

fn local_project(base_url: &str) -> String {
    format!(
        r#"
name: weekly_covid_patient_information
source:
  base_url: {base_url}
  poke_interval_secs: 1
  probe_timeout_secs: 1
  max_pokes: 1
  request_timeout_secs: 2
storage:
  backend: local
  bucket: bucket-weekly-covid-patient-information
warehouse:
  engine: duckdb
  database: Project
  schema: CovidTH
  table: weekly_covid_patient_information
notification:
  enabled: false
retry:
  retries: 0
  delay_secs: 0
"#
    )
}

const SNOWFLAKE_PROJECT: &str = r#"
name: weekly_covid_patient_information
source:
  base_url: https://covid19.ddc.moph.go.th
storage:
  bucket: bucket-weekly-covid-patient-information
  region: ap-southeast-1
warehouse:
  engine: snowflake
  database: Project
  schema: CovidTH
  table: weekly_covid_patient_information
  snowflake:
    account: xy12345.ap-southeast-1
"#;

#[test]
fn test_help_lists_commands() -> Result<()> {
    Command::cargo_bin("caseline")?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("inspect"));
    Ok(())
}

#[test]
fn test_run_without_config_fails() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    Command::cargo_bin("caseline")?
        .args(["run", "--project-dir"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pipeline configuration not found"));
    Ok(())
}

#[test]
fn test_plan_snowflake_masks_credentials() -> Result<()> {
    let env = CaselineTestEnv::new(SNOWFLAKE_PROJECT)?;
    env.cmd(&["plan"])?
        .env("AWS_ACCESS_KEY_ID", "AKIAPLANTEST")
        .env("AWS_SECRET_ACCESS_KEY", "plan-secret")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "CREATE DATABASE IF NOT EXISTS Project",
        ))
        .stdout(predicate::str::contains(
            "s3://bucket-weekly-covid-patient-information/weekly_covid_patient_information.csv",
        ))
        .stdout(predicate::str::contains("AWS_KEY_ID = '****'"))
        .stdout(predicate::str::contains("AKIAPLANTEST").not())
        .stdout(predicate::str::contains("plan-secret").not());

    // plan writes nothing
    assert!(!env.path("target").exists());
    Ok(())
}

#[test]
fn test_plan_duckdb_shows_skipped_objects() -> Result<()> {
    let env = CaselineTestEnv::new(&local_project("http://127.0.0.1:9"))?;
    env.cmd(&["plan"])?
        .assert()
        .success()
        .stdout(predicate::str::contains("(skipped for this engine)"))
        .stdout(predicate::str::contains("COPY CovidTH.weekly_covid_patient_information FROM"));
    Ok(())
}

#[test]
fn test_unreachable_source_fails_run_before_storage() -> Result<()> {
    let env = CaselineTestEnv::new(&local_project("http://127.0.0.1:9"))?;

    env.cmd(&["run"])?.assert().failure().code(1);

    let results: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(env.path("target/run_results.json"))?)?;
    assert_eq!(results["success"], false);
    assert_eq!(results["tasks"][0]["task"], "source_api_ready");
    assert_eq!(results["tasks"][0]["state"], "failed");
    assert_eq!(results["tasks"][1]["state"], "pending");

    assert!(!Path::new(&env.path("target/bucket/weekly_covid_patient_information.csv")).exists());
    assert!(!env.path("target/caseline.lock").exists());
    Ok(())
}

#[test]
fn test_run_refused_while_locked() -> Result<()> {
    let env = CaselineTestEnv::new(&local_project("http://127.0.0.1:9"))?;
    fs::create_dir_all(env.path("target"))?;
    fs::write(env.path("target/caseline.lock"), "pid=1")?;

    env.cmd(&["run"])?
        .assert()
        .failure()
        .stderr(predicate::str::contains("another run is in progress"));
    Ok(())
}

#[test]
fn test_clean_removes_target() -> Result<()> {
    let env = CaselineTestEnv::new(&local_project("http://127.0.0.1:9"))?;
    fs::create_dir_all(env.path("target/bucket"))?;

    env.cmd(&["clean"])?.assert().success();

    assert!(!env.path("target").exists());
    Ok(())
}

#[test]
fn test_inspect_missing_database() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    Command::cargo_bin("caseline")?
        .args(["inspect", "--table", "CovidTH.weekly_covid_patient_information", "--db-path"])
        .arg(tmp.path().join("missing.duckdb"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not found"));
    Ok(())
}
