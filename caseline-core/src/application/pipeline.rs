// caseline-core/src/application/pipeline.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::application::notify::{CompletionMessage, notify_completion};
use crate::application::ports::TemplateEngine;
use crate::application::probe::{ProbeSettings, wait_until_ready};
use crate::application::publish::transform_and_publish;
use crate::application::warehouse::{StatementOutcome, apply_statement, statement_for};
use crate::domain::artifact::ArtifactLocation;
use crate::domain::graph::{GraphSolver, TaskId, TaskState};
use crate::domain::record::TransformOptions;
use crate::domain::warehouse::{StageCredentials, StatementCompiler};
use crate::error::CaselineError;
use crate::infrastructure::config::PipelineConfig;
use crate::infrastructure::config::secrets::SLACK_WEBHOOK_VAR;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{RunLock, atomic_write};
use crate::ports::{ArtifactStore, CaseSource, Connector, Notifier};

pub const RUN_RESULTS_FILE: &str = "run_results.json";

/// Adapters a run talks to.
pub struct PipelineServices<'a> {
    pub source: &'a dyn CaseSource,
    pub store: &'a dyn ArtifactStore,
    pub connector: &'a dyn Connector,
    /// Only consulted when notification is enabled.
    pub notifier: Option<&'a dyn Notifier>,
    pub renderer: &'a dyn TemplateEngine,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskReport {
    pub task: TaskId,
    pub state: TaskState,
    pub attempts: u32,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retriable: Option<bool>,
}

impl TaskReport {
    fn pending(task: TaskId) -> Self {
        Self {
            task,
            state: TaskState::Pending,
            attempts: 0,
            duration_ms: 0,
            detail: None,
            error: None,
            retriable: None,
        }
    }

    fn advance(&mut self, next: TaskState) -> Result<(), CaselineError> {
        if !self.state.can_transition_to(&next) {
            return Err(CaselineError::InternalError(format!(
                "illegal transition {} -> {} for task {}",
                self.state, next, self.task
            )));
        }
        self.state = next;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunResult {
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub engine: String,
    pub artifact: Option<ArtifactLocation>,
    pub rows: Option<usize>,
    pub duration_ms: u64,
    pub tasks: Vec<TaskReport>,
}

impl RunResult {
    pub fn failed_task(&self) -> Option<&TaskReport> {
        self.tasks.iter().find(|t| t.state == TaskState::Failed)
    }
}

/// Inter-task results of the current run.
#[derive(Debug, Default)]
struct RunState {
    artifact: Option<ArtifactLocation>,
    rows: Option<usize>,
}

struct Runner<'a> {
    services: &'a PipelineServices<'a>,
    config: &'a PipelineConfig,
    compiler: StatementCompiler,
    credentials: Option<StageCredentials>,
    started_at: DateTime<Utc>,
}

impl Runner<'_> {
    async fn run_task(
        &self,
        task: TaskId,
        state: &mut RunState,
    ) -> Result<Option<String>, CaselineError> {
        match task {
            TaskId::SourceApiReady => {
                let settings = ProbeSettings::from(&self.config.source);
                let pokes = wait_until_ready(self.services.source, settings).await?;
                Ok(Some(format!("ready after {} poke(s)", pokes)))
            }
            TaskId::TransformPublish => {
                let options = TransformOptions {
                    strict_fields: self.config.source.strict_fields,
                };
                let outcome = transform_and_publish(
                    self.services.source,
                    self.services.store,
                    &self.config.storage.key,
                    options,
                )
                .await?;
                let detail = format!("{} rows -> {}", outcome.rows, outcome.location);
                state.artifact = Some(outcome.location);
                state.rows = Some(outcome.rows);
                Ok(Some(detail))
            }
            TaskId::Notify => {
                let notifier = self.services.notifier.ok_or_else(|| {
                    InfrastructureError::MissingSecret(SLACK_WEBHOOK_VAR.to_string())
                })?;
                let t = self.compiler.target();
                let table = format!("{}.{}.{}", t.database, t.schema, t.table);
                let text = notify_completion(
                    notifier,
                    self.services.renderer,
                    &self.config.notification,
                    &CompletionMessage {
                        engine: self.services.connector.engine_name(),
                        table: &table,
                        rows: state.rows,
                        started_at: self.started_at,
                    },
                )
                .await?;
                Ok(Some(text))
            }
            warehouse_task => {
                let statement = statement_for(
                    warehouse_task,
                    state.artifact.as_ref(),
                    self.credentials.as_ref(),
                )?
                .ok_or_else(|| {
                    CaselineError::InternalError(format!("{} has no statement", warehouse_task))
                })?;
                let outcome =
                    apply_statement(self.services.connector, &self.compiler, &statement).await?;
                Ok(match outcome {
                    StatementOutcome::Executed => None,
                    StatementOutcome::Skipped => Some("skipped (not applicable to engine)".into()),
                })
            }
        }
    }
}

/// Tasks of a run, in execution order.
pub fn planned_tasks(config: &PipelineConfig) -> Result<Vec<TaskId>, CaselineError> {
    let tasks: Vec<TaskId> = TaskId::ALL
        .into_iter()
        .filter(|t| *t != TaskId::Notify || config.notification.enabled)
        .collect();
    Ok(GraphSolver::plan_execution(&tasks)?)
}

/// Runs the chain once, strictly in order, stopping at the first failure.
///
/// Task failures are reported in the returned `RunResult` (and in
/// `run_results.json`), not as `Err`. `Err` means the run never started:
/// lock held, bad plan, or results could not be written.
#[instrument(skip_all, fields(pipeline = %config.name))]
pub async fn run_pipeline(
    services: &PipelineServices<'_>,
    config: &PipelineConfig,
    project_dir: &Path,
    started_at: DateTime<Utc>,
    credentials: Option<StageCredentials>,
) -> Result<RunResult, CaselineError> {
    println!("🚀 Starting pipeline '{}'...", config.name);
    let start_time = Instant::now();

    // 1. SETUP: un seul run par répertoire cible
    let target_dir = project_dir.join(&config.target_path);
    let _lock = RunLock::acquire(&target_dir)?;

    // 2. PLAN
    let plan = planned_tasks(config)?;
    let policy = config.retry.policy();
    println!(
        "📝 Execution Plan: {} tasks, up to {} attempt(s) each",
        plan.len(),
        policy.max_attempts()
    );

    let runner = Runner {
        services,
        config,
        compiler: StatementCompiler::new(
            services.connector.dialect(),
            config.warehouse.target(),
        ),
        credentials,
        started_at,
    };

    // 3. EXECUTION LOOP (séquentiel, fail-fast)
    let mut state = RunState::default();
    let mut reports: Vec<TaskReport> = plan.iter().copied().map(TaskReport::pending).collect();
    let total = reports.len();

    for (i, report) in reports.iter_mut().enumerate() {
        let task = report.task;
        println!("▶️  [{}/{}] {}", i + 1, total, task);
        report.advance(TaskState::Running)?;
        let task_start = Instant::now();

        let outcome = loop {
            report.attempts += 1;
            match runner.run_task(task, &mut state).await {
                Ok(detail) => break Ok(detail),
                Err(e) if policy.should_retry(report.attempts, e.is_retriable()) => {
                    warn!(task = %task, attempt = report.attempts, error = %e, "Retriable failure");
                    println!(
                        "   🔁 Attempt {}/{} failed: {}. Retrying in {:?}",
                        report.attempts,
                        policy.max_attempts(),
                        e,
                        policy.delay
                    );
                    tokio::time::sleep(policy.delay).await;
                }
                Err(e) => break Err(e),
            }
        };
        report.duration_ms = task_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(detail) => {
                report.advance(TaskState::Success)?;
                match &detail {
                    Some(d) => println!("   ✅ {} ({})", task, d),
                    None => println!("   ✅ {}", task),
                }
                report.detail = detail;
            }
            Err(e) => {
                report.advance(TaskState::Failed)?;
                error!(
                    task = %task,
                    attempts = report.attempts,
                    retriable = e.is_retriable(),
                    error = %e,
                    "Task failed"
                );
                println!("   ❌ {} failed after {} attempt(s): {}", task, report.attempts, e);
                report.error = Some(e.to_string());
                report.retriable = Some(e.is_retriable());
                break;
            }
        }
    }

    // 4. FINALIZE
    let success = reports.iter().all(|r| r.state == TaskState::Success);
    let result = RunResult {
        success,
        started_at,
        engine: services.connector.engine_name().to_string(),
        artifact: state.artifact,
        rows: state.rows,
        duration_ms: start_time.elapsed().as_millis() as u64,
        tasks: reports,
    };
    save_json(&target_dir.join(RUN_RESULTS_FILE), &result)?;

    let duration = start_time.elapsed();
    if success {
        info!(rows = ?result.rows, "Pipeline succeeded");
        println!("✨ Done in {:.2}s.", duration.as_secs_f64());
    } else {
        println!("💥 Pipeline failed after {:.2}s.", duration.as_secs_f64());
    }

    Ok(result)
}

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), CaselineError> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| CaselineError::InternalError(format!("Serialization: {}", e)))?;
    atomic_write(path, content)?;
    Ok(())
}
