// caseline-core/src/application/warehouse.rs

// Schema provisioning, stage/format definition and the bulk load all come
// down to "render one statement for the connector's dialect, run it".

use tracing::{debug, info, instrument};

use crate::application::engine::execute_query;
use crate::domain::artifact::ArtifactLocation;
use crate::domain::error::DomainError;
use crate::domain::graph::TaskId;
use crate::domain::warehouse::{StageCredentials, StatementCompiler, WarehouseStatement};
use crate::error::CaselineError;
use crate::ports::connector::Connector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementOutcome {
    Executed,
    /// The dialect has no such object (DuckDB databases, file formats).
    Skipped,
}

/// The warehouse statement behind `task`, or `None` for non-warehouse tasks.
///
/// Stage and load need the artifact location published upstream; it is
/// taken as given, never re-derived from configuration.
pub fn statement_for(
    task: TaskId,
    artifact: Option<&ArtifactLocation>,
    credentials: Option<&StageCredentials>,
) -> Result<Option<WarehouseStatement>, DomainError> {
    let published = || {
        artifact.cloned().ok_or(DomainError::MissingUpstreamOutput {
            task: task.to_string(),
            upstream: TaskId::TransformPublish.to_string(),
        })
    };

    let statement = match task {
        TaskId::CreateDatabase => WarehouseStatement::CreateDatabase,
        TaskId::CreateSchema => WarehouseStatement::CreateSchema,
        TaskId::CreateTable => WarehouseStatement::CreateTable,
        TaskId::CreateStage => WarehouseStatement::CreateStage {
            location: published()?,
            credentials: credentials.cloned(),
        },
        TaskId::CreateFileFormat => WarehouseStatement::CreateFileFormat,
        TaskId::LoadTable => WarehouseStatement::CopyInto {
            location: published()?,
        },
        TaskId::SourceApiReady | TaskId::TransformPublish | TaskId::Notify => return Ok(None),
    };
    Ok(Some(statement))
}

#[instrument(skip_all, fields(engine = connector.engine_name()))]
pub async fn apply_statement(
    connector: &dyn Connector,
    compiler: &StatementCompiler,
    statement: &WarehouseStatement,
) -> Result<StatementOutcome, CaselineError> {
    let Some(sql) = compiler.render(statement) else {
        debug!(statement = ?statement.redacted(), "No equivalent in this dialect, skipping");
        return Ok(StatementOutcome::Skipped);
    };

    if let Some(shown) = compiler.render(&statement.redacted()) {
        info!(sql = %shown, "Running warehouse statement");
    }
    execute_query(connector, &sql).await?;
    Ok(StatementOutcome::Executed)
}

/// Statements a run would issue, credentials masked. Nothing is executed.
pub fn plan_statements(
    compiler: &StatementCompiler,
    location: &ArtifactLocation,
    credentials: Option<&StageCredentials>,
) -> Result<Vec<(TaskId, Option<String>)>, DomainError> {
    let masked = credentials.map(StageCredentials::redacted);
    let mut plan = Vec::new();
    for task in TaskId::ALL {
        if let Some(statement) = statement_for(task, Some(location), masked.as_ref())? {
            plan.push((task, compiler.render(&statement)));
        }
    }
    Ok(plan)
}
