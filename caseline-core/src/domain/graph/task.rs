// caseline-core/src/domain/graph/task.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The nine tasks of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
    SourceApiReady,
    TransformPublish,
    CreateDatabase,
    CreateSchema,
    CreateTable,
    CreateStage,
    CreateFileFormat,
    LoadTable,
    Notify,
}

impl TaskId {
    pub const ALL: [TaskId; 9] = [
        TaskId::SourceApiReady,
        TaskId::TransformPublish,
        TaskId::CreateDatabase,
        TaskId::CreateSchema,
        TaskId::CreateTable,
        TaskId::CreateStage,
        TaskId::CreateFileFormat,
        TaskId::LoadTable,
        TaskId::Notify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskId::SourceApiReady => "source_api_ready",
            TaskId::TransformPublish => "transform_publish_to_storage",
            TaskId::CreateDatabase => "create_database",
            TaskId::CreateSchema => "create_schema",
            TaskId::CreateTable => "create_table",
            TaskId::CreateStage => "create_external_stage",
            TaskId::CreateFileFormat => "create_file_format",
            TaskId::LoadTable => "load_data_into_table",
            TaskId::Notify => "notify",
        }
    }

    /// Direct upstream dependencies. The run is a strict chain.
    pub fn upstream(&self) -> &'static [TaskId] {
        match self {
            TaskId::SourceApiReady => &[],
            TaskId::TransformPublish => &[TaskId::SourceApiReady],
            TaskId::CreateDatabase => &[TaskId::TransformPublish],
            TaskId::CreateSchema => &[TaskId::CreateDatabase],
            TaskId::CreateTable => &[TaskId::CreateSchema],
            TaskId::CreateStage => &[TaskId::CreateTable],
            TaskId::CreateFileFormat => &[TaskId::CreateStage],
            TaskId::LoadTable => &[TaskId::CreateFileFormat],
            TaskId::Notify => &[TaskId::LoadTable],
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    #[default]
    Pending,
    Running,
    Success,
    Failed,
}

impl TaskState {
    /// pending -> running -> success | failed. Nothing leaves a terminal state.
    pub fn can_transition_to(&self, next: &TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::Pending, TaskState::Running)
                | (TaskState::Running, TaskState::Success)
                | (TaskState::Running, TaskState::Failed)
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Success => "success",
            TaskState::Failed => "failed",
        };
        f.write_str(s)
    }
}
