// caseline-core/src/domain/graph/mod.rs

pub mod dag;
pub mod task;

pub use dag::GraphSolver;
pub use task::{TaskId, TaskState};
