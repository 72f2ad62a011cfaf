// caseline-core/src/ports/connector.rs

// What the pipeline needs from a warehouse: run one statement, say which
// SQL dialect it speaks. Snowflake and DuckDB plug in behind it.

use crate::domain::warehouse::Dialect;
use crate::error::CaselineError;
use async_trait::async_trait;

#[async_trait]
pub trait Connector: Send + Sync {
    /// Runs one statement to completion. Result rows are discarded.
    async fn execute(&self, query: &str) -> Result<(), CaselineError>;

    fn dialect(&self) -> Dialect;

    fn engine_name(&self) -> &str;
}
