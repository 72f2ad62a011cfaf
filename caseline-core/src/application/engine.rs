// caseline-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::error::CaselineError;
use crate::ports::connector::Connector;

/// Exécute une requête SQL brute avec instrumentation (Logs + Timing).
///
/// The statement text is not logged: stage definitions carry credentials.
/// Callers log a redacted rendering when they need one.
#[instrument(skip(connector, query), fields(engine = connector.engine_name(), query.len = query.len()))]
pub async fn execute_query(connector: &dyn Connector, query: &str) -> Result<(), CaselineError> {
    let start = Instant::now();

    let result = connector.execute(query).await;
    let duration = start.elapsed();

    match result {
        Ok(_) => {
            debug!("✅ Query finished in {:.2?}", duration);
            Ok(())
        }
        Err(e) => {
            error!(retriable = e.is_retriable(), "❌ Query failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}
