// caseline-core/src/ports/notifier.rs

use crate::error::CaselineError;
use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, channel: &str, text: &str) -> Result<(), CaselineError>;
}
