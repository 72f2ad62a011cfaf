// caseline-core/src/application/notify.rs

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::instrument;

use crate::application::ports::TemplateEngine;
use crate::error::CaselineError;
use crate::infrastructure::config::NotificationConfig;
use crate::ports::notifier::Notifier;

pub const STARTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Process start time as shown to humans, in the reporting timezone.
pub fn format_started_at(started_at: DateTime<Utc>, tz: Tz) -> String {
    started_at.with_timezone(&tz).format(STARTED_AT_FORMAT).to_string()
}

pub struct CompletionMessage<'a> {
    pub engine: &'a str,
    pub table: &'a str,
    pub rows: Option<usize>,
    pub started_at: DateTime<Utc>,
}

/// Renders the configured template and sends it. Returns the text sent.
#[instrument(skip_all, fields(channel = %config.channel))]
pub async fn notify_completion(
    notifier: &dyn Notifier,
    renderer: &dyn TemplateEngine,
    config: &NotificationConfig,
    message: &CompletionMessage<'_>,
) -> Result<String, CaselineError> {
    let context = serde_json::json!({
        "engine": message.engine,
        "table": message.table,
        "rows": message.rows,
        "started_at": format_started_at(message.started_at, config.tz()),
    });
    let text = renderer.render(&config.message, &context)?;
    notifier.send(&config.channel, &text).await?;
    Ok(text)
}
