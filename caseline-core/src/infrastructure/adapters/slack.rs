// caseline-core/src/infrastructure/adapters/slack.rs

//! Slack incoming-webhook notifier. The webhook URL is the credential;
//! the body is a plain `{"channel", "text"}` JSON object.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::CaselineError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::notifier::Notifier;

pub struct SlackWebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackWebhookNotifier {
    pub fn new(webhook_url: String) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            webhook_url,
        })
    }
}

pub(crate) fn webhook_body(channel: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "channel": channel,
        "text": text,
    })
}

#[async_trait]
impl Notifier for SlackWebhookNotifier {
    async fn send(&self, channel: &str, text: &str) -> Result<(), CaselineError> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .header("Content-Type", "application/json; charset=utf-8")
            .json(&webhook_body(channel, text))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Slack webhook request failed");
                InfrastructureError::from(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Slack webhook HTTP error");
            // L'URL du webhook est un secret: on ne la logge pas
            return Err(InfrastructureError::HttpStatus {
                url: "slack-webhook".into(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        info!(channel = %channel, "Slack notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_body() {
        let body = webhook_body(
            "#weekly-covid-patient-information",
            "Loaded data into Snowflake successfully on 2023-01-16 14:36:13",
        );
        assert_eq!(body["channel"], "#weekly-covid-patient-information");
        assert_eq!(
            body["text"],
            "Loaded data into Snowflake successfully on 2023-01-16 14:36:13"
        );
        assert_eq!(body.as_object().map(|o| o.len()), Some(2));
    }
}
