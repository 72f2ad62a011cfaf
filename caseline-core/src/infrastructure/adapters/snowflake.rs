// caseline-core/src/infrastructure/adapters/snowflake.rs

// Snowflake through its SQL REST API: one POST per statement, bearer token
// auth. Long statements come back 202 and are polled until they settle.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::domain::warehouse::Dialect;
use crate::error::CaselineError;
use crate::infrastructure::config::SnowflakeConfig;
use crate::infrastructure::error::{DatabaseError, InfrastructureError, is_retriable_status};
use crate::ports::connector::Connector;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    code: Option<String>,
    message: Option<String>,
    statement_status_url: Option<String>,
}

pub struct SnowflakeConnector {
    client: reqwest::Client,
    config: SnowflakeConfig,
    token: String,
}

impl SnowflakeConnector {
    pub fn new(config: SnowflakeConfig, token: String) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.statement_timeout_secs + 30))
            .build()?;
        Ok(Self {
            client,
            config,
            token,
        })
    }

    fn request_body(&self, query: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "statement": query,
            "timeout": self.config.statement_timeout_secs,
        });
        if let Some(wh) = &self.config.warehouse {
            body["warehouse"] = wh.clone().into();
        }
        if let Some(role) = &self.config.role {
            body["role"] = role.clone().into();
        }
        body
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(&self.token)
            .header("X-Snowflake-Authorization-Token-Type", &self.config.token_type)
            .header("Accept", "application/json")
    }

    async fn read(
        resp: reqwest::Response,
    ) -> Result<(StatusCode, StatementResponse), InfrastructureError> {
        let status = resp.status();
        let text = resp.text().await?;
        // Les erreurs de passerelle renvoient parfois du HTML
        let parsed = serde_json::from_str(&text).unwrap_or_else(|_| StatementResponse {
            message: Some(text),
            ..Default::default()
        });
        Ok((status, parsed))
    }

    async fn wait_for(&self, status_url: &str) -> Result<(), InfrastructureError> {
        let deadline = Instant::now() + Duration::from_secs(self.config.statement_timeout_secs);
        let url = format!("{}{}", self.config.base_url(), status_url);

        loop {
            tokio::time::sleep(POLL_INTERVAL).await;
            let resp = self.authorized(self.client.get(&url)).send().await?;
            let (status, body) = Self::read(resp).await?;

            if status != StatusCode::ACCEPTED {
                return settle(status, body);
            }
            if Instant::now() >= deadline {
                return Err(DatabaseError::Snowflake {
                    code: body.code.unwrap_or_default(),
                    message: format!(
                        "statement still running after {}s",
                        self.config.statement_timeout_secs
                    ),
                    retriable: true,
                }
                .into());
            }
            debug!(url = %url, "Statement still running");
        }
    }
}

/// Maps a settled (non-202) response onto success or a classified error.
fn settle(status: StatusCode, body: StatementResponse) -> Result<(), InfrastructureError> {
    if status.is_success() {
        return Ok(());
    }
    let retriable = is_retriable_status(status.as_u16());
    let err = DatabaseError::Snowflake {
        code: body.code.unwrap_or_else(|| status.as_u16().to_string()),
        message: body.message.unwrap_or_else(|| status.to_string()),
        retriable,
    };
    warn!(error = %err, retriable, "Snowflake statement failed");
    Err(err.into())
}

#[async_trait]
impl Connector for SnowflakeConnector {
    #[instrument(skip(self, query), fields(account = %self.config.account))]
    async fn execute(&self, query: &str) -> Result<(), CaselineError> {
        let url = self.config.api_url();
        let resp = self
            .authorized(self.client.post(&url))
            .json(&self.request_body(query))
            .send()
            .await
            .map_err(InfrastructureError::from)?;

        let (status, body) = Self::read(resp).await?;
        if status == StatusCode::ACCEPTED {
            let status_url = body
                .statement_status_url
                .ok_or_else(|| DatabaseError::Snowflake {
                    code: body.code.clone().unwrap_or_default(),
                    message: "statement accepted without a status URL".into(),
                    retriable: false,
                })
                .map_err(InfrastructureError::from)?;
            self.wait_for(&status_url).await?;
            return Ok(());
        }
        settle(status, body)?;
        Ok(())
    }

    fn dialect(&self) -> Dialect {
        Dialect::Snowflake
    }

    fn engine_name(&self) -> &str {
        "Snowflake"
    }
}
