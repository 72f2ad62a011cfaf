// caseline-core/src/infrastructure/adapters/http_source.rs

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::CaselineError;
use crate::infrastructure::config::SourceConfig;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::{CaseSource, PokeOutcome};

/// Public line-list API over plain HTTP GET.
pub struct HttpCaseSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCaseSource {
    pub fn new(config: &SourceConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url(),
        })
    }
}

#[async_trait]
impl CaseSource for HttpCaseSource {
    async fn poke(&self) -> PokeOutcome {
        match self.client.get(&self.url).send().await {
            Ok(resp) if resp.status().is_success() => PokeOutcome::Ready,
            Ok(resp) => PokeOutcome::NotReady {
                reason: format!("HTTP {}", resp.status()),
            },
            Err(e) => PokeOutcome::NotReady {
                reason: e.to_string(),
            },
        }
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Bytes, CaselineError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(InfrastructureError::from)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InfrastructureError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            }
            .into());
        }

        let body = resp.bytes().await.map_err(InfrastructureError::from)?;
        debug!(bytes = body.len(), "Snapshot downloaded");
        Ok(body)
    }

    fn endpoint(&self) -> String {
        self.url.clone()
    }
}
