// caseline-core/src/application/probe.rs

use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use crate::error::CaselineError;
use crate::infrastructure::config::SourceConfig;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::{CaseSource, PokeOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub max_pokes: Option<u32>,
}

impl From<&SourceConfig> for ProbeSettings {
    fn from(config: &SourceConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.poke_interval_secs),
            timeout: Duration::from_secs(config.probe_timeout_secs),
            max_pokes: config.max_pokes,
        }
    }
}

/// Pokes the source until it answers 2xx. Returns the number of pokes.
///
/// Gives up with `ProbeExhausted` once `max_pokes` is spent or the next
/// sleep would cross the deadline.
#[instrument(skip(source), fields(url = %source.endpoint()))]
pub async fn wait_until_ready(
    source: &dyn CaseSource,
    settings: ProbeSettings,
) -> Result<u32, CaselineError> {
    let start = Instant::now();
    let mut pokes: u32 = 0;

    loop {
        pokes += 1;
        match source.poke().await {
            PokeOutcome::Ready => {
                info!(pokes, "Source API ready");
                return Ok(pokes);
            }
            PokeOutcome::NotReady { reason } => {
                warn!(pokes, reason = %reason, "Source API not ready");
            }
        }

        let out_of_pokes = settings.max_pokes.is_some_and(|max| pokes >= max);
        let out_of_time = start.elapsed() + settings.interval > settings.timeout;
        if out_of_pokes || out_of_time {
            return Err(InfrastructureError::ProbeExhausted {
                url: source.endpoint(),
                pokes,
                elapsed_secs: start.elapsed().as_secs(),
            }
            .into());
        }

        tokio::time::sleep(settings.interval).await;
    }
}
