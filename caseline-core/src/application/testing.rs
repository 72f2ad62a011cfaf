// caseline-core/src/application/testing.rs

// In-process doubles for the ports, shared by the application tests.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::warehouse::Dialect;
use crate::error::CaselineError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::Connector;
use crate::ports::notifier::Notifier;
use crate::ports::source::{CaseSource, PokeOutcome};

/// Answers pokes from a status script (the last status repeats).
pub(crate) struct ScriptedSource {
    statuses: Vec<u16>,
    body: Vec<u8>,
    fetch_status: u16,
    pokes: Mutex<usize>,
}

impl ScriptedSource {
    pub(crate) fn new(statuses: Vec<u16>, body: &[u8]) -> Self {
        Self {
            statuses,
            body: body.to_vec(),
            fetch_status: 200,
            pokes: Mutex::new(0),
        }
    }

    pub(crate) fn with_fetch_status(mut self, status: u16) -> Self {
        self.fetch_status = status;
        self
    }

    pub(crate) fn poke_count(&self) -> usize {
        *self.pokes.lock().unwrap()
    }
}

#[async_trait]
impl CaseSource for ScriptedSource {
    async fn poke(&self) -> PokeOutcome {
        let mut pokes = self.pokes.lock().unwrap();
        let status = self
            .statuses
            .get(*pokes)
            .or(self.statuses.last())
            .copied()
            .unwrap_or(200);
        *pokes += 1;
        if (200..300).contains(&status) {
            PokeOutcome::Ready
        } else {
            PokeOutcome::NotReady {
                reason: format!("HTTP {status}"),
            }
        }
    }

    async fn fetch(&self) -> Result<Bytes, CaselineError> {
        if (200..300).contains(&self.fetch_status) {
            Ok(Bytes::from(self.body.clone()))
        } else {
            Err(InfrastructureError::HttpStatus {
                url: self.endpoint(),
                status: self.fetch_status,
                body: String::new(),
            }
            .into())
        }
    }

    fn endpoint(&self) -> String {
        "http://mock/api/Cases/today-cases-line-lists".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    Retriable,
    Terminal,
}

/// Records every statement; pops a scripted failure before each attempt.
pub(crate) struct RecordingConnector {
    dialect: Dialect,
    statements: Arc<Mutex<Vec<String>>>,
    attempts: Mutex<usize>,
    failures: Mutex<VecDeque<Failure>>,
}

impl RecordingConnector {
    pub(crate) fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            statements: Arc::new(Mutex::new(Vec::new())),
            attempts: Mutex::new(0),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn failing(self, failures: Vec<Failure>) -> Self {
        *self.failures.lock().unwrap() = failures.into();
        self
    }

    /// Statements that succeeded, in order.
    pub(crate) fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub(crate) fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn execute(&self, query: &str) -> Result<(), CaselineError> {
        *self.attempts.lock().unwrap() += 1;
        let failure = self.failures.lock().unwrap().pop_front();
        match failure {
            Some(kind) => Err(InfrastructureError::Database(DatabaseError::Snowflake {
                code: "000000".into(),
                message: format!("scripted failure on: {query}"),
                retriable: matches!(kind, Failure::Retriable),
            })
            .into()),
            None => {
                self.statements.lock().unwrap().push(query.to_string());
                Ok(())
            }
        }
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn engine_name(&self) -> &str {
        match self.dialect {
            Dialect::Snowflake => "Snowflake",
            Dialect::DuckDB => "DuckDB",
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, channel: &str, text: &str) -> Result<(), CaselineError> {
        self.messages
            .lock()
            .unwrap()
            .push((channel.to_string(), text.to_string()));
        Ok(())
    }
}
