// src/oracle/mock.rs
use crate::oracle::QualityOracle;
use crate::utils::error::OracleError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted oracle for tests and dry runs. Queued replies are served first, in
/// order; once the queue is empty every call gets the default reply.
#[derive(Debug)]
pub struct MockOracle {
    default_reply: String,
    script: Mutex<VecDeque<Result<String, OracleError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockOracle {
    pub fn always(reply: impl Into<String>) -> Self {
        Self {
            default_reply: reply.into(),
            script: Mutex::new(VecDeque::new()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// An oracle that accepts every theorem.
    pub fn accepting() -> Self {
        Self::always(r#"{"single_unique_answer": "true", "explanation": "Accepted by mock oracle."}"#)
    }

    /// An oracle that rejects every theorem.
    pub fn rejecting() -> Self {
        Self::always(r#"{"single_unique_answer": "false", "explanation": ""}"#)
    }

    pub fn then_reply(self, reply: impl Into<String>) -> Self {
        self.push(Ok(reply.into()))
    }

    pub fn then_error(self, error: OracleError) -> Self {
        self.push(Err(error))
    }

    /// Queues a transient HTTP failure.
    pub fn then_failure(self) -> Self {
        self.push(Err(OracleError::Http(reqwest::StatusCode::SERVICE_UNAVAILABLE)))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(self, reply: Result<String, OracleError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
        self
    }

    fn next_reply(&self) -> Result<String, OracleError> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_reply.clone()))
    }
}

impl QualityOracle for MockOracle {
    async fn request_verdict(&self, _theorem: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_reply()
    }
}
