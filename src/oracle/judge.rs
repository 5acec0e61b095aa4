// src/oracle/judge.rs
use crate::config::OracleConfig;
use crate::oracle::models::{parse_verdict, QualityVerdict};
use crate::oracle::QualityOracle;
use crate::utils::error::OracleError;
use std::time::Duration;

/// Applies the retry policy around a [`QualityOracle`].
///
/// Every attempt runs under a wall-clock timeout. Transport errors, timeouts and
/// replies missing a required key each use up one attempt. When attempts run out
/// (or the oracle refuses our credentials) the theorem is rejected with an empty
/// explanation; no error escapes.
pub struct UniquenessJudge<O> {
    oracle: O,
    max_attempts: u32,
    timeout: Duration,
    backoff: Duration,
}

impl<O: QualityOracle> UniquenessJudge<O> {
    pub fn new(oracle: O, config: &OracleConfig) -> Self {
        Self {
            oracle,
            max_attempts: config.max_attempts(),
            timeout: config.timeout(),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub async fn evaluate(&self, theorem: &str) -> QualityVerdict {
        for attempt in 1..=self.max_attempts {
            match self.attempt(theorem).await {
                Ok(verdict) => {
                    tracing::debug!(
                        "Oracle verdict on attempt {}: unique = {}",
                        attempt,
                        verdict.has_single_definitive_answer
                    );
                    return verdict;
                }
                Err(e) if !e.is_retryable() => {
                    tracing::warn!("Oracle unusable ({}), rejecting theorem", e);
                    return QualityVerdict::rejected();
                }
                Err(e) => {
                    tracing::warn!("Oracle attempt {}/{} failed: {}", attempt, self.max_attempts, e);
                }
            }

            if attempt < self.max_attempts && !self.backoff.is_zero() {
                tokio::time::sleep(self.backoff * attempt).await;
            }
        }

        tracing::warn!(
            "Oracle gave no usable verdict after {} attempts, rejecting theorem",
            self.max_attempts
        );
        QualityVerdict::rejected()
    }

    async fn attempt(&self, theorem: &str) -> Result<QualityVerdict, OracleError> {
        let raw = tokio::time::timeout(self.timeout, self.oracle.request_verdict(theorem))
            .await
            .map_err(|_| OracleError::Timeout(self.timeout.as_secs()))??;
        parse_verdict(&raw)
    }
}
