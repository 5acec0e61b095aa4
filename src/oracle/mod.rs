// src/oracle/mod.rs
//! The quality oracle: an external classifier that decides whether a theorem
//! states a single, definitive answer.

pub mod client;
pub mod judge;
pub mod mock;
pub mod models;
pub mod prompt;

use crate::utils::error::OracleError;

pub use client::OpenAiOracle;
pub use judge::UniquenessJudge;
pub use mock::MockOracle;
pub use models::{parse_verdict, QualityVerdict};

/// Request/response contract of the oracle.
///
/// Implementations return the model's raw reply; parsing and the retry policy
/// live in [`UniquenessJudge`].
#[allow(async_fn_in_trait)]
pub trait QualityOracle {
    async fn request_verdict(&self, theorem: &str) -> Result<String, OracleError>;
}
