// src/utils/error.rs
use thiserror::Error;

// Errors raised while talking to the quality oracle. None of these are fatal:
// the judge spends one attempt per error and falls back to a rejection.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("Oracle rate limit exceeded")]
    RateLimited,

    #[error("Oracle rejected the API key")]
    Unauthorized,

    #[error("Oracle call timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),

    #[error("No API key configured for the oracle")]
    MissingApiKey,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Oracle interaction failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}

impl OracleError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, OracleError::Unauthorized | OracleError::MissingApiKey)
    }
}
