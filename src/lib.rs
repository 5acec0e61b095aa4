// src/lib.rs
//! Locates theorem-like statements in raw LaTeX sources, labels them, and keeps
//! the ones an external quality oracle judges to have a single definitive answer.

pub mod config;
pub mod dataset;
pub mod extractors;
pub mod models;
pub mod oracle;
pub mod pipeline;
pub mod storage;
pub mod utils;

pub use config::{AppConfig, ExtractorConfig, OracleConfig};
pub use extractors::{TheoremExtractor, TheoremSpan};
pub use models::{Paper, RunSummary, TheoremRecord};
pub use oracle::{MockOracle, OpenAiOracle, QualityOracle, QualityVerdict, UniquenessJudge};
pub use pipeline::{BatchOutcome, ExtractionResult, KeptTheorem, PaperPipeline};
pub use utils::AppError;
