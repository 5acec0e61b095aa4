// src/models.rs
use serde::{Deserialize, Serialize};

/// One input paper. Only `full_text` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub full_text: String,
    #[serde(default)]
    pub paper_link: Option<String>,
}

impl Paper {
    pub fn new(full_text: impl Into<String>, paper_link: Option<String>) -> Self {
        Self {
            full_text: full_text.into(),
            paper_link,
        }
    }

    /// The paper's link, or a positional placeholder like `paper_3`.
    pub fn link_or_index(&self, index: usize) -> String {
        self.paper_link
            .clone()
            .unwrap_or_else(|| format!("paper_{}", index))
    }
}

/// One output row: a theorem the oracle judged to have a single definitive answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoremRecord {
    pub id: usize,
    pub paper_link: String,
    pub context: String,
    pub theorem: String,
    pub unique_answer_explanation: String,
}

/// Totals for one run, written next to the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub papers_processed: usize,
    pub total_theorems: usize,
    pub unique_theorems: usize,
    pub records_written: usize,
    pub model: String,
    pub skip_appendix: bool,
}
