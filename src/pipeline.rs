// src/pipeline.rs
use crate::config::ExtractorConfig;
use crate::extractors::appendix::truncate_at_appendix;
use crate::extractors::commands::harvest_custom_commands;
use crate::extractors::comments::strip_comments;
use crate::extractors::theorem::{TheoremExtractor, TheoremSpan};
use crate::models::{Paper, TheoremRecord};
use crate::oracle::{QualityOracle, UniquenessJudge};
use crate::utils::span_debug::save_debug_latex;
use std::path::PathBuf;

/// A paper after the lexical passes, before any oracle call.
#[derive(Debug, Clone)]
pub struct PreparedPaper {
    /// Comment-stripped, possibly appendix-truncated text; span offsets point into it.
    pub working_text: String,
    pub custom_commands: String,
    pub spans: Vec<TheoremSpan>,
}

/// A span the oracle accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeptTheorem {
    pub paper_link: String,
    pub display_label: String,
    pub context_text: String,
    pub theorem_body: String,
    pub explanation: String,
}

#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub paper_link: String,
    pub kept: Vec<KeptTheorem>,
    /// Every span found, accepted or not.
    pub total_spans: usize,
    pub custom_commands: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub records: Vec<TheoremRecord>,
    pub papers_processed: usize,
    pub total_spans: usize,
}

pub struct PaperPipeline<O> {
    extractor: TheoremExtractor,
    judge: UniquenessJudge<O>,
    skip_appendix: bool,
    debug_dir: Option<PathBuf>,
}

impl<O: QualityOracle> PaperPipeline<O> {
    pub fn new(judge: UniquenessJudge<O>, config: &ExtractorConfig) -> Self {
        Self {
            extractor: TheoremExtractor::new(config.reference_window),
            judge,
            skip_appendix: config.skip_appendix,
            debug_dir: None,
        }
    }

    /// Write an annotated working text per paper into `dir`.
    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    pub fn judge(&self) -> &UniquenessJudge<O> {
        &self.judge
    }

    /// Runs the lexical passes over one raw LaTeX source.
    ///
    /// A failure inside extraction is logged and yields no spans; it never
    /// propagates.
    pub fn prepare(&self, latex: &str) -> PreparedPaper {
        let custom_commands = harvest_custom_commands(latex);
        let stripped = strip_comments(latex);
        let working_text = if self.skip_appendix {
            truncate_at_appendix(&stripped).to_string()
        } else {
            stripped
        };

        let spans = match self.extractor.extract(&working_text) {
            Ok(spans) => spans,
            Err(e) => {
                tracing::error!("Theorem extraction failed, treating paper as empty: {}", e);
                Vec::new()
            }
        };

        PreparedPaper {
            working_text,
            custom_commands,
            spans,
        }
    }

    /// Extracts one paper and keeps the spans the oracle accepts.
    pub async fn process_paper(&self, latex: &str, paper_link: &str) -> ExtractionResult {
        let prepared = self.prepare(latex);
        self.judge_spans(prepared, paper_link).await
    }

    /// Processes papers in order. Record ids run from 0 across the whole batch.
    pub async fn process_papers(&self, papers: &[Paper]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (i, paper) in papers.iter().enumerate() {
            let paper_link = paper.link_or_index(i);
            tracing::info!("Processing paper {}/{}: {}", i + 1, papers.len(), paper_link);

            let prepared = self.prepare(&paper.full_text);
            if let Some(dir) = &self.debug_dir {
                let path = dir.join(format!("paper_{:05}.tex", i));
                if let Err(e) = save_debug_latex(&path, &prepared.working_text, &prepared.spans, &prepared.custom_commands) {
                    tracing::warn!("Failed to write debug output for {}: {}", paper_link, e);
                }
            }

            let result = self.judge_spans(prepared, &paper_link).await;
            outcome.papers_processed += 1;
            outcome.total_spans += result.total_spans;

            tracing::info!(
                "Found {} high-quality theorems out of {} total in {}",
                result.kept.len(),
                result.total_spans,
                paper_link
            );

            for kept in result.kept {
                outcome.records.push(TheoremRecord {
                    id: outcome.records.len(),
                    paper_link: kept.paper_link,
                    context: kept.context_text,
                    theorem: kept.theorem_body,
                    unique_answer_explanation: kept.explanation,
                });
            }

            tracing::info!(
                "Running totals - papers: {}, theorems found: {}, kept: {}",
                outcome.papers_processed,
                outcome.total_spans,
                outcome.records.len()
            );
        }

        outcome
    }

    async fn judge_spans(&self, prepared: PreparedPaper, paper_link: &str) -> ExtractionResult {
        let total_spans = prepared.spans.len();
        if total_spans == 0 {
            tracing::warn!("No theorems found in {}, skipping", paper_link);
        }

        let mut kept = Vec::new();
        for (i, span) in prepared.spans.iter().enumerate() {
            tracing::debug!("Judging {} ({}/{})", span.display_label, i + 1, total_spans);

            let verdict = self.judge.evaluate(&span.body).await;
            if !verdict.has_single_definitive_answer {
                tracing::debug!("{} has no single definitive answer, skipping", span.display_label);
                continue;
            }

            kept.push(KeptTheorem {
                paper_link: paper_link.to_string(),
                display_label: span.display_label.clone(),
                context_text: context_before(&prepared.working_text, span.start_offset),
                theorem_body: span.body.clone(),
                explanation: verdict.explanation,
            });
        }

        ExtractionResult {
            paper_link: paper_link.to_string(),
            kept,
            total_spans,
            custom_commands: prepared.custom_commands,
        }
    }
}

/// All text before `offset`, whitespace runs collapsed to single spaces.
pub fn context_before(text: &str, offset: usize) -> String {
    let end = offset.min(text.len());
    text.get(..end)
        .unwrap_or(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
