// src/extractors/theorem.rs
use crate::extractors::environments::{EnvironmentCatalog, EnvironmentPatterns};
use crate::extractors::numbering::{reference_window, resolve_number, NumberingContext};
use crate::extractors::sections::{build_section_index, enclosing_section, uses_section_numbering, SectionEntry};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Characters searched on each side of a span when inferring its number.
pub const DEFAULT_REFERENCE_WINDOW: usize = 1000;

static LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\label\{(.*?)\}").expect("Failed to compile LABEL_RE")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TheoremSpan {
    pub environment_name: String,
    pub label: Option<String>,   // \label{...} key, if the body had one
    pub display_label: String,   // e.g. "Theorem 2.1"
    pub body: String,            // trimmed body with the \label removed
    pub start_offset: usize,     // offset of \begin in the working text
    pub end_offset: usize,       // offset just past \end{...}
}

pub struct TheoremExtractor {
    reference_window: usize,
}

impl Default for TheoremExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_WINDOW)
    }
}

impl TheoremExtractor {
    pub fn new(reference_window: usize) -> Self {
        Self { reference_window }
    }

    /// Finds every theorem-like span in `text`.
    ///
    /// Explicitly numbered spans are collected first, then the unnumbered pass runs.
    /// Spans sharing an end offset are dropped after their first occurrence and the
    /// result is ordered by start offset. All offsets refer to `text`.
    pub fn extract(&self, text: &str) -> Result<Vec<TheoremSpan>, ExtractError> {
        let section_numbering = uses_section_numbering(text);
        let sections = build_section_index(text);
        let catalog = EnvironmentCatalog::discover(text);
        let patterns = catalog.compile()?;

        tracing::debug!(
            "Extracting with {} environments, {} sections, section numbering: {}",
            patterns.len(),
            sections.len(),
            section_numbering
        );

        let mut spans = extract_numbered(text, &patterns);
        let explicit_count = spans.len();
        spans.extend(self.extract_unnumbered(text, &patterns, &sections, section_numbering));
        let found = spans.len();

        let spans = dedup_and_sort(spans);
        if spans.len() < found {
            tracing::debug!("Removed {} duplicate spans", found - spans.len());
        }
        tracing::debug!("Extracted {} spans ({} explicitly numbered)", spans.len(), explicit_count);
        Ok(spans)
    }

    fn extract_unnumbered(
        &self,
        text: &str,
        patterns: &[EnvironmentPatterns],
        sections: &[SectionEntry],
        section_numbering: bool,
    ) -> Vec<TheoremSpan> {
        let mut counters: HashMap<&str, u32> = HashMap::new();
        let mut results = Vec::new();

        for env in patterns {
            let env_name = env.descriptor.environment_name.as_str();
            for caps in env.unnumbered.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                let (start, end) = (whole.start(), whole.end());
                let (label, body) = split_label(&caps[1]);

                let counter = counters.entry(env_name).or_insert(0);
                *counter += 1;

                let ctx = NumberingContext {
                    window: reference_window(text, start, end, self.reference_window),
                    label: label.as_deref(),
                    section_numbering,
                    section_number: enclosing_section(sections, start).map(SectionEntry::number),
                    counter: *counter,
                };
                let number = resolve_number(&ctx);

                results.push(TheoremSpan {
                    environment_name: env_name.to_string(),
                    label,
                    display_label: format!("{} {}", env.descriptor.display_name, number),
                    body,
                    start_offset: start,
                    end_offset: end,
                });
            }
        }

        results
    }
}

/// `\begin{env}[number] ... \end{env}` spans; the bracket contents are the number.
fn extract_numbered(text: &str, patterns: &[EnvironmentPatterns]) -> Vec<TheoremSpan> {
    let mut results = Vec::new();

    for env in patterns {
        for caps in env.numbered.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let number = caps[1].trim();
            if number.contains("\\end{") {
                continue;
            }
            let (label, body) = split_label(&caps[2]);

            results.push(TheoremSpan {
                environment_name: env.descriptor.environment_name.clone(),
                label,
                display_label: format!("{} {}", env.descriptor.display_name, number),
                body,
                start_offset: whole.start(),
                end_offset: whole.end(),
            });
        }
    }

    results
}

/// Pulls the first `\label{...}` out of a body and trims what is left.
fn split_label(raw_body: &str) -> (Option<String>, String) {
    match LABEL_RE.captures(raw_body) {
        Some(caps) => {
            let label = caps[1].to_string();
            let body = raw_body.replace(&caps[0], "").trim().to_string();
            (Some(label), body)
        }
        None => (None, raw_body.trim().to_string()),
    }
}

/// Keeps the first span for each end offset and each start offset, then
/// orders by start offset.
pub fn dedup_and_sort(spans: Vec<TheoremSpan>) -> Vec<TheoremSpan> {
    let mut seen_ends = HashSet::new();
    let mut seen_starts = HashSet::new();
    let mut unique: Vec<TheoremSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if seen_ends.contains(&span.end_offset) || seen_starts.contains(&span.start_offset) {
            continue;
        }
        seen_ends.insert(span.end_offset);
        seen_starts.insert(span.start_offset);
        unique.push(span);
    }
    unique.sort_by_key(|span| span.start_offset);
    unique
}
