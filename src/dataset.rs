// src/dataset.rs
//! Caller-side handling of the paper collection and the finished records.

use crate::models::{Paper, TheoremRecord};
use crate::utils::error::StorageError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Reads a JSONL file of papers. Blank lines are skipped.
pub fn load_papers<P: AsRef<Path>>(path: P) -> Result<Vec<Paper>, StorageError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let mut papers = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let paper: Paper = serde_json::from_str(line).map_err(|e| StorageError::InvalidRecord {
            line: idx + 1,
            reason: e.to_string(),
        })?;
        papers.push(paper);
    }

    tracing::info!("Loaded {} papers from {}", papers.len(), path.display());
    Ok(papers)
}

/// Keeps the first paper for each link. Papers without a link are all kept.
pub fn dedup_papers_by_link(papers: Vec<Paper>) -> Vec<Paper> {
    let original_size = papers.len();
    let mut seen = HashSet::new();
    let unique: Vec<Paper> = papers
        .into_iter()
        .filter(|paper| match &paper.paper_link {
            Some(link) => seen.insert(link.clone()),
            None => true,
        })
        .collect();

    if unique.len() < original_size {
        tracing::info!("Removed {} duplicate papers based on paper_link", original_size - unique.len());
    }
    unique
}

pub fn take_sample(mut papers: Vec<Paper>, sample: Option<usize>) -> Vec<Paper> {
    if let Some(n) = sample {
        papers.truncate(n);
        tracing::info!("Selected the first {} papers", papers.len());
    }
    papers
}

/// Drops records whose context was already seen and renumbers ids from 0.
pub fn dedup_records_by_context(records: Vec<TheoremRecord>) -> Vec<TheoremRecord> {
    let before = records.len();
    let mut seen = HashSet::new();
    let unique: Vec<TheoremRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.context.clone()))
        .enumerate()
        .map(|(id, record)| TheoremRecord { id, ..record })
        .collect();

    tracing::info!("Records before context dedup: {}, after: {}", before, unique.len());
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: usize, context: &str) -> TheoremRecord {
        TheoremRecord {
            id,
            paper_link: "p".to_string(),
            context: context.to_string(),
            theorem: format!("t{}", id),
            unique_answer_explanation: String::new(),
        }
    }

    #[test]
    fn test_load_papers_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.jsonl");
        fs::write(
            &path,
            "{\"full_text\": \"a\", \"paper_link\": \"http://x/1\"}\n\n{\"full_text\": \"b\"}\n",
        )
        .unwrap();
        let papers = load_papers(&path).unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].paper_link.as_deref(), Some("http://x/1"));
        assert_eq!(papers[1].link_or_index(1), "paper_1");
    }

    #[test]
    fn test_load_papers_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.jsonl");
        fs::write(&path, "{\"full_text\": \"a\"}\n{\"paper_link\": \"no text\"}\n").unwrap();
        match load_papers(&path) {
            Err(StorageError::InvalidRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_dedup_papers_by_link() {
        let papers = vec![
            Paper::new("1", Some("a".to_string())),
            Paper::new("2", Some("a".to_string())),
            Paper::new("3", None),
            Paper::new("4", None),
            Paper::new("5", Some("b".to_string())),
        ];
        let texts: Vec<String> = dedup_papers_by_link(papers).into_iter().map(|p| p.full_text).collect();
        assert_eq!(texts, vec!["1", "3", "4", "5"]);
    }

    #[test]
    fn test_take_sample() {
        let papers = vec![Paper::new("1", None), Paper::new("2", None)];
        assert_eq!(take_sample(papers.clone(), Some(1)).len(), 1);
        assert_eq!(take_sample(papers.clone(), Some(10)).len(), 2);
        assert_eq!(take_sample(papers, None).len(), 2);
    }

    #[test]
    fn test_dedup_records_by_context_renumbers() {
        let records = vec![record(0, "x"), record(1, "y"), record(2, "x"), record(3, "z")];
        let unique = dedup_records_by_context(records);
        let ids: Vec<usize> = unique.iter().map(|r| r.id).collect();
        let theorems: Vec<&str> = unique.iter().map(|r| r.theorem.as_str()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(theorems, vec!["t0", "t1", "t3"]);
    }
}
