// src/extractors/appendix.rs
use once_cell::sync::Lazy;
use regex::Regex;

// Anything that starts back matter: the \appendix switch, appendix environments,
// and section/part headings titled Appendix or Appendices.
static APPENDIX_MARKER_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\\appendix(?:[^a-z]|$)",
        r"(?i)\\begin\{appendi(?:x|ces)\}",
        r"(?i)\\section\*?\s*(?:\[[^\]]*\])?\s*\{[^}]*appendi(?:x|ces)[^}]*\}",
        r"(?i)\\part\*?\s*(?:\[[^\]]*\])?\s*\{[^}]*appendi(?:x|ces)[^}]*\}",
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

/// Offset of the earliest appendix marker, if the document has one.
pub fn find_appendix_start(latex: &str) -> Option<usize> {
    APPENDIX_MARKER_RE
        .iter()
        .filter_map(|re| re.find(latex).map(|m| m.start()))
        .min()
}

/// Cuts the text at the earliest appendix marker. Text without a marker is
/// returned whole.
pub fn truncate_at_appendix(latex: &str) -> &str {
    match find_appendix_start(latex) {
        Some(start) => {
            tracing::debug!("Truncating at appendix marker (offset {} of {})", start, latex.len());
            &latex[..start]
        }
        None => latex,
    }
}
