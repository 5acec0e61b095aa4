// src/extractors/comments.rs
use once_cell::sync::Lazy;
use regex::Regex;

// A `%` that is not escaped, through to (not including) the end of the line.
// The leading group keeps the character before the marker so it can be put back.
static LINE_COMMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^\\])%[^\n]*").expect("Failed to compile LINE_COMMENT_RE")
});

// Two or more line breaks with only whitespace in between.
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n+").expect("Failed to compile BLANK_RUN_RE")
});

/// Removes LaTeX line comments, keeping `\%` literal, then collapses runs of
/// blank lines into a single blank line.
///
/// The line break that ends a comment is kept, so a comment-only line becomes an
/// empty line. A comment on the last line without a trailing newline runs to the
/// end of the input.
pub fn strip_comments(latex: &str) -> String {
    let without_comments = LINE_COMMENT_RE.replace_all(latex, "$1");
    BLANK_RUN_RE
        .replace_all(&without_comments, "\n\n")
        .into_owned()
}
