// src/extractors/numbering.rs
//
// Number inference for theorems written without an explicit `[number]`.
// Each resolver looks at one kind of evidence; the chain stops at the first
// that produces a value, and the last resolver always does.

use once_cell::sync::Lazy;
use regex::Regex;

const NUMBER: &str = r"\d+(?:\.\d+)*";

static NUMBERED_LABEL_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"(?i)\\label\{{(?:theorem|thm)[:_\-]({NUMBER})"),
        format!(r"(?i)\\label\{{(?:th|theorem):?({NUMBER})"),
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\tag\{\s*\(?\s*([^})]+?)\s*\)?\s*\}").expect("Failed to compile TAG_RE")
});

// The first textual mention decides; a `Theorem \ref{..}` mention yields nothing
// and defers to the stricter patterns below.
static TEXT_REFERENCE_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)theorem[\s~]*(?:\\ref\{{[^}}]*\}}|({NUMBER}))"))
        .expect("Failed to compile TEXT_REFERENCE_FIRST_RE")
});

static TEXT_REFERENCE_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)theorem[\s~]*(\d+\.\d+)", r"(?i)theorem[\s~]*(\d+)"]
        .iter()
        .filter_map(|pat| Regex::new(pat).ok())
        .collect()
});

static LABEL_DIGITS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)").expect("Failed to compile LABEL_DIGITS_RE")
});

/// Everything a resolver may look at for one span.
#[derive(Debug, Clone)]
pub struct NumberingContext<'a> {
    /// Text surrounding the span, the span included.
    pub window: &'a str,
    pub label: Option<&'a str>,
    pub section_numbering: bool,
    pub section_number: Option<u32>,
    /// Per-environment counter, already incremented for this span.
    pub counter: u32,
}

pub type Resolver = fn(&NumberingContext<'_>) -> Option<String>;

/// Resolvers in priority order, named for logging.
pub const RESOLVER_CHAIN: &[(&str, Resolver)] = &[
    ("label-reference", from_label_reference),
    ("numbered-label", from_numbered_label),
    ("tag", from_tag),
    ("text-reference", from_text_reference),
    ("label-digits", from_label_digits),
    ("section-counter", from_section_counter),
    ("counter", from_counter),
];

/// Runs the chain and returns the first number found.
pub fn resolve_number(ctx: &NumberingContext<'_>) -> String {
    for (name, resolver) in RESOLVER_CHAIN {
        if let Some(number) = resolver(ctx) {
            tracing::trace!("Resolved theorem number '{}' via {}", number, name);
            return number;
        }
    }
    ctx.counter.to_string()
}

/// Up to `radius` characters on each side of `start..end`.
pub fn reference_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = if radius == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

/// `\ref{label}` immediately followed by a number.
pub fn from_label_reference(ctx: &NumberingContext<'_>) -> Option<String> {
    let label = ctx.label?;
    let re = Regex::new(&format!(r"(?i)\\ref\{{{}\}}\s*({NUMBER})", regex::escape(label))).ok()?;
    re.captures(ctx.window).map(|c| c[1].to_string())
}

/// A label key that embeds the number, e.g. `\label{thm:3.2}` or `\label{th4}`.
pub fn from_numbered_label(ctx: &NumberingContext<'_>) -> Option<String> {
    NUMBERED_LABEL_RE
        .iter()
        .find_map(|re| re.captures(ctx.window).map(|c| c[1].to_string()))
}

/// `\tag{...}` contents, parentheses dropped.
pub fn from_tag(ctx: &NumberingContext<'_>) -> Option<String> {
    TAG_RE
        .captures(ctx.window)
        .map(|c| c[1].trim().to_string())
        .filter(|tag| !tag.is_empty())
}

/// Prose such as "Theorem 3" or "theorem~2.1".
pub fn from_text_reference(ctx: &NumberingContext<'_>) -> Option<String> {
    if let Some(number) = TEXT_REFERENCE_FIRST_RE
        .captures(ctx.window)
        .and_then(|c| c.get(1).map(|m| m.as_str().to_string()))
    {
        return Some(number);
    }
    TEXT_REFERENCE_RE
        .iter()
        .find_map(|re| re.captures(ctx.window).map(|c| c[1].to_string()))
}

/// Digits inside the label itself, e.g. `main-result-2`.
pub fn from_label_digits(ctx: &NumberingContext<'_>) -> Option<String> {
    let label = ctx.label?;
    LABEL_DIGITS_RE.captures(label).map(|c| c[1].to_string())
}

pub fn from_section_counter(ctx: &NumberingContext<'_>) -> Option<String> {
    if !ctx.section_numbering {
        return None;
    }
    ctx.section_number
        .map(|section| format!("{}.{}", section, ctx.counter))
}

pub fn from_counter(ctx: &NumberingContext<'_>) -> Option<String> {
    Some(ctx.counter.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(window: &'a str, label: Option<&'a str>) -> NumberingContext<'a> {
        NumberingContext {
            window,
            label,
            section_numbering: false,
            section_number: None,
            counter: 7,
        }
    }

    #[test]
    fn test_label_reference() {
        let c = ctx(r"see \ref{main} 4.2 for details", Some("main"));
        assert_eq!(from_label_reference(&c), Some("4.2".to_string()));
        assert_eq!(from_label_reference(&ctx(r"\ref{main} 4.2", None)), None);
        assert_eq!(from_label_reference(&ctx(r"\ref{other} 4.2", Some("main"))), None);
    }

    #[test]
    fn test_label_reference_escapes_label() {
        let c = ctx(r"\ref{a.b} 3", Some("a.b"));
        assert_eq!(from_label_reference(&c), Some("3".to_string()));
        let c = ctx(r"\ref{axb} 3", Some("a.b"));
        assert_eq!(from_label_reference(&c), None);
    }

    #[test]
    fn test_numbered_label() {
        assert_eq!(from_numbered_label(&ctx(r"\label{thm:3.2}", None)), Some("3.2".to_string()));
        assert_eq!(from_numbered_label(&ctx(r"\label{theorem_5}", None)), Some("5".to_string()));
        assert_eq!(from_numbered_label(&ctx(r"\label{th:12}", None)), Some("12".to_string()));
        assert_eq!(from_numbered_label(&ctx(r"\label{Theorem4}", None)), Some("4".to_string()));
        assert_eq!(from_numbered_label(&ctx(r"\label{thm:main}", None)), None);
    }

    #[test]
    fn test_tag() {
        assert_eq!(from_tag(&ctx(r"x \tag{(A.3)} y", None)), Some("A.3".to_string()));
        assert_eq!(from_tag(&ctx(r"\tag{5}", None)), Some("5".to_string()));
        assert_eq!(from_tag(&ctx(r"no tags", None)), None);
    }

    #[test]
    fn test_text_reference() {
        assert_eq!(from_text_reference(&ctx("as in Theorem 3.", None)), Some("3".to_string()));
        assert_eq!(from_text_reference(&ctx("by theorem~2.1 we", None)), Some("2.1".to_string()));
        assert_eq!(from_text_reference(&ctx(r"\begin{theorem}x\end{theorem}", None)), None);
    }

    #[test]
    fn test_text_reference_skips_ref_mentions() {
        let c = ctx(r"Theorem~\ref{x} and later THEOREM 6", None);
        assert_eq!(from_text_reference(&c), Some("6".to_string()));
    }

    #[test]
    fn test_label_digits() {
        assert_eq!(from_label_digits(&ctx("", Some("main-result-2"))), Some("2".to_string()));
        assert_eq!(from_label_digits(&ctx("", Some("res1.4.2"))), Some("1.4".to_string()));
        assert_eq!(from_label_digits(&ctx("", Some("main"))), None);
    }

    #[test]
    fn test_section_counter_requires_mode_and_section() {
        let mut c = ctx("", None);
        c.section_number = Some(2);
        assert_eq!(from_section_counter(&c), None);
        c.section_numbering = true;
        assert_eq!(from_section_counter(&c), Some("2.7".to_string()));
        c.section_number = None;
        assert_eq!(from_section_counter(&c), None);
    }

    #[test]
    fn test_chain_priority() {
        // numbered label beats prose
        let c = ctx(r"Theorem 9 \label{thm:1}", None);
        assert_eq!(resolve_number(&c), "1");
        // nothing found falls back to the counter
        assert_eq!(resolve_number(&ctx("plain", None)), "7");
    }

    #[test]
    fn test_reference_window() {
        let text = "0123456789[span]abcdefghij";
        assert_eq!(reference_window(text, 10, 16, 3), "789[span]abc");
        assert_eq!(reference_window(text, 10, 16, 100), text);
        assert_eq!(reference_window(text, 10, 16, 0), "[span]");
    }

    #[test]
    fn test_reference_window_counts_characters() {
        let text = "ééé[x]ééé";
        let start = text.find('[').unwrap();
        let end = text.find(']').unwrap() + 1;
        assert_eq!(reference_window(text, start, end, 2), "éé[x]éé");
    }
}
