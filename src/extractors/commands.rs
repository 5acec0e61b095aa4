// src/extractors/commands.rs
use once_cell::sync::Lazy;
use regex::Regex;

// Macro declaration shapes worth keeping as context for a theorem.
static COMMAND_DEFINITION_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\\newcommand\{\\[^}]+\}(?:\[\d+\])?\{[^}]+\}",
        r"\\DeclareMathOperator\*?\{\\[^}]+\}\{[^}]+\}",
        r"\\def\\[A-Za-z0-9]+(?:\[[^\]]*\])?\{[^}]+\}",
        r"\\renewcommand\{\\[^}]+\}(?:\[\d+\])?\{[^}]+\}",
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

/// Collects custom macro and operator definitions, one per line, in the order
/// they appear in the document. Purely informational; the input is not changed.
pub fn harvest_custom_commands(latex: &str) -> String {
    let mut found: Vec<(usize, &str)> = COMMAND_DEFINITION_RE
        .iter()
        .flat_map(|re| re.find_iter(latex).map(|m| (m.start(), m.as_str())))
        .collect();
    found.sort_by_key(|(start, _)| *start);

    tracing::debug!("Harvested {} custom command definitions", found.len());
    found
        .into_iter()
        .map(|(_, def)| def)
        .collect::<Vec<_>>()
        .join("\n")
}
