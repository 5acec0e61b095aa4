// src/extractors/sections.rs
use once_cell::sync::Lazy;
use regex::Regex;

// \section{Title} or \section[Short]{Title}
static SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\section\s*(?:\[.*?\])?\s*\{([^}]*)\}").expect("Failed to compile SECTION_RE")
});

// Leading integer in a title like "2. Main Results" or "3 Results"
static EXPLICIT_SECTION_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)[.\s]+").expect("Failed to compile EXPLICIT_SECTION_NUMBER_RE")
});

// Directives that make theorem numbers section-relative
static SECTION_NUMBERING_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\\numberwithin\{(?:theorem|thm)\}\{section\}",
        r"\\counterwithin\{(?:theorem|thm)\}\{section\}",
        r"\\renewcommand\{?\\the(?:theorem|thm)\}?\{\\thesection\s*\.\s*\\arabic\{(?:theorem|thm)\}\}",
        r"\\newtheorem\{theorem\}\{Theorem\}\[section\]",
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    /// Running counter; continues from the last explicit number.
    pub sequential_number: u32,
    /// Positive integer the title starts with, if any.
    pub explicit_number: Option<u32>,
    pub start_offset: usize,
    pub title: String,
}

impl SectionEntry {
    pub fn number(&self) -> u32 {
        self.explicit_number.unwrap_or(self.sequential_number)
    }
}

/// Finds every `\section` in document order and assigns its effective number.
pub fn build_section_index(latex: &str) -> Vec<SectionEntry> {
    let mut sections = Vec::new();
    let mut counter: u32 = 0;

    for caps in SECTION_RE.captures_iter(latex) {
        let Some(whole) = caps.get(0) else { continue };
        let title = caps[1].to_string();
        counter = counter.saturating_add(1);

        let explicit_number = EXPLICIT_SECTION_NUMBER_RE
            .captures(title.trim_start())
            .and_then(|c| c[1].parse::<u32>().ok())
            .filter(|n| *n > 0);

        sections.push(SectionEntry {
            sequential_number: counter,
            explicit_number,
            start_offset: whole.start(),
            title,
        });

        if let Some(n) = explicit_number {
            counter = n;
        }
    }

    tracing::debug!("Indexed {} sections", sections.len());
    sections
}

/// The last section starting strictly before `offset`.
pub fn enclosing_section(sections: &[SectionEntry], offset: usize) -> Option<&SectionEntry> {
    sections
        .iter()
        .take_while(|section| section.start_offset < offset)
        .last()
}

/// True when the document numbers theorems relative to sections.
pub fn uses_section_numbering(latex: &str) -> bool {
    SECTION_NUMBERING_RE.iter().any(|re| re.is_match(latex))
}
