// src/extractors/environments.rs
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const BUILTIN_ENVIRONMENT: &str = "theorem";
pub const BUILTIN_DISPLAY_NAME: &str = "Theorem";

// \newtheorem{name}{Display}, also with a shared counter: \newtheorem{name}[counter]{Display}
static NEWTHEOREM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\newtheorem\{([^}]+)\}(?:\[[^\]]*\])?\{([^}]+)\}")
        .expect("Failed to compile NEWTHEOREM_RE")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDescriptor {
    pub environment_name: String,
    pub display_name: String,
}

/// Compiled matchers for one environment.
#[derive(Debug, Clone)]
pub struct EnvironmentPatterns {
    pub descriptor: EnvironmentDescriptor,
    /// `\begin{env} body \end{env}`; group 1 is the body.
    pub unnumbered: Regex,
    /// `\begin{env}[number] body \end{env}`; group 1 is the number, group 2 the body.
    /// The number stays on one line and holds no brackets.
    pub numbered: Regex,
}

/// The theorem-like environments of one document, in discovery order.
#[derive(Debug, Clone)]
pub struct EnvironmentCatalog {
    environments: Vec<EnvironmentDescriptor>,
}

impl EnvironmentCatalog {
    /// Builds the catalog: the built-in `theorem` environment first, then every
    /// `\newtheorem` declaration whose name or display string mentions "theorem".
    /// The first entry for a given environment name wins.
    pub fn discover(latex: &str) -> Self {
        let mut environments = vec![EnvironmentDescriptor {
            environment_name: BUILTIN_ENVIRONMENT.to_string(),
            display_name: BUILTIN_DISPLAY_NAME.to_string(),
        }];

        for caps in NEWTHEOREM_RE.captures_iter(latex) {
            let name = caps[1].trim();
            let display_str = caps[2].trim();
            if name.is_empty() || !is_theorem_like(name, display_str) {
                continue;
            }
            if environments.iter().any(|env| env.environment_name == name) {
                continue;
            }
            tracing::debug!("Found custom theorem environment '{}' ({})", name, display_str);
            environments.push(EnvironmentDescriptor {
                environment_name: name.to_string(),
                display_name: display_str.to_string(),
            });
        }

        Self { environments }
    }

    pub fn environments(&self) -> &[EnvironmentDescriptor] {
        &self.environments
    }

    /// Compiles the pattern pair for every environment.
    pub fn compile(&self) -> Result<Vec<EnvironmentPatterns>, ExtractError> {
        self.environments
            .iter()
            .map(|descriptor| -> Result<EnvironmentPatterns, ExtractError> {
                let name = regex::escape(&descriptor.environment_name);
                let unnumbered = Regex::new(&format!(
                    r"(?s)\\begin\{{{name}\}}(.*?)\\end\{{{name}\}}"
                ))?;
                let numbered = Regex::new(&format!(
                    r"(?s)\\begin\{{{name}\}}\[([^\[\]\n]+)\](.*?)\\end\{{{name}\}}"
                ))?;
                Ok(EnvironmentPatterns {
                    descriptor: descriptor.clone(),
                    unnumbered,
                    numbered,
                })
            })
            .collect()
    }
}

fn is_theorem_like(name: &str, display: &str) -> bool {
    name.to_lowercase().contains("theorem") || display.to_lowercase().contains("theorem")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display_name<'a>(catalog: &'a EnvironmentCatalog, name: &str) -> Option<&'a str> {
        catalog
            .environments()
            .iter()
            .find(|env| env.environment_name == name)
            .map(|env| env.display_name.as_str())
    }

    #[test]
    fn test_builtin_always_present() {
        let catalog = EnvironmentCatalog::discover("no declarations here");
        assert_eq!(catalog.environments().len(), 1);
        assert_eq!(catalog.environments()[0].environment_name, "theorem");
        assert_eq!(display_name(&catalog, "theorem"), Some("Theorem"));
    }

    #[test]
    fn test_custom_by_name_or_display() {
        let text = r"\newtheorem{mainTheorem}{Main Result}
\newtheorem{thm}{Theorem}
\newtheorem{lemma}{Lemma}
\newtheorem{keythm}[theorem]{Key THEOREM}";
        let catalog = EnvironmentCatalog::discover(text);
        let names: Vec<&str> = catalog
            .environments()
            .iter()
            .map(|env| env.environment_name.as_str())
            .collect();
        assert_eq!(names, vec!["theorem", "mainTheorem", "thm", "keythm"]);
        assert_eq!(display_name(&catalog, "mainTheorem"), Some("Main Result"));
        assert_eq!(display_name(&catalog, "keythm"), Some("Key THEOREM"));
    }

    #[test]
    fn test_duplicate_declarations_collapse() {
        let text = r"\newtheorem{thm}{Theorem}\newtheorem{thm}{Other Theorem}\newtheorem{theorem}{My Theorem}";
        let catalog = EnvironmentCatalog::discover(text);
        assert_eq!(catalog.environments().len(), 2);
        assert_eq!(display_name(&catalog, "thm"), Some("Theorem"));
        assert_eq!(display_name(&catalog, "theorem"), Some("Theorem"));
    }

    #[test]
    fn test_compiled_patterns_match() {
        let catalog = EnvironmentCatalog::discover(r"\newtheorem{thm*}{Theorem}");
        let patterns = catalog.compile().unwrap();
        assert_eq!(patterns.len(), 2);

        let star = &patterns[1];
        let text = "\\begin{thm*}[3]\nA\n\\end{thm*} \\begin{thm*}B\\end{thm*}";
        let numbered: Vec<_> = star.numbered.captures_iter(text).collect();
        assert_eq!(numbered.len(), 1);
        assert_eq!(&numbered[0][1], "3");
        assert_eq!(&numbered[0][2], "\nA\n");
        assert_eq!(star.unnumbered.find_iter(text).count(), 2);
    }

    #[test]
    fn test_numbered_bracket_cannot_span_environments() {
        let patterns = EnvironmentCatalog::discover("").compile().unwrap();
        let text = r"\begin{theorem}[Main \end{theorem} text \begin{theorem}[2] B\end{theorem}";
        let numbered: Vec<_> = patterns[0].numbered.captures_iter(text).collect();
        assert_eq!(numbered.len(), 1);
        assert_eq!(&numbered[0][1], "2");
        assert!(!patterns[0].numbered.is_match("\\begin{theorem}[1\n]x\\end{theorem}"));
    }

    #[test]
    fn test_unnumbered_is_non_greedy() {
        let patterns = EnvironmentCatalog::discover("").compile().unwrap();
        let text = r"\begin{theorem}A\end{theorem} x \begin{theorem}B\end{theorem}";
        let bodies: Vec<String> = patterns[0]
            .unnumbered
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(bodies, vec!["A", "B"]);
    }
}
