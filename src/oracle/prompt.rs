// src/oracle/prompt.rs

pub const SYSTEM_PROMPT_THEOREM_QUALITY: &str = "You are a strict reviewer of mathematical statements. \
You decide whether a theorem, as written, asserts a single, definitive answer: a specific value, \
object, classification or closed-form result that could be checked against a reference solution. \
Statements that only assert existence, give bounds without a definite value, depend on unstated \
notation, or admit several reasonable readings are not unique. \
Always reply with a single JSON object and nothing else.";

/// User message asking for a verdict on one theorem body.
pub fn uniqueness_prompt(theorem: &str) -> String {
    format!(
        r#"Please evaluate this mathematical theorem and determine if it has a single, definitive answer:

{theorem}

Be very strict: if there is any ambiguity, treat it as non-unique.
Return exactly this JSON object:
{{
    "single_unique_answer": "true" if the theorem has a single, definitive answer, otherwise "false",
    "explanation": "why the theorem has a single, definitive answer, otherwise an empty string"
}}"#
    )
}
