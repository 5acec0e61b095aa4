// src/oracle/models.rs
use crate::utils::error::OracleError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for an OpenAI-compatible chat completion
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self { kind: "json_object".to_string() }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// The oracle's judgement of one theorem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityVerdict {
    pub has_single_definitive_answer: bool,
    pub explanation: String,
}

impl QualityVerdict {
    /// Verdict used when the oracle never produced a usable answer.
    pub fn rejected() -> Self {
        Self {
            has_single_definitive_answer: false,
            explanation: String::new(),
        }
    }
}

/// Parses `{"single_unique_answer": ..., "explanation": ...}` out of a model reply.
///
/// Both keys are required. The answer may be a JSON boolean or the strings
/// "true"/"false" in any case; any other value counts as malformed.
pub fn parse_verdict(raw: &str) -> Result<QualityVerdict, OracleError> {
    let json_str = strip_code_fence(raw);
    let json: Value = serde_json::from_str(json_str)
        .map_err(|e| OracleError::MalformedResponse(format!("JSON parse error: {}", e)))?;

    let answer = json
        .get("single_unique_answer")
        .ok_or_else(|| OracleError::MalformedResponse("missing 'single_unique_answer'".to_string()))?;
    let has_single_definitive_answer = match answer {
        Value::Bool(b) => *b,
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => true,
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => false,
        other => {
            return Err(OracleError::MalformedResponse(format!(
                "unexpected 'single_unique_answer' value: {}",
                other
            )))
        }
    };

    let explanation = json
        .get("explanation")
        .ok_or_else(|| OracleError::MalformedResponse("missing 'explanation'".to_string()))?;
    let explanation = match explanation {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    Ok(QualityVerdict {
        has_single_definitive_answer,
        explanation,
    })
}

// Models sometimes wrap JSON in a markdown code block.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_answers() {
        let v = parse_verdict(r#"{"single_unique_answer": "true", "explanation": "Closed form."}"#).unwrap();
        assert!(v.has_single_definitive_answer);
        assert_eq!(v.explanation, "Closed form.");

        let v = parse_verdict(r#"{"single_unique_answer": "FALSE", "explanation": ""}"#).unwrap();
        assert!(!v.has_single_definitive_answer);
    }

    #[test]
    fn test_boolean_answer() {
        let v = parse_verdict(r#"{"single_unique_answer": false, "explanation": "Existence only."}"#).unwrap();
        assert!(!v.has_single_definitive_answer);
    }

    #[test]
    fn test_missing_keys_are_malformed() {
        assert!(matches!(
            parse_verdict(r#"{"single_unique_answer": "true"}"#),
            Err(OracleError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_verdict(r#"{"explanation": "x"}"#),
            Err(OracleError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_unexpected_answer_value_is_malformed() {
        assert!(parse_verdict(r#"{"single_unique_answer": "maybe", "explanation": ""}"#).is_err());
        assert!(parse_verdict("not json at all").is_err());
    }

    #[test]
    fn test_code_fenced_reply() {
        let raw = "```json\n{\"single_unique_answer\": true, \"explanation\": \"ok\"}\n```";
        assert!(parse_verdict(raw).unwrap().has_single_definitive_answer);
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
            response_format: ResponseFormat::json_object(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "{}"}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.choices[0].message.content.as_deref(), Some("{}"));
    }
}
