// src/oracle/client.rs
use crate::config::OracleConfig;
use crate::oracle::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat};
use crate::oracle::prompt::{uniqueness_prompt, SYSTEM_PROMPT_THEOREM_QUALITY};
use crate::oracle::QualityOracle;
use crate::utils::error::OracleError;

/// Quality oracle backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiOracle {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl OpenAiOracle {
    /// Builds the client from configuration. The API key must already be injected.
    pub fn new(config: &OracleConfig) -> Result<Self, OracleError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(OracleError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    fn build_request(&self, theorem: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT_THEOREM_QUALITY),
                ChatMessage::user(uniqueness_prompt(theorem)),
            ],
            response_format: ResponseFormat::json_object(),
        }
    }
}

impl QualityOracle for OpenAiOracle {
    async fn request_verdict(&self, theorem: &str) -> Result<String, OracleError> {
        let url = self.completions_url();
        tracing::debug!("Requesting verdict from {} ({} chars)", url, theorem.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(theorem))
            .send()
            .await?; // Propagates reqwest::Error as OracleError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Oracle returned HTTP {} for {}", status, url);
            if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
                return Err(OracleError::Unauthorized);
            }
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(OracleError::RateLimited);
            }
            return Err(OracleError::Http(status));
        }

        let body: ChatCompletionResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::MalformedResponse("response has no message content".to_string()))
    }
}
