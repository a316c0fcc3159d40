//! OpenAI text-generation backend

use crate::error::{DaybriefError, Result};
use crate::providers::base::{ChatMessage, ChatRequest, ChatResponse, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Default OpenAI API base
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions backend
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    api_base: String,
}

impl OpenAiGenerator {
    /// Create a new OpenAI backend
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `timeout_seconds` - Request timeout
    /// * `api_base` - Optional base URL override (tests, proxies)
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(api_key: &str, timeout_seconds: u64, api_base: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent("daybrief/0.2.0")
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_base: api_base
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, system: &str, prompt: &str, model: &str) -> Result<String> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(
                DaybriefError::Generation(format!("OpenAI returned {}: {}", status, detail)).into(),
            );
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .first_content()
            .ok_or_else(|| DaybriefError::Generation("OpenAI response had no choices".to_string()).into())
    }

    fn name(&self) -> &str {
        "openai"
    }
}
