//! DeepSeek text-generation backend
//!
//! DeepSeek exposes an OpenAI-compatible chat-completions endpoint, so
//! this backend reuses the shared wire structs and differs only in its
//! base URL and credential.

use crate::error::{DaybriefError, Result};
use crate::providers::base::{ChatMessage, ChatRequest, ChatResponse, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Default DeepSeek API base
const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";

/// DeepSeek chat-completions backend
pub struct DeepSeekGenerator {
    client: Client,
    api_key: String,
    api_base: String,
}

impl DeepSeekGenerator {
    /// Create a new DeepSeek backend
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
impl TextGenerator for DeepSeekGenerator {
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
            return Err(DaybriefError::Generation(format!(
                "DeepSeek returned {}: {}",
                status, detail
            ))
            .into());
        }

        let parsed: ChatResponse = response.json().await?;
        parsed.first_content().ok_or_else(|| {
            DaybriefError::Generation("DeepSeek response had no choices".to_string()).into()
        })
    }

    fn name(&self) -> &str {
        "deepseek"
    }
}
