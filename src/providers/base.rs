//! Base trait for text-generation backends
//!
//! The Advice Generator only needs one operation: turn a system
//! instruction plus a single user prompt into a text blob. Both supported
//! backends speak the OpenAI-compatible chat-completions wire format, so
//! the shared request/response structs live here too.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for one system instruction and one user prompt
    ///
    /// # Arguments
    ///
    /// * `system` - Fixed system instruction
    /// * `prompt` - Single user-role prompt string
    /// * `model` - Model identifier, passed through verbatim
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a
    /// response with no content
    async fn generate(&self, system: &str, prompt: &str, model: &str) -> Result<String>;

    /// Human-readable backend name for logging
    fn name(&self) -> &str;
}

/// Chat-completions request body
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// One chat message
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completions response body
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One response choice
#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessage,
}

impl ChatResponse {
    /// Content of the first choice, if any
    pub fn first_content(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}
