//! Text-generation backends for Daybrief
//!
//! Backend selection is an explicit tagged value from settings rather than
//! substring inspection of the model id; the model id string still travels
//! to the chosen backend verbatim.

pub mod base;
pub mod deepseek;
pub mod openai;

pub use base::TextGenerator;
pub use deepseek::DeepSeekGenerator;
pub use openai::OpenAiGenerator;

use crate::config::{AdviceSettings, Backend};
use crate::error::Result;

/// Create a generator instance for the configured backend
///
/// # Arguments
///
/// * `settings` - Advice settings carrying the selector, keys, and overrides
/// * `timeout_seconds` - Request timeout for the backend client
///
/// # Errors
///
/// Returns error if backend initialization fails
pub fn create_generator(
    settings: &AdviceSettings,
    timeout_seconds: u64,
) -> Result<Box<dyn TextGenerator>> {
    match settings.backend {
        Backend::OpenAi => Ok(Box::new(OpenAiGenerator::new(
            &settings.openai_api_key,
            timeout_seconds,
            settings.api_base.as_deref(),
        )?)),
        Backend::DeepSeek => Ok(Box::new(DeepSeekGenerator::new(
            &settings.deepseek_api_key,
            timeout_seconds,
            settings.api_base.as_deref(),
        )?)),
    }
}
