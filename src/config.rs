//! Configuration management for Daybrief
//!
//! Two layers of configuration exist. `Settings` holds service-level
//! credentials and endpoints (configuration store, weather, email, text
//! generation) and is loaded once per run from a YAML file plus environment
//! overrides. `UserConfig` holds the per-user parameters and is built fresh
//! each run from the configuration store by `notion::users`.

use crate::error::{DaybriefError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Sentinel identifier for config records whose user id could not be resolved
pub const MISSING_USER_ID: &str = "MISSING_USER_ID";

/// Service-level settings for one batch run
///
/// Per-user parameters (tokens, databases, recipients) live in the
/// configuration store, not here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Configuration-store access (Notion)
    #[serde(default)]
    pub notion: NotionSettings,

    /// Weather provider access (OpenWeather)
    #[serde(default)]
    pub weather: WeatherSettings,

    /// Transactional email provider access (Mailgun)
    #[serde(default)]
    pub mailgun: MailgunSettings,

    /// Text-generation backend selection and credentials
    #[serde(default)]
    pub advice: AdviceSettings,

    /// HTTP client behavior
    #[serde(default)]
    pub http: HttpSettings,
}

/// Notion configuration-store settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotionSettings {
    /// Integration token for the configuration store
    #[serde(default)]
    pub token: String,

    /// Database id holding one row per configured user
    #[serde(default)]
    pub users_database_id: String,

    /// Optional API base URL override (useful for tests and local mocks)
    #[serde(default)]
    pub api_base: Option<String>,
}

/// OpenWeather settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherSettings {
    /// OpenWeather API key; empty means weather is degraded to "not available"
    #[serde(default)]
    pub api_key: String,

    /// Optional API base URL override
    #[serde(default)]
    pub api_base: Option<String>,
}

/// Mailgun settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailgunSettings {
    /// Mailgun API key
    #[serde(default)]
    pub api_key: String,

    /// Mailgun sending domain
    #[serde(default)]
    pub domain: String,

    /// Display name used in the From header
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Optional API base URL override
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_from_name() -> String {
    "Daybrief".to_string()
}

impl Default for MailgunSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            domain: String::new(),
            from_name: default_from_name(),
            api_base: None,
        }
    }
}

/// Text-generation backend family
///
/// Backend selection is an explicit tagged value supplied by configuration;
/// the per-user model id string travels to the chosen backend verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// OpenAI chat-completions API
    #[default]
    OpenAi,
    /// DeepSeek chat-completions API
    DeepSeek,
}

impl Backend {
    /// Parse a backend name as used in settings and environment overrides
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "deepseek" => Some(Self::DeepSeek),
            _ => None,
        }
    }
}

/// Advice generation settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdviceSettings {
    /// Which backend family handles generation for this run
    #[serde(default)]
    pub backend: Backend,

    /// OpenAI API key
    #[serde(default)]
    pub openai_api_key: String,

    /// DeepSeek API key
    #[serde(default)]
    pub deepseek_api_key: String,

    /// Optional API base URL override for the chosen backend
    #[serde(default)]
    pub api_base: Option<String>,
}

/// HTTP client settings shared by all external calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file, then apply environment overrides
    ///
    /// A missing file is not an error; defaults are used and the environment
    /// supplies credentials. A present-but-malformed file is an error.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut settings = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&contents).map_err(DaybriefError::Yaml)?
        } else {
            tracing::debug!("Settings file {} not found, using defaults", path.display());
            Settings::default()
        };
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Apply environment-variable overrides on top of file values
    ///
    /// Environment always wins over the file so deployments can keep secrets
    /// out of the settings file entirely.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DAYBRIEF_NOTION_TOKEN") {
            self.notion.token = v;
        }
        if let Ok(v) = std::env::var("DAYBRIEF_USERS_DATABASE_ID") {
            self.notion.users_database_id = v;
        }
        if let Ok(v) = std::env::var("OPENWEATHER_API_KEY") {
            self.weather.api_key = v;
        }
        if let Ok(v) = std::env::var("MAILGUN_API_KEY") {
            self.mailgun.api_key = v;
        }
        if let Ok(v) = std::env::var("MAILGUN_DOMAIN") {
            self.mailgun.domain = v;
        }
        if let Ok(v) = std::env::var("OPENAI_API_KEY") {
            self.advice.openai_api_key = v;
        }
        if let Ok(v) = std::env::var("DEEPSEEK_API_KEY") {
            self.advice.deepseek_api_key = v;
        }
        if let Ok(v) = std::env::var("DAYBRIEF_BACKEND") {
            match Backend::parse(&v) {
                Some(backend) => self.advice.backend = backend,
                None => tracing::warn!("Unknown DAYBRIEF_BACKEND value '{}', keeping {:?}", v, self.advice.backend),
            }
        }
    }

    /// Validate that the run can reach its configuration store
    ///
    /// Weather, generation, and email credentials are deliberately not
    /// required here: their absence degrades the relevant stage instead of
    /// failing the batch.
    ///
    /// # Errors
    ///
    /// Returns error if the Notion token or users database id is missing.
    pub fn validate(&self) -> Result<()> {
        if self.notion.token.is_empty() {
            return Err(DaybriefError::Settings(
                "Notion token is required (notion.token or DAYBRIEF_NOTION_TOKEN)".to_string(),
            )
            .into());
        }
        if self.notion.users_database_id.is_empty() {
            return Err(DaybriefError::Settings(
                "users database id is required (notion.users_database_id or DAYBRIEF_USERS_DATABASE_ID)"
                    .to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Per-user configuration, one row of the configuration store
///
/// Constructed fresh each run; never persisted or mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    /// Opaque unique user identifier
    pub user_id: String,
    /// Display name used in the greeting
    pub user_name: String,
    /// Profession, fed into the advice prompt
    pub career: String,
    /// Free-text location for the weather lookup
    pub location: String,
    /// Free-text scheduling preference, fed into the advice prompt
    pub schedule_prompt: String,
    /// Signed UTC offset in whole hours
    pub utc_offset_hours: i32,
    /// Model identifier passed to the text-generation backend
    pub model: String,
    /// Per-user Notion token for the task/event databases
    pub notion_token: String,
    /// Task database id
    pub task_database_id: String,
    /// Optional event database id; event fetching runs only when present
    pub event_database_id: Option<String>,
    /// Recipient email address
    pub email_receiver: String,
    /// Email subject template; the local date is appended at send time
    pub email_title: String,
}

/// Field names required in every configuration-store row
///
/// `TIME_ZONE` is listed as required-present but tolerates unparsable
/// values (defaulting to UTC with a warning). `USER_EVENT_DATABASE_ID`
/// is optional and deliberately absent from this list.
pub const REQUIRED_FIELDS: [&str; 10] = [
    "USER_NAME",
    "USER_CAREER",
    "PRESENT_LOCATION",
    "SCHEDULE_PROMPT",
    "TIME_ZONE",
    "GPT_VERSION",
    "USER_NOTION_TOKEN",
    "USER_DATABASE_ID",
    "EMAIL_RECEIVER",
    "EMAIL_TITLE",
];

impl UserConfig {
    /// Build a user config from the extracted field map of one store row
    ///
    /// # Arguments
    ///
    /// * `user_id` - Resolved identifier for the row
    /// * `fields` - Field name to extracted text value
    ///
    /// # Errors
    ///
    /// Returns the list of missing required field names when the row is
    /// incomplete; callers skip such rows with a warning.
    pub fn from_fields(
        user_id: &str,
        fields: &HashMap<String, String>,
    ) -> std::result::Result<Self, Vec<String>> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|key| fields.get(**key).map(String::as_str).unwrap_or("").is_empty())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let field = |key: &str| fields.get(key).cloned().unwrap_or_default();

        let raw_offset = field("TIME_ZONE");
        let utc_offset_hours = match raw_offset.trim().parse::<i32>() {
            Ok(hours) => hours,
            Err(_) => {
                tracing::warn!(
                    "User {}: unparsable TIME_ZONE '{}', defaulting to UTC",
                    user_id,
                    raw_offset
                );
                0
            }
        };

        let event_database_id = fields
            .get("USER_EVENT_DATABASE_ID")
            .filter(|id| !id.is_empty())
            .cloned();

        Ok(Self {
            user_id: user_id.to_string(),
            user_name: field("USER_NAME"),
            career: field("USER_CAREER"),
            location: field("PRESENT_LOCATION"),
            schedule_prompt: field("SCHEDULE_PROMPT"),
            utc_offset_hours,
            model: field("GPT_VERSION"),
            notion_token: field("USER_NOTION_TOKEN"),
            task_database_id: field("USER_DATABASE_ID"),
            event_database_id,
            email_receiver: field("EMAIL_RECEIVER"),
            email_title: field("EMAIL_TITLE"),
        })
    }
}
