//! Email Formatter & Sender
//!
//! The formatter is pure templating: it wraps the advice fragment in a
//! greeting/title block. The sender composes a dated subject line from the
//! user's UTC offset and POSTs to the Mailgun messages endpoint with
//! exactly one recipient. Dispatch failures are logged and reported back
//! to the caller through `SendReport`; they never panic into the batch
//! loop and never silently succeed.

use crate::config::MailgunSettings;
use crate::error::Result;
use crate::localtime::local_date;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;

/// Default Mailgun API base
const DEFAULT_API_BASE: &str = "https://api.mailgun.net/v3";

/// Wrap the advice fragment in the digest's greeting/title block
///
/// Pure templating: malformed input produces malformed output, nothing
/// more.
pub fn format_email(advice: &str, user_name: &str, heading: &str) -> String {
    format!(
        "<div style=\"font-family: sans-serif; max-width: 640px; margin: 0 auto;\">\
<h2>Good morning, {}!</h2>\
<h3>{}</h3>\
{}\
</div>",
        user_name, heading, advice
    )
}

/// Outcome of one email dispatch
#[derive(Debug, Clone)]
pub struct SendReport {
    /// Whether the provider accepted the message
    pub accepted: bool,
    /// HTTP status code, when a response was received
    pub status: Option<u16>,
    /// Provider response body or local failure description
    pub detail: String,
}

impl SendReport {
    fn failure(detail: impl Into<String>) -> Self {
        Self {
            accepted: false,
            status: None,
            detail: detail.into(),
        }
    }
}

/// Mailgun transactional email sender
pub struct MailgunSender {
    client: Client,
    api_key: String,
    domain: String,
    from_name: String,
    api_base: String,
}

impl MailgunSender {
    /// Create a sender from Mailgun settings
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(settings: &MailgunSettings, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent("daybrief/0.2.0")
            .build()?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            domain: settings.domain.clone(),
            from_name: settings.from_name.clone(),
            api_base: settings
                .api_base
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Send a digest email, dating the subject with the current run time
    pub async fn send(
        &self,
        body: &str,
        recipient: &str,
        title: &str,
        offset_hours: i32,
    ) -> SendReport {
        self.send_at(body, recipient, title, offset_hours, Utc::now()).await
    }

    /// Send a digest email for an explicit UTC instant
    ///
    /// # Arguments
    ///
    /// * `body` - Formatted HTML document body
    /// * `recipient` - Single recipient address
    /// * `title` - Subject template; the local calendar date is appended
    /// * `offset_hours` - Recipient's UTC offset for the subject date
    /// * `utc_now` - The run's UTC timestamp
    pub async fn send_at(
        &self,
        body: &str,
        recipient: &str,
        title: &str,
        offset_hours: i32,
        utc_now: DateTime<Utc>,
    ) -> SendReport {
        if self.api_key.is_empty() || self.domain.is_empty() {
            tracing::warn!("Mailgun credentials not configured, email not sent");
            return SendReport::failure("missing Mailgun credentials");
        }
        if recipient.trim().is_empty() {
            tracing::warn!("Empty recipient address, email not sent");
            return SendReport::failure("empty recipient address");
        }

        // Residual code fences would render literally in mail clients
        let cleaned_body = body.replace("```html", "").replace("```", "");
        let date = local_date(utc_now, offset_hours).format("%Y-%m-%d");
        let subject = format!("{} {}", title, date);
        let from = format!("{} <mailgun@{}>", self.from_name, self.domain);
        let url = format!("{}/{}/messages", self.api_base, self.domain);

        tracing::info!("Sending email to {} with subject '{}'", recipient, subject);
        let result = self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.api_key))
            .form(&[
                ("from", from.as_str()),
                ("to", recipient.trim()),
                ("subject", subject.as_str()),
                ("html", cleaned_body.as_str()),
            ])
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Email transport error for {}: {}", recipient, e);
                return SendReport::failure(e.to_string());
            }
        };

        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        if status.is_success() {
            tracing::info!("Email accepted for {}", recipient);
            SendReport {
                accepted: true,
                status: Some(status.as_u16()),
                detail,
            }
        } else {
            tracing::warn!("Mailgun returned {} for {}: {}", status, recipient, detail);
            SendReport {
                accepted: false,
                status: Some(status.as_u16()),
                detail,
            }
        }
    }
}
