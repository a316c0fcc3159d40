//! Daybrief - morning digest batch pipeline
//!
//! Daybrief pulls per-user configuration and task data from a Notion
//! workspace, fetches a weather forecast, asks a text-generation backend
//! to draft a prioritized morning briefing, and emails the result through
//! Mailgun. It is a single-shot batch job: one external trigger (cron),
//! one sequential pass over all configured users, no persistent state.
//!
//! # Architecture
//!
//! - `config`: run settings and per-user configuration
//! - `notion`: source-store client plus the user/task/event fetchers
//! - `weather`: current-conditions snapshot fetcher
//! - `providers`: text-generation backend abstraction (OpenAI, DeepSeek)
//! - `advice`: prompt assembly, backend invocation, fragment sanitizing
//! - `email`: formatter and Mailgun sender
//! - `digest`: the per-user orchestration loop
//! - `error`: error types and result alias
//!
//! # Example
//!
//! ```no_run
//! use daybrief::{digest, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load("config/daybrief.yaml")?;
//!     settings.validate()?;
//!     let summary = digest::run(&settings).await?;
//!     println!("{} email(s) accepted", summary.emails_accepted);
//!     Ok(())
//! }
//! ```

pub mod advice;
pub mod config;
pub mod digest;
pub mod email;
pub mod error;
pub mod localtime;
pub mod notion;
pub mod providers;
pub mod weather;

// Re-export commonly used types
pub use config::{Backend, Settings, UserConfig};
pub use digest::DigestSummary;
pub use error::{DaybriefError, Result};
pub use notion::{EventBuckets, Task, TaskBuckets};
pub use weather::WeatherSnapshot;
