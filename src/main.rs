//! Daybrief - morning digest batch entry point
//!
//! Zero-argument binary intended to run once per morning via an external
//! scheduler. All per-run parameters come from the settings file and
//! process environment; all per-user parameters come from the
//! configuration store.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use daybrief::digest;
use daybrief::Settings;

/// Default settings file location
const SETTINGS_PATH: &str = "config/daybrief.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::load(SETTINGS_PATH)?;
    settings.validate()?;

    let summary = digest::run(&settings).await?;
    tracing::info!(
        "Run finished: {}/{} email(s) accepted",
        summary.emails_accepted,
        summary.users_total
    );
    Ok(())
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("daybrief=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
