//! Orchestrator: the per-user morning digest pipeline
//!
//! Iterates over all configured users strictly sequentially, taking each
//! one through config validation, data fetch, advice generation, and email
//! dispatch. A failure in one user's pipeline is logged and the batch
//! advances to the next user; only a configuration-store failure or an
//! empty set of valid users ends the run.

use crate::advice::{self, AdviceInput};
use crate::config::{Settings, UserConfig};
use crate::email::{format_email, MailgunSender};
use crate::error::{DaybriefError, Result};
use crate::localtime::{local_date, to_local};
use crate::notion::{fetch_events, fetch_tasks, load_user_configs, NotionClient};
use crate::providers::{create_generator, TextGenerator};
use crate::weather::WeatherClient;
use chrono::{DateTime, Utc};

/// Heading used in the formatted email body
const DIGEST_HEADING: &str = "Morning Digest";

/// Outcome counts for one batch run
#[derive(Debug, Clone, Default)]
pub struct DigestSummary {
    /// Valid users the batch attempted
    pub users_total: usize,
    /// Emails the provider accepted
    pub emails_accepted: usize,
    /// Users whose pipeline failed or whose email was rejected
    pub users_failed: usize,
}

/// Run the digest batch at the current instant
pub async fn run(settings: &Settings) -> Result<DigestSummary> {
    run_at(settings, Utc::now()).await
}

/// Run the digest batch for an explicit UTC instant
///
/// # Errors
///
/// Returns error when the configuration store is unreachable or yields no
/// valid users; everything below that degrades per user instead.
pub async fn run_at(settings: &Settings, utc_now: DateTime<Utc>) -> Result<DigestSummary> {
    let store = NotionClient::new(
        &settings.notion.token,
        settings.http.timeout_seconds,
        settings.notion.api_base.as_deref(),
    )?;
    let users = load_user_configs(&store, &settings.notion.users_database_id).await?;
    if users.is_empty() {
        return Err(DaybriefError::ConfigStore(
            "no valid user configurations found".to_string(),
        )
        .into());
    }

    let weather_client = WeatherClient::new(&settings.weather, settings.http.timeout_seconds)?;
    let sender = MailgunSender::new(&settings.mailgun, settings.http.timeout_seconds)?;
    let generator = create_generator(&settings.advice, settings.http.timeout_seconds)?;

    let mut summary = DigestSummary {
        users_total: users.len(),
        ..Default::default()
    };

    // Stable iteration order keeps run logs comparable between mornings
    let mut user_ids: Vec<&String> = users.keys().collect();
    user_ids.sort();

    for user_id in user_ids {
        let user = &users[user_id];
        match process_user(settings, user, &weather_client, &sender, generator.as_ref(), utc_now)
            .await
        {
            Ok(true) => summary.emails_accepted += 1,
            Ok(false) => summary.users_failed += 1,
            Err(e) => {
                tracing::error!("Error processing user {}: {}", user_id, e);
                summary.users_failed += 1;
            }
        }
    }

    tracing::info!(
        "Morning digest completed: {} user(s), {} email(s) accepted, {} failure(s)",
        summary.users_total,
        summary.emails_accepted,
        summary.users_failed
    );
    Ok(summary)
}

/// Take one user through fetch, advice, format, and send
///
/// Returns whether the email was accepted. Fetch and generation stages
/// degrade internally; only client construction can error here.
async fn process_user(
    settings: &Settings,
    user: &UserConfig,
    weather_client: &WeatherClient,
    sender: &MailgunSender,
    generator: &dyn TextGenerator,
    utc_now: DateTime<Utc>,
) -> Result<bool> {
    let local_time = to_local(utc_now, user.utc_offset_hours);
    let reference_date = local_date(utc_now, user.utc_offset_hours);
    tracing::info!(
        "Processing {} ({}), local time {}",
        user.user_id,
        user.user_name,
        local_time.format("%Y-%m-%d %H:%M")
    );

    let tasks_client = NotionClient::new(
        &user.notion_token,
        settings.http.timeout_seconds,
        settings.notion.api_base.as_deref(),
    )?;
    let tasks = fetch_tasks(
        &tasks_client,
        &user.task_database_id,
        reference_date,
        user.utc_offset_hours,
        false,
    )
    .await;

    let events = match &user.event_database_id {
        Some(event_db) => Some(
            fetch_events(
                &tasks_client,
                event_db,
                reference_date,
                user.utc_offset_hours,
                false,
            )
            .await,
        ),
        None => None,
    };

    tracing::info!("Fetching weather for {}", user.location);
    let weather = weather_client.fetch(&user.location).await;

    let input = AdviceInput {
        weather,
        today_tasks: tasks.today_due,
        in_progress_tasks: tasks.in_progress,
        future_tasks: tasks.future,
        events,
    };

    tracing::info!("Generating advice for {}", user.user_id);
    let fragment = advice::generate(
        generator,
        &input,
        &user.model,
        &user.location,
        &user.career,
        local_time,
        &user.schedule_prompt,
    )
    .await;

    let body = format_email(&fragment, &user.user_name, DIGEST_HEADING);
    let report = sender
        .send_at(
            &body,
            &user.email_receiver,
            &user.email_title,
            user.utc_offset_hours,
            utc_now,
        )
        .await;

    if !report.accepted {
        tracing::warn!(
            "Email for {} not accepted: {}",
            user.user_id,
            report.detail
        );
    }
    Ok(report.accepted)
}
