//! Advice Generator: prompt assembly, backend invocation, sanitizing
//!
//! Assembles a natural-language summary of the weather, task buckets, and
//! user profile, hands it to the configured text-generation backend with a
//! fixed system instruction, and strips any residual code fences or
//! document wrapper tags from the response. Any failure along the way is
//! replaced by a literal fallback string; advice generation never aborts a
//! user's run.

use crate::notion::events::EventBuckets;
use crate::notion::tasks::Task;
use crate::providers::TextGenerator;
use crate::weather::{render_metric, WeatherSnapshot, NOT_AVAILABLE};
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::fmt::Write as _;

/// Literal substituted whenever generation fails
pub const FALLBACK_ADVICE: &str = "Could not generate advice";

/// Fixed system instruction handed to every backend
pub const SYSTEM_INSTRUCTION: &str = "You are a personal morning-briefing assistant. \
Prioritize tasks by urgency: High > Medium > Low. For each task, surface the days \
remaining until its deadline and whether it is on track. Output a clean HTML fragment \
using headings, paragraphs, and lists only. Do not wrap the output in code fences or a \
full HTML document.";

/// The fan-in structure handed to the generator, built fresh per user
#[derive(Debug, Clone, Default)]
pub struct AdviceInput {
    /// Current-conditions snapshot, possibly empty
    pub weather: WeatherSnapshot,
    /// Tasks due on the reference date
    pub today_tasks: Vec<Task>,
    /// Tasks currently in progress
    pub in_progress_tasks: Vec<Task>,
    /// Tasks starting within the next 30 days
    pub future_tasks: Vec<Task>,
    /// Event buckets, present only for event-aware users
    pub events: Option<EventBuckets>,
}

/// Generate the sanitized advice fragment for one user
///
/// # Arguments
///
/// * `generator` - The configured text-generation backend
/// * `input` - Weather + bucketed tasks (+ events)
/// * `model` - Model identifier from the user's config
/// * `location` - User's location string
/// * `career` - User's profession
/// * `local_time` - The user's local timestamp at run time
/// * `schedule_prompt` - Free-text scheduling preference
///
/// # Returns
///
/// A sanitized HTML fragment, or the literal fallback on any failure.
#[allow(clippy::too_many_arguments)]
pub async fn generate(
    generator: &dyn TextGenerator,
    input: &AdviceInput,
    model: &str,
    location: &str,
    career: &str,
    local_time: DateTime<FixedOffset>,
    schedule_prompt: &str,
) -> String {
    let prompt = render_prompt(input, location, career, local_time, schedule_prompt);
    tracing::debug!("Advice prompt is {} chars", prompt.len());

    match generator.generate(SYSTEM_INSTRUCTION, &prompt, model).await {
        Ok(raw) => {
            let fragment = sanitize_fragment(&raw);
            if fragment.is_empty() {
                tracing::warn!("Backend {} returned an empty fragment", generator.name());
                FALLBACK_ADVICE.to_string()
            } else {
                fragment
            }
        }
        Err(e) => {
            tracing::warn!("Advice generation via {} failed: {}", generator.name(), e);
            FALLBACK_ADVICE.to_string()
        }
    }
}

/// Render the structured natural-language prompt
pub fn render_prompt(
    input: &AdviceInput,
    location: &str,
    career: &str,
    local_time: DateTime<FixedOffset>,
    schedule_prompt: &str,
) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Morning briefing request for a {} in {}. Local time: {}.",
        career,
        location,
        local_time.format("%Y-%m-%d %H:%M")
    );
    let _ = writeln!(prompt, "Scheduling preference: {}", schedule_prompt);

    prompt.push_str("\nWeather:\n");
    let weather = &input.weather;
    if weather.is_empty() {
        let _ = writeln!(prompt, "- {}", NOT_AVAILABLE);
    } else {
        let _ = writeln!(prompt, "- temperature: {}", render_metric(weather.temp, "°C"));
        let _ = writeln!(prompt, "- feels like: {}", render_metric(weather.feels_like, "°C"));
        let _ = writeln!(
            prompt,
            "- conditions: {}",
            weather.description.as_deref().unwrap_or(NOT_AVAILABLE)
        );
        let _ = writeln!(prompt, "- humidity: {}", render_metric(weather.humidity, "%"));
        let _ = writeln!(prompt, "- wind: {}", render_metric(weather.wind_speed, " m/s"));
    }

    push_task_section(&mut prompt, "Tasks due today", &input.today_tasks);
    push_task_section(&mut prompt, "Tasks in progress", &input.in_progress_tasks);
    push_task_section(&mut prompt, "Upcoming tasks (next 30 days)", &input.future_tasks);

    if let Some(events) = &input.events {
        push_task_section(&mut prompt, "Events today", &events.today);
        push_task_section(&mut prompt, "Events tomorrow", &events.tomorrow);
        push_task_section(&mut prompt, "Upcoming events", &events.upcoming);
    }

    prompt
}

fn push_task_section(prompt: &mut String, heading: &str, tasks: &[Task]) {
    let _ = writeln!(prompt, "\n{}:", heading);
    if tasks.is_empty() {
        prompt.push_str("- none\n");
        return;
    }
    for task in tasks {
        let start = task
            .start
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let end = task
            .end
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(
            prompt,
            "- {} (urgency: {}, start: {}, due: {}) {}",
            task.name, task.urgency, start, end, task.description
        );
    }
}

/// Strip code-fence markers and residual document wrapper tags
///
/// Backends are told not to emit fences or full documents, but some do
/// anyway; the email body must carry a bare fragment.
pub fn sanitize_fragment(raw: &str) -> String {
    let mut result = raw.replace("```html", "").replace("```", "");
    for pattern in [
        r"(?i)<!DOCTYPE[^>]*>",
        r"(?i)</?html[^>]*>",
        r"(?i)</?body[^>]*>",
        r"(?i)</?head[^>]*>",
    ] {
        if let Ok(re) = Regex::new(pattern) {
            result = re.replace_all(&result, "").to_string();
        }
    }
    result.trim().to_string()
}
