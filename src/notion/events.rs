//! Event Fetcher: same shape as the Task Fetcher, bucketed by proximity
//!
//! Events are calendar-like records classified by how close their start
//! date is to the reference date: today, tomorrow, or upcoming (2 to 30
//! days out). This fetcher is an optional extension point; it only runs
//! for users whose configuration carries an event database id.

use crate::localtime::fixed_offset;
use crate::notion::tasks::{parse_task, Task};
use crate::notion::{date_not_empty_filter, NotionClient};
use chrono::{Duration, NaiveDate};

/// Calendar-like record, structurally identical to a task
pub type Event = Task;

/// The four named event buckets
#[derive(Debug, Clone, Default)]
pub struct EventBuckets {
    /// Starts on the reference date
    pub today: Vec<Event>,
    /// Starts the day after the reference date
    pub tomorrow: Vec<Event>,
    /// Starts 2 to 30 days after the reference date
    pub upcoming: Vec<Event>,
    /// Completed within the reference day (only when requested)
    pub completed: Vec<Event>,
}

impl EventBuckets {
    /// True when every bucket is empty
    pub fn is_empty(&self) -> bool {
        self.today.is_empty()
            && self.tomorrow.is_empty()
            && self.upcoming.is_empty()
            && self.completed.is_empty()
    }
}

/// Bucket assignment for a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventBucket {
    Today,
    Tomorrow,
    Upcoming,
    Completed,
}

/// Fetch and bucket a user's events
///
/// Mirrors `fetch_tasks`: per-row failures skip the row, a total fetch
/// failure yields all-empty buckets.
pub async fn fetch_events(
    client: &NotionClient,
    database_id: &str,
    reference_date: NaiveDate,
    offset_hours: i32,
    include_completed: bool,
) -> EventBuckets {
    tracing::info!("Fetching events from database {}", database_id);
    let pages = match client
        .query_database(database_id, Some(date_not_empty_filter("Date")))
        .await
    {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!("Event fetch failed, continuing with empty buckets: {}", e);
            return EventBuckets::default();
        }
    };

    let tz = fixed_offset(offset_hours);
    let mut buckets = EventBuckets::default();
    for page in &pages {
        let Some(event) = parse_task(page, tz) else {
            tracing::debug!("Skipping event row without usable date information");
            continue;
        };
        match classify_event(&event, reference_date, include_completed) {
            Some(EventBucket::Today) => buckets.today.push(event),
            Some(EventBucket::Tomorrow) => buckets.tomorrow.push(event),
            Some(EventBucket::Upcoming) => buckets.upcoming.push(event),
            Some(EventBucket::Completed) => buckets.completed.push(event),
            None => {}
        }
    }

    tracing::info!(
        "Events bucketed: {} today, {} tomorrow, {} upcoming, {} completed",
        buckets.today.len(),
        buckets.tomorrow.len(),
        buckets.upcoming.len(),
        buckets.completed.len()
    );
    buckets
}

/// Classify an event by start-date proximity to the reference date
pub fn classify_event(
    event: &Event,
    reference_date: NaiveDate,
    include_completed: bool,
) -> Option<EventBucket> {
    if event.completed {
        let edited_on = event.last_edited.map(|dt| dt.date_naive());
        if include_completed && edited_on == Some(reference_date) {
            return Some(EventBucket::Completed);
        }
        return None;
    }

    let start = event.start.map(|dt| dt.date_naive())?;
    if start == reference_date {
        return Some(EventBucket::Today);
    }
    if start == reference_date + Duration::days(1) {
        return Some(EventBucket::Tomorrow);
    }
    if start > reference_date && start <= reference_date + Duration::days(30) {
        return Some(EventBucket::Upcoming);
    }
    None
}
