//! Task Fetcher: query, parse, and bucket a user's tasks
//!
//! Tasks are classified against the user's reference date (their local
//! calendar date) into due-today, in-progress, future (within 30 days),
//! and optionally completed-today. A row that cannot be parsed is skipped
//! individually; a total fetch failure yields all-empty buckets so advice
//! generation still proceeds with partial information.

use crate::localtime::fixed_offset;
use crate::notion::{date_not_empty_filter, props, NotionClient};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
use serde_json::Value;

/// Placeholder for absent names/descriptions
const PLACEHOLDER: &str = "NA";

/// How far ahead the future bucket reaches, in days
const FUTURE_WINDOW_DAYS: i64 = 30;

/// One upstream task record, immutable once parsed
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name, placeholder when absent
    pub name: String,
    /// Free-text description, placeholder when absent
    pub description: String,
    /// Priority/urgency label, treated as an opaque string
    pub urgency: String,
    /// Start timestamp in the caller's offset
    pub start: Option<DateTime<FixedOffset>>,
    /// End/due timestamp in the caller's offset
    pub end: Option<DateTime<FixedOffset>>,
    /// Completion flag
    pub completed: bool,
    /// Last-modified timestamp in the caller's offset
    pub last_edited: Option<DateTime<FixedOffset>>,
}

/// The four named task buckets
#[derive(Debug, Clone, Default)]
pub struct TaskBuckets {
    /// End date equals the reference date
    pub today_due: Vec<Task>,
    /// Started on or before the reference date, not yet due
    pub in_progress: Vec<Task>,
    /// Starts within the next 30 days
    pub future: Vec<Task>,
    /// Completed within the reference day (only when requested)
    pub completed: Vec<Task>,
}

impl TaskBuckets {
    /// True when every bucket is empty
    pub fn is_empty(&self) -> bool {
        self.today_due.is_empty()
            && self.in_progress.is_empty()
            && self.future.is_empty()
            && self.completed.is_empty()
    }
}

/// Bucket assignment for a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskBucket {
    TodayDue,
    InProgress,
    Future,
    Completed,
}

/// Fetch and bucket a user's tasks
///
/// # Arguments
///
/// * `client` - Client authenticated with the user's token
/// * `database_id` - Task database id
/// * `reference_date` - The user's local calendar date
/// * `offset_hours` - The user's UTC offset in whole hours
/// * `include_completed` - Whether to fill the completed bucket
///
/// # Returns
///
/// The four buckets; all empty when the fetch fails outright. Callers must
/// treat empty buckets as "no data", never as an error.
pub async fn fetch_tasks(
    client: &NotionClient,
    database_id: &str,
    reference_date: NaiveDate,
    offset_hours: i32,
    include_completed: bool,
) -> TaskBuckets {
    tracing::info!("Fetching tasks from database {}", database_id);
    let pages = match client
        .query_database(database_id, Some(date_not_empty_filter("Date")))
        .await
    {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!("Task fetch failed, continuing with empty buckets: {}", e);
            return TaskBuckets::default();
        }
    };

    let tz = fixed_offset(offset_hours);
    let mut buckets = TaskBuckets::default();
    for page in &pages {
        let Some(task) = parse_task(page, tz) else {
            tracing::debug!("Skipping task row without usable date information");
            continue;
        };
        match classify_task(&task, reference_date, include_completed) {
            Some(TaskBucket::TodayDue) => buckets.today_due.push(task),
            Some(TaskBucket::InProgress) => buckets.in_progress.push(task),
            Some(TaskBucket::Future) => buckets.future.push(task),
            Some(TaskBucket::Completed) => buckets.completed.push(task),
            None => {}
        }
    }

    tracing::info!(
        "Tasks bucketed: {} due today, {} in progress, {} future, {} completed",
        buckets.today_due.len(),
        buckets.in_progress.len(),
        buckets.future.len(),
        buckets.completed.len()
    );
    buckets
}

/// Parse one page into a task, `None` when no date information exists
pub(crate) fn parse_task(page: &Value, tz: FixedOffset) -> Option<Task> {
    let (raw_start, raw_end) = props::date_range(page, "Date");
    let start = raw_start.as_deref().and_then(|s| parse_timestamp(s, tz));
    let end = raw_end.as_deref().and_then(|s| parse_timestamp(s, tz));
    if start.is_none() && end.is_none() {
        return None;
    }

    let name = non_empty_or_placeholder(props::title_text(page, "Name"));
    let description = non_empty_or_placeholder(clean_text(&props::rich_text(page, "Description")));
    let urgency = props::select_name(page, "Urgency", PLACEHOLDER);
    let completed = props::checkbox(page, "Complete");
    let last_edited = props::last_edited_time(page)
        .as_deref()
        .and_then(|s| parse_timestamp(s, tz));

    Some(Task {
        name,
        description,
        urgency,
        start,
        end,
        completed,
        last_edited,
    })
}

/// Classify a task into at most one bucket
///
/// Completed tasks only ever land in the completed bucket, and only when
/// requested and last edited within the reference day.
pub fn classify_task(
    task: &Task,
    reference_date: NaiveDate,
    include_completed: bool,
) -> Option<TaskBucket> {
    if task.completed {
        let edited_on = task.last_edited.map(|dt| dt.date_naive());
        if include_completed && edited_on == Some(reference_date) {
            return Some(TaskBucket::Completed);
        }
        return None;
    }

    let start_date = task.start.map(|dt| dt.date_naive());
    let end_date = task.end.map(|dt| dt.date_naive());
    let horizon = reference_date + Duration::days(FUTURE_WINDOW_DAYS);

    if end_date == Some(reference_date) {
        return Some(TaskBucket::TodayDue);
    }
    if let Some(start) = start_date {
        if start <= reference_date && end_date.map_or(true, |end| end > reference_date) {
            return Some(TaskBucket::InProgress);
        }
        if reference_date < start && start <= horizon {
            return Some(TaskBucket::Future);
        }
    }
    None
}

/// Parse an upstream timestamp in the caller's offset
///
/// Accepts RFC 3339 timestamps (including `Z`) and bare `YYYY-MM-DD`
/// dates, which are taken as local midnight.
pub(crate) fn parse_timestamp(raw: &str, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&tz));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).single()
}

fn clean_text(raw: &str) -> String {
    raw.replace(['\n', '\u{a0}'], " ").trim().to_string()
}

fn non_empty_or_placeholder(text: String) -> String {
    if text.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        text
    }
}
