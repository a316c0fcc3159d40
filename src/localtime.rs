//! UTC-offset helpers shared by the fetchers, orchestrator, and sender
//!
//! Users carry a signed whole-hour UTC offset; everything local (the
//! reference date, the dated email subject) derives from UTC-now plus that
//! offset.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Build a fixed offset from whole hours, falling back to UTC out of range
///
/// The offset comes from an untrusted config field, so the seconds
/// conversion must not overflow either.
pub fn fixed_offset(offset_hours: i32) -> FixedOffset {
    offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| {
            tracing::warn!("UTC offset {} out of range, using UTC", offset_hours);
            FixedOffset::east_opt(0).expect("zero offset is always valid")
        })
}

/// Convert a UTC instant into the user's local time
pub fn to_local(utc_now: DateTime<Utc>, offset_hours: i32) -> DateTime<FixedOffset> {
    utc_now.with_timezone(&fixed_offset(offset_hours))
}

/// The user's local calendar date for a UTC instant (the reference date)
pub fn local_date(utc_now: DateTime<Utc>, offset_hours: i32) -> NaiveDate {
    to_local(utc_now, offset_hours).date_naive()
}
