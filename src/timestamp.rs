//! Timestamp normalization
//!
//! Everdo stores dates as UNIX seconds whose time-of-day must be 00:00:00.
//! Todoist hands out verbose strings such as `Wed 03 Mar 2021 22:59:59 +0000`.
//! Everything funnels through [`normalize`], which converts to UTC and drops the
//! time-of-day component.

use crate::error::{ExportError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Verbose format used by the Todoist sync API for due/added/completed dates
const VERBOSE_FORMAT: &str = "%a %d %b %Y %H:%M:%S %z";

/// Source of "now" for an export pass
///
/// Every fallback timestamp (missing creation date, archived project without a
/// completion date) is taken from one clock value so that a whole export agrees
/// on what "today" is.
#[derive(Debug, Clone, Copy)]
pub struct ExportClock {
    now: DateTime<Utc>,
}

impl ExportClock {
    /// Clock pinned to the current process time
    pub fn system() -> Self {
        Self { now: Utc::now() }
    }

    /// Clock pinned to a fixed instant (tests, reproducible exports)
    pub fn fixed(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Day-truncated UNIX timestamp for the clock's instant
    pub fn today_stamp(&self) -> i64 {
        day_stamp(self.now.date_naive())
    }
}

/// Parse a source date string into a day-granularity UNIX timestamp
///
/// Accepted forms, tried in order:
/// - `Wed 03 Mar 2021 22:59:59 +0000`
/// - RFC 3339 (`2021-03-03T22:59:59Z`, `2021-03-03T22:59:59+01:00`)
/// - naive `2021-03-03T22:59:59` (taken as UTC)
/// - `2021-03-03`
///
/// # Arguments
/// * `raw` - Date string as found in the source snapshot
///
/// # Returns
/// Seconds since the epoch at 00:00:00 UTC of the date's UTC day
pub fn normalize(raw: &str) -> Result<i64> {
    let date = parse_utc(raw)?.date_naive();
    Ok(day_stamp(date))
}

/// Parse a source date string into a UTC instant, keeping the time-of-day
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_str(trimmed, VERBOSE_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(ExportError::Timestamp(raw.to_string()))
}

/// UNIX timestamp of 00:00:00 UTC on the given day
pub fn day_stamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
