use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::model::board::TimeFilter;
use crate::model::task::{Status, Task};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Best-effort parse of a metadata date into a local calendar date.
///
/// Accepts RFC 3339 timestamps (converted to local time), naive date-times
/// and plain `YYYY-MM-DD` dates. Anything else is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Local calendar date of a millisecond timestamp
pub fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.date_naive())
}

/// Sunday and Saturday of the week containing `today`
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(today.weekday().num_days_from_sunday());
    let start = today - Days::new(offset);
    (start, start + Days::new(6))
}

/// Whether `task` passes `mode` at time `now`.
pub fn is_visible(task: &Task, mode: TimeFilter, now: DateTime<Local>) -> bool {
    let today = now.date_naive();
    match mode {
        TimeFilter::All => true,
        TimeFilter::Today => due_date(task).is_some_and(|due| due <= today),
        TimeFilter::Week => {
            let (start, end) = week_bounds(today);
            relevant_dates(task)
                .into_iter()
                .any(|d| start <= d && d <= end)
        }
    }
}

fn due_date(task: &Task) -> Option<NaiveDate> {
    task.fields.due_date.as_deref().and_then(parse_date)
}

/// Dates that put a task in a given week
fn relevant_dates(task: &Task) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(4);
    dates.extend(due_date(task));
    dates.extend(task.fields.started_at.as_deref().and_then(parse_date));
    if task.status == Status::Done {
        dates.extend(task.fields.completed_at.as_deref().and_then(parse_date));
    }
    dates.extend(date_from_millis(task.created_at));
    dates
}
