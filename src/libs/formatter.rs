//! Conversions between stored epoch milliseconds and what the user types or reads.
//!
//! Times are shown and entered in local time as `YYYY-MM-DD HH:MM`. Repeat
//! intervals are entered in minutes and shown as `HH:MM`.

use chrono::{Duration, Local, NaiveDateTime, TimeZone};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Local `YYYY-MM-DD HH:MM` for an epoch-millisecond timestamp, `-` if out of range.
pub fn format_timestamp(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(dt) => dt.format(DATETIME_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

/// Parses local `YYYY-MM-DD HH:MM` into epoch milliseconds.
///
/// On a DST fold the earlier instant wins; a time inside a DST gap does not parse.
pub fn parse_local_datetime(input: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), DATETIME_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// `HH:MM`; negative durations show as `00:00`.
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

/// Repeat column text: `once` for one-shot reminders, `every HH:MM` otherwise.
pub fn format_repeat(repeat_interval: Option<i64>) -> String {
    match repeat_interval {
        Some(ms) => format!("every {}", format_duration(&Duration::milliseconds(ms))),
        None => "once".to_string(),
    }
}

/// Minutes typed by the user to a repeat interval. `0` means one-shot.
pub fn minutes_to_interval(minutes: u32) -> Option<i64> {
    match minutes {
        0 => None,
        m => Some(i64::from(m) * 60_000),
    }
}
