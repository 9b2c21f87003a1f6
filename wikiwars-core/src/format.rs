//! Formatting helpers shared across front-ends.
//!
//! Timestamps stay `DateTime<Utc>` everywhere in the core and are only turned
//! into strings here.

use chrono::{DateTime, Utc};

/// Format a timestamp the way the dashboard tables show it
/// (e.g., "January 02, 2024, 09:00 AM").
pub fn format_timestamp_readable(ts: DateTime<Utc>) -> String {
    ts.format("%B %d, %Y, %I:%M %p").to_string()
}

/// Format a timestamp as a compact sortable string (e.g., "2024-01-02 09:00:00").
pub fn format_timestamp_compact(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    format_relative_time_from(ts, Utc::now())
}

fn format_relative_time_from(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 0 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else {
        ts.format("%b %d, %Y").to_string()
    }
}

/// Get hour display (e.g., "10am").
pub fn hour_display(hour: u8) -> String {
    match hour {
        0 => "12am".to_string(),
        1..=11 => format!("{}am", hour),
        12 => "12pm".to_string(),
        13..=23 => format!("{}pm", hour - 12),
        _ => format!("{}h", hour),
    }
}
