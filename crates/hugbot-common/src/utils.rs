//! Shared utility functions.

use chrono::{DateTime, Duration, Utc};

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Formats a duration as `HhMMm`, rounding partial minutes up.
pub fn format_remaining(remaining: Duration) -> String {
    let total_minutes = (remaining.num_seconds().max(0) + 59) / 60;
    format!("{}h{:02}m", total_minutes / 60, total_minutes % 60)
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
