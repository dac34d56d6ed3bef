// ABOUTME: Display formatting for episode durations.
// ABOUTME: Renders seconds counts as H:MM:SS or M:SS and passes pre-formatted values through.

use crate::models::DurationValue;

/// Formats an optional upstream duration for display.
///
/// Absent values and shapes that carry no usable number yield an empty string.
pub fn format_duration(value: Option<&DurationValue>) -> String {
    match value {
        None => String::new(),
        Some(DurationValue::Seconds(secs)) => format_seconds(*secs),
        Some(DurationValue::Fractional(secs)) if secs.is_finite() && *secs >= 0.0 => {
            format_seconds(secs.trunc() as u64)
        }
        Some(DurationValue::Text(text)) => format_duration_text(text),
        Some(_) => String::new(),
    }
}

/// Formats a textual duration.
///
/// - contains a colon: returned unchanged (already formatted)
/// - integer: treated as seconds
/// - anything else non-empty: returned unchanged
pub fn format_duration_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.contains(':') {
        return text.to_string();
    }
    match trimmed.parse::<u64>() {
        Ok(secs) => format_seconds(secs),
        Err(_) => text.to_string(),
    }
}

/// Renders a seconds count as `H:MM:SS` from one hour up, `M:SS` below.
pub fn format_seconds(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
