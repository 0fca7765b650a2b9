//! Display formatting helpers

use chrono::{DateTime, Utc};

use crate::constants::{PriceLevelInfo, DAYS_OF_WEEK, PRICE_LEVELS};
use mesa_api::OpeningHours;

/// Shown for a price level outside 0-4 or an unknown one.
pub const PRICE_LEVEL_UNAVAILABLE: PriceLevelInfo = PriceLevelInfo {
    level: 0,
    symbol: "N/A",
    label: "Not available",
};

pub fn price_level(level: Option<u8>) -> PriceLevelInfo {
    level
        .and_then(|level| PRICE_LEVELS.get(level as usize).copied())
        .unwrap_or(PRICE_LEVEL_UNAVAILABLE)
}

/// One decimal, or `"N/A"` when the place has no rating (or a zero rating).
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(rating) if rating != 0.0 => format!("{:.1}", rating),
        _ => "N/A".to_string(),
    }
}

/// Cut `text` to at most `max_chars` characters and append `"..."`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim())
}

/// Coarse "N units ago" description of a Unix timestamp (seconds) relative to `now`.
pub fn format_relative_time(timestamp_secs: i64, now: DateTime<Utc>) -> String {
    let seconds = (now.timestamp() - timestamp_secs).max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;
    let months = days / 30;
    let years = days / 365;

    let (count, unit) = if years > 0 {
        (years, "year")
    } else if months > 0 {
        (months, "month")
    } else if weeks > 0 {
        (weeks, "week")
    } else if days > 0 {
        (days, "day")
    } else if hours > 0 {
        (hours, "hour")
    } else if minutes > 0 {
        (minutes, "minute")
    } else {
        return "just now".to_string();
    };

    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// `"1430"` -> `"2:30 PM"`. Anything that is not four digits is returned unchanged.
pub fn format_time(time: &str) -> String {
    if time.len() != 4 || !time.chars().all(|c| c.is_ascii_digit()) {
        return time.to_string();
    }
    let hours: u32 = time[..2].parse().unwrap_or(0);
    let minutes = &time[2..];
    let period = if hours >= 12 { "PM" } else { "AM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hours}:{minutes} {period}")
}

/// Day name for 0 = Sunday through 6 = Saturday; empty otherwise.
pub fn day_name(day: u8) -> &'static str {
    DAYS_OF_WEEK.get(day as usize).copied().unwrap_or("")
}

pub fn format_opening_hours(hours: Option<&OpeningHours>) -> Vec<String> {
    hours
        .map(|hours| hours.weekday_text.clone())
        .unwrap_or_default()
}

pub fn is_open_now(hours: Option<&OpeningHours>) -> bool {
    hours.and_then(|hours| hours.open_now).unwrap_or(false)
}

/// Two-letter avatar initials: first and last word, or the first two letters of a single word.
pub fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(2).collect::<String>().to_uppercase(),
        [first, .., last] => first
            .chars()
            .take(1)
            .chain(last.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
    }
}
