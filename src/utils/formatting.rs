//! Formatting utilities used for CLI outputs.

use crate::models::{SleepNight, SleepQuality};
use chrono::{Local, TimeZone};
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_DATE_FORMAT: &str = "%a %d %b %Y %H:%M";

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Pad to `width` terminal columns (emoji and CJK count double).
pub fn pad_right(s: &str, width: usize) -> String {
    let visible = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(visible)))
}

/// Truncate to at most `width` terminal columns, marking the cut with `…`.
pub fn truncate(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    let mut out = String::new();
    for ch in s.chars() {
        let next = format!("{out}{ch}");
        if UnicodeWidthStr::width(next.as_str()) + 1 > width {
            break;
        }
        out = next;
    }
    out.push('…');
    out
}

/// Epoch milliseconds → local time using a chrono format string.
pub fn format_millis(ms: i64, date_format: &str) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format(date_format).to_string(),
        None => "--".to_string(),
    }
}

/// Duration in milliseconds → `HHh MMm SSs`.
pub fn millis2readable(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Multi-line, human readable summary of a list of nights.
/// Open nights only show their start.
pub fn format_nights(nights: &[SleepNight], date_format: &str) -> String {
    let mut out = String::from("Here is your sleep data:\n");

    for night in nights {
        out.push('\n');
        out.push_str(&format!(
            "Start: {}\n",
            format_millis(night.start_time_milli, date_format)
        ));

        if !night.is_open() {
            out.push_str(&format!(
                "End: {}\n",
                format_millis(night.end_time_milli, date_format)
            ));
            out.push_str(&format!(
                "Quality: {}\n",
                SleepQuality::label_for(night.sleep_quality)
            ));
            out.push_str(&format!(
                "Hours:Minutes:Seconds: {}\n",
                millis2readable(night.duration_milli())
            ));
        }
    }

    out
}
