//! Date helper functions

use chrono::NaiveDateTime;
use std::fmt::Write;

use crate::content::parse_date_string;

/// Format a timestamp using a Moment.js-compatible format string.
///
/// Returns `None` when the format string contains something chrono cannot
/// render.
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> Some("2024-01-15")
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> Option<String> {
    let chrono_format = moment_to_chrono_format(format);
    let mut out = String::new();
    write!(out, "{}", date.format(&chrono_format)).ok()?;
    Some(out)
}

/// Format a post date for display, falling back to the raw text when it
/// cannot be parsed or formatted
pub fn display_date(raw: &str, format: &str) -> String {
    parse_date_string(raw)
        .and_then(|date| format_date(&date, format))
        .unwrap_or_else(|| raw.to_string())
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest pattern first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
