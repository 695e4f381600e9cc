//! Pure display formatters for preview slots.
//!
//! Every function here is deterministic, side-effect free, and total over
//! its documented input domain: bad input degrades to a documented fallback
//! or a recoverable error, never a panic.

use chrono::NaiveDate;

use crate::{Error, Result};

/// Abbreviate a raw count for display: `1500` becomes `1.5K`, `2300000`
/// becomes `2.3M`, anything below a thousand is printed as-is.
///
/// The raw value is an integer-as-text field. Empty or non-numeric input
/// counts as zero, and negative input clamps to zero (the count slots have
/// no meaningful negative rendering). No locale grouping is applied.
pub fn compact_count(raw: &str) -> String {
    let value = raw.trim().parse::<i64>().unwrap_or(0).max(0);

    if value >= 1_000_000 {
        format!("{}M", strip_trailing_zero(value as f64 / 1_000_000.0))
    } else if value >= 1_000 {
        format!("{}K", strip_trailing_zero(value as f64 / 1_000.0))
    } else {
        value.to_string()
    }
}

/// Round to one decimal place and drop a trailing ".0".
fn strip_trailing_zero(value: f64) -> String {
    let fixed = format!("{:.1}", value);
    match fixed.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => fixed,
    }
}

/// Convert a 24-hour `HH:MM` string to a 12-hour clock with AM/PM.
///
/// Hours 0 and 12 both display as 12. Minutes pass through verbatim, so
/// `"09:05"` keeps its zero-padded minutes. Empty or unparseable input
/// yields the fixed fallback `"12:00 PM"`.
pub fn twelve_hour_clock(raw: &str) -> String {
    const FALLBACK: &str = "12:00 PM";

    let mut parts = raw.splitn(2, ':');
    let hours = match parts.next().and_then(|h| h.trim().parse::<u32>().ok()) {
        Some(h) if h < 24 => h,
        _ => return FALLBACK.to_string(),
    };
    let minutes = match parts.next() {
        Some(m) if !m.is_empty() && m.chars().all(|c| c.is_ascii_digit()) => m,
        _ => return FALLBACK.to_string(),
    };

    let meridiem = if hours >= 12 { "PM" } else { "AM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };

    format!("{}:{} {}", display_hours, minutes, meridiem)
}

/// Format an ISO `YYYY-MM-DD` date as `"Mon D, YYYY"` (English short month,
/// unpadded day).
///
/// Empty input returns `Ok(None)` and the caller leaves the slot untouched.
/// A malformed date is a recoverable [`Error::RenderError`]; the refresh
/// boundary logs it and keeps the slot at its prior content.
pub fn friendly_date(raw: &str) -> Result<Option<String>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| Error::RenderError(format!("Invalid date {:?}: {}", raw, e)))?;

    Ok(Some(date.format("%b %-d, %Y").to_string()))
}
