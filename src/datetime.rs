//! # Date and Time Formatting
//!
//! Shared by the image caption ([`crate::pipeline`]) and the clock
//! ([`crate::clock`]).
//!
//! Configured formats come in two dialects:
//!
//! | Dialect | Example | Detected by |
//! |---------|---------|-------------|
//! | strftime | `%d/%m/%Y` | contains `%` |
//! | reference layout | `02/01/2006` | anything else |
//!
//! Reference layouts are written against the fixed time
//! `Mon Jan 2 15:04:05 2006` and are translated to strftime before use.
//!
//! Formatting never panics: a format chrono cannot render falls back to the
//! caller's default.

use chrono::NaiveDateTime;
use std::fmt::Write;

/// Day/month/year, used when no date format is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// 12-hour clock without leading zero, e.g. `2:05PM`.
pub const TWELVE_HOUR_FORMAT: &str = "%-I:%M%p";

/// Reference layout tokens, longest first where prefixes overlap.
const LAYOUT_TOKENS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Monday", "%A"),
    ("2006", "%Y"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("_2", "%e"),
    ("01", "%m"),
    ("02", "%d"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("15", "%H"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

/// Turn a configured format into a strftime string.
pub fn to_strftime(format: &str) -> String {
    if format.contains('%') {
        return format.to_string();
    }

    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;
    'outer: while !rest.is_empty() {
        for (token, spec) in LAYOUT_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }
        let ch = rest.chars().next().unwrap_or_default();
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

/// Format `dt` with a strftime string, or `None` if chrono rejects it.
pub fn try_format(dt: &NaiveDateTime, strftime: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", dt.format(strftime)).ok()?;
    Some(out)
}

/// Format `dt` with the configured format, falling back to `default` when
/// the configured one is empty or unusable.
pub fn format_or_default(dt: &NaiveDateTime, configured: &str, default: &str) -> String {
    let configured = configured.trim();
    if !configured.is_empty()
        && let Some(s) = try_format(dt, &to_strftime(configured))
    {
        return s;
    }
    try_format(dt, default).unwrap_or_default()
}

/// Pick the time format: `"12"` selects the 12-hour format, anything else
/// the caller's 24-hour default.
pub fn time_format(setting: &str, default_24h: &'static str) -> &'static str {
    if setting.trim() == "12" {
        TWELVE_HOUR_FORMAT
    } else {
        default_24h
    }
}

/// Date and time strings for a timestamp, each present only if enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTimeParts {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Render the enabled parts of `dt`.
pub fn parts(
    dt: &NaiveDateTime,
    show_date: bool,
    show_time: bool,
    date_format: &str,
    time_format: &str,
) -> DateTimeParts {
    DateTimeParts {
        date: show_date.then(|| format_or_default(dt, date_format, DEFAULT_DATE_FORMAT)),
        time: show_time.then(|| format_or_default(dt, time_format, time_format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn test_layout_translation() {
        assert_eq!(to_strftime("02/01/2006"), "%d/%m/%Y");
        assert_eq!(to_strftime("15:04:05"), "%H:%M:%S");
        assert_eq!(to_strftime("3:04PM"), "%-I:%M%p");
        assert_eq!(to_strftime("Monday, January 2"), "%A, %B %-d");
        assert_eq!(to_strftime("%Y-%m-%d"), "%Y-%m-%d");
    }

    #[test]
    fn test_layout_formats_like_strftime() {
        let dt = sample();
        assert_eq!(format_or_default(&dt, "2006-01-02", DEFAULT_DATE_FORMAT), "2024-03-07");
        assert_eq!(format_or_default(&dt, "%Y/%m/%d", DEFAULT_DATE_FORMAT), "2024/03/07");
    }

    #[test]
    fn test_empty_format_uses_default() {
        assert_eq!(format_or_default(&sample(), "", DEFAULT_DATE_FORMAT), "07/03/2024");
    }

    #[test]
    fn test_invalid_format_uses_default() {
        // %z needs an offset, which a naive timestamp doesn't have
        assert_eq!(format_or_default(&sample(), "%z", DEFAULT_DATE_FORMAT), "07/03/2024");
        assert_eq!(format_or_default(&sample(), "%Q", DEFAULT_DATE_FORMAT), "07/03/2024");
    }

    #[test]
    fn test_time_format_selection() {
        assert_eq!(time_format("12", "%H:%M"), TWELVE_HOUR_FORMAT);
        assert_eq!(time_format("24", "%H:%M"), "%H:%M");
        assert_eq!(time_format("", "%H:%M:%S"), "%H:%M:%S");
        assert_eq!(time_format("bogus", "%H:%M"), "%H:%M");
    }

    #[test]
    fn test_twelve_hour_output() {
        assert_eq!(try_format(&sample(), TWELVE_HOUR_FORMAT).unwrap(), "2:05PM");
    }

    #[test]
    fn test_parts_respect_flags() {
        let dt = sample();
        let none = parts(&dt, false, false, "", "%H:%M");
        assert_eq!(none, DateTimeParts::default());

        let both = parts(&dt, true, true, "", "%H:%M");
        assert_eq!(both.date.as_deref(), Some("07/03/2024"));
        assert_eq!(both.time.as_deref(), Some("14:05"));
    }
}
