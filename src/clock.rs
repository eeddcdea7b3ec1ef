//! # Clock
//!
//! Formats the current time for the clock overlay. The 24-hour default shows
//! minutes only, unlike the image caption which shows seconds.

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::datetime;

/// 24-hour clock format.
pub const CLOCK_TIME_FORMAT_24H: &str = "%H:%M";

/// Formatted clock strings; a field is empty when it is switched off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockView {
    pub clock_time: String,
    pub clock_date: String,
}

/// Format `now` according to the clock settings in `cfg`.
pub fn format_clock(cfg: &Config, now: NaiveDateTime) -> ClockView {
    let time_format = datetime::time_format(&cfg.time_format, CLOCK_TIME_FORMAT_24H);
    let parts = datetime::parts(&now, cfg.show_date, cfg.show_time, &cfg.date_format, time_format);

    ClockView {
        clock_time: parts.time.unwrap_or_default(),
        clock_date: parts.date.unwrap_or_default(),
    }
}
