use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

use crate::models::TemporalKeys;

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses the free-text assistance dates found in case exports.
pub struct DateParser;

/// Date-time patterns; the time of day is discarded after parsing.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// `%m/%d/%y` must come before `%m/%d/%Y`, which would read `"24"` as year 24.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

impl DateParser {
    /// Parse `s` into a calendar date, or `None` when no pattern matches.
    ///
    /// Handles RFC 3339 timestamps (including the `Z` suffix), ISO dates and
    /// date-times, and the common US `month/day/year` forms.
    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        trace!("DateParser: could not parse date \"{}\"", s);
        None
    }

    /// Parse `s` and derive every period key from it.
    pub fn temporal_keys(s: &str) -> Option<TemporalKeys> {
        Self::parse(s).map(TemporalKeys::from_date)
    }
}

// ── TemporalKeys ──────────────────────────────────────────────────────────────

impl TemporalKeys {
    /// Derive year, month, week and year-month keys for `date`.
    ///
    /// Week numbers follow the Sunday-first convention: days before the first
    /// Sunday of the year are in week `00`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date,
            year: date.format("%Y").to_string(),
            month_label: date.format("%B %Y").to_string(),
            week_label: date.format("Week %U, %Y").to_string(),
            year_month: date.format("%Y-%m").to_string(),
        }
    }
}

/// Format a date the way dataset metadata reports it (`"2024-01-15"`).
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
