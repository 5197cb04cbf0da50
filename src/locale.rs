//! Locale-dependent date and time formatting.
//!
//! Formatting never fails: values that cannot be parsed are reported as
//! `None` and the caller decides what to print instead.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Date and time presentation style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateLocale {
    /// `10/17/2026`, `3:04:05 PM`
    #[default]
    EnUs,
    /// `17/10/2026`, `15:04:05`
    EnGb,
    /// `2026-10-17`, `15:04:05`
    Iso,
}

impl DateLocale {
    fn date_pattern(self) -> &'static str {
        match self {
            DateLocale::EnUs => "%-m/%-d/%Y",
            DateLocale::EnGb => "%d/%m/%Y",
            DateLocale::Iso => "%Y-%m-%d",
        }
    }

    fn time_pattern(self) -> &'static str {
        match self {
            DateLocale::EnUs => "%-I:%M:%S %p",
            DateLocale::EnGb | DateLocale::Iso => "%H:%M:%S",
        }
    }

    /// Format the date part.
    pub fn format_date(self, value: &NaiveDateTime) -> String {
        value.format(self.date_pattern()).to_string()
    }

    /// Format the time part.
    pub fn format_time(self, value: &NaiveDateTime) -> String {
        value.format(self.time_pattern()).to_string()
    }

    /// Format date and time separated by a space.
    pub fn format_date_time(self, value: &NaiveDateTime) -> String {
        format!("{} {}", self.format_date(value), self.format_time(value))
    }
}

impl FromStr for DateLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "us" | "en-us" => Ok(DateLocale::EnUs),
            "gb" | "uk" | "en-gb" => Ok(DateLocale::EnGb),
            "iso" => Ok(DateLocale::Iso),
            other => Err(format!("Unknown locale: {}", other)),
        }
    }
}

/// Parse a stored timestamp into local wall-clock time.
///
/// Accepted forms: RFC 3339 (`2026-03-01T08:30:00Z`), naive timestamps
/// (`2026-03-01T08:30:00`, `2026-03-01 08:30:00`), plain dates
/// (`2026-03-01`) and Unix epoch milliseconds (`1772353800000`).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) {
        let millis: i64 = raw.parse().ok()?;
        return Local
            .timestamp_millis_opt(millis)
            .single()
            .map(|dt| dt.naive_local());
    }

    None
}
