//! Record normalization: donor records to fixed-width rows of display text.

use crate::locale::{parse_timestamp, DateLocale};
use crate::model::DonorRecord;

/// Placeholder for missing contact details and identity fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a donor with no recorded donation.
pub const FIRST_TIME: &str = "First Time";

/// Status label for available donors.
pub const AVAILABLE: &str = "Available";

/// Status label for everyone else.
pub const UNAVAILABLE: &str = "Unavailable";

/// Number of columns in a report row.
pub const COLUMN_COUNT: usize = 7;

/// Column headers, in row order.
pub const COLUMN_HEADERS: [&str; COLUMN_COUNT] = [
    "Name",
    "Blood Group",
    "Status",
    "Location",
    "Phone",
    "Email",
    "Last Donation",
];

/// A normalized report row: name, blood group, status label, location,
/// phone, email, last donation.
pub type ReportRow = [String; COLUMN_COUNT];

/// Column headers as owned strings.
pub fn column_headers() -> Vec<String> {
    COLUMN_HEADERS.iter().map(|h| h.to_string()).collect()
}

/// Map a status value to its two-state label.
pub fn status_label(status: Option<&str>) -> &'static str {
    if status == Some(crate::model::ACTIVE_STATUS) {
        AVAILABLE
    } else {
        UNAVAILABLE
    }
}

/// Normalize one record.
pub fn normalize_record(record: &DonorRecord, locale: DateLocale) -> ReportRow {
    [
        or_default(record.name.as_deref(), NOT_AVAILABLE),
        or_default(record.blood_group.as_deref(), NOT_AVAILABLE),
        status_label(record.status.as_deref()).to_string(),
        location(record.district.as_deref(), record.upazila.as_deref()),
        or_default(record.phone.as_deref(), NOT_AVAILABLE),
        or_default(record.email.as_deref(), NOT_AVAILABLE),
        last_donation(record.last_donation.as_deref(), locale),
    ]
}

/// Normalize a list of records, one row per record, in order.
pub fn normalize_records(records: &[DonorRecord], locale: DateLocale) -> Vec<ReportRow> {
    records
        .iter()
        .map(|record| normalize_record(record, locale))
        .collect()
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn or_default(value: Option<&str>, default: &str) -> String {
    present(value).unwrap_or(default).to_string()
}

fn location(district: Option<&str>, upazila: Option<&str>) -> String {
    match (present(district), present(upazila)) {
        (Some(d), Some(u)) => format!("{}, {}", d, u),
        (Some(one), None) | (None, Some(one)) => one.to_string(),
        (None, None) => NOT_AVAILABLE.to_string(),
    }
}

fn last_donation(value: Option<&str>, locale: DateLocale) -> String {
    match present(value) {
        None => FIRST_TIME.to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(date) => locale.format_date(&date),
            None => {
                log::debug!("Unrecognised donation date {:?}, printing as-is", raw);
                raw.to_string()
            }
        },
    }
}
