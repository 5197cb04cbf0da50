//! Donor record type.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status value that marks a donor as available.
pub const ACTIVE_STATUS: &str = "active";

/// A single donor entry as produced by the search front end.
///
/// Every field is optional at the type level. Upstream data is trusted for
/// shape but not for completeness, so missing values are resolved to
/// placeholders by the normalizer rather than rejected here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonorRecord {
    /// Donor display name
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,

    /// Blood group (e.g. "O+", "AB-")
    #[serde(deserialize_with = "lenient_string")]
    pub blood_group: Option<String>,

    /// Availability status ("active" or anything else)
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,

    /// Primary region
    #[serde(deserialize_with = "lenient_string")]
    pub district: Option<String>,

    /// Secondary region
    #[serde(deserialize_with = "lenient_string")]
    pub upazila: Option<String>,

    /// Contact phone number
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,

    /// Contact email address
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,

    /// Date of the last donation, in any of the formats understood by
    /// [`crate::locale::parse_timestamp`]
    #[serde(deserialize_with = "lenient_string")]
    pub last_donation: Option<String>,
}

impl DonorRecord {
    /// Create a record with a name and blood group.
    pub fn new(name: impl Into<String>, blood_group: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            blood_group: Some(blood_group.into()),
            ..Self::default()
        }
    }

    /// Set the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set district and upazila.
    pub fn with_location(mut self, district: impl Into<String>, upazila: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self.upazila = Some(upazila.into());
        self
    }

    /// Set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the last donation date.
    pub fn with_last_donation(mut self, date: impl Into<String>) -> Self {
        self.last_donation = Some(date.into());
        self
    }

    /// Whether the donor is currently available.
    ///
    /// Only the exact value `"active"` counts; every other status collapses
    /// to unavailable.
    pub fn is_available(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE_STATUS)
    }
}

/// Accept any JSON scalar as a string so a mistyped field (a phone number
/// stored as a number, say) never fails the whole record list.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            log::warn!("Unexpected structured value in donor field: {}", other);
            Some(other.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "name": "Rahim",
            "bloodGroup": "O+",
            "status": "active",
            "district": "Dhaka",
            "upazila": "Savar",
            "lastDonation": "2026-03-01"
        }"#;
        let record: DonorRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.blood_group.as_deref(), Some("O+"));
        assert_eq!(record.last_donation.as_deref(), Some("2026-03-01"));
        assert!(record.phone.is_none());
        assert!(record.is_available());
    }

    #[test]
    fn test_deserialize_mistyped_fields() {
        let json = r#"{"name": "Karim", "phone": 8801700000000, "status": false, "email": null}"#;
        let record: DonorRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.phone.as_deref(), Some("8801700000000"));
        assert_eq!(record.status.as_deref(), Some("false"));
        assert!(record.email.is_none());
        assert!(!record.is_available());
    }

    #[test]
    fn test_deserialize_ignores_unknown_fields() {
        let json = r#"{"name": "Nadia", "_id": "abc123", "avatar": "x.png"}"#;
        let record: DonorRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name.as_deref(), Some("Nadia"));
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let record = DonorRecord::new("A", "B+").with_status("Active");
        assert!(!record.is_available());
    }
}
