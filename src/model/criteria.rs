//! Search filter criteria.

use super::DonorRecord;
use serde::{Deserialize, Serialize};

/// Placeholder shown for a filter dimension with no selection.
pub const ALL_PLACEHOLDER: &str = "All";

/// The active filter selection that scoped a donor search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Selected blood group
    pub blood_group: Option<String>,

    /// Selected district
    pub district: Option<String>,

    /// Selected upazila
    pub upazila: Option<String>,
}

impl FilterCriteria {
    /// Create empty criteria (every dimension unset).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the blood group filter.
    pub fn with_blood_group(mut self, value: impl Into<String>) -> Self {
        self.blood_group = Some(value.into());
        self
    }

    /// Set the district filter.
    pub fn with_district(mut self, value: impl Into<String>) -> Self {
        self.district = Some(value.into());
        self
    }

    /// Set the upazila filter.
    pub fn with_upazila(mut self, value: impl Into<String>) -> Self {
        self.upazila = Some(value.into());
        self
    }

    /// Selected blood group, or `None` when unset or blank.
    pub fn blood_group(&self) -> Option<&str> {
        selected(&self.blood_group)
    }

    /// Selected district, or `None` when unset or blank.
    pub fn district(&self) -> Option<&str> {
        selected(&self.district)
    }

    /// Selected upazila, or `None` when unset or blank.
    pub fn upazila(&self) -> Option<&str> {
        selected(&self.upazila)
    }

    /// Check whether no dimension is selected.
    pub fn is_empty(&self) -> bool {
        self.blood_group().is_none() && self.district().is_none() && self.upazila().is_none()
    }

    /// Human-readable restatement, e.g.
    /// `Search Criteria: Blood Group: O+, District: All, Upazila: All`.
    pub fn summary(&self) -> String {
        format!(
            "Search Criteria: Blood Group: {}, District: {}, Upazila: {}",
            self.blood_group().unwrap_or(ALL_PLACEHOLDER),
            self.district().unwrap_or(ALL_PLACEHOLDER),
            self.upazila().unwrap_or(ALL_PLACEHOLDER),
        )
    }

    /// Check whether a record satisfies every selected dimension.
    ///
    /// Matching is exact for blood group and case-insensitive for the two
    /// region names.
    pub fn matches(&self, record: &DonorRecord) -> bool {
        let group_ok = self
            .blood_group()
            .map_or(true, |g| record.blood_group.as_deref().map(str::trim) == Some(g));
        let district_ok = self
            .district()
            .map_or(true, |d| eq_ignore_case(record.district.as_deref(), d));
        let upazila_ok = self
            .upazila()
            .map_or(true, |u| eq_ignore_case(record.upazila.as_deref(), u));

        group_ok && district_ok && upazila_ok
    }
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn eq_ignore_case(value: Option<&str>, expected: &str) -> bool {
    value.map_or(false, |v| v.trim().eq_ignore_ascii_case(expected))
}
