//! Common type definitions for the case-count dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one region by its own name and the name of the region that
/// contains it (county and state). Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionKey {
    /// Region name, e.g. "Kent".
    pub region_name: String,
    /// Parent region name, e.g. "Michigan".
    pub parent_region: String,
}

impl RegionKey {
    /// Creates a new region key.
    pub fn new(region_name: impl Into<String>, parent_region: impl Into<String>) -> Self {
        Self {
            region_name: region_name.into(),
            parent_region: parent_region.into(),
        }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.region_name, self.parent_region)
    }
}

/// One row of the source dataset: the cumulative case count of a region on
/// a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Region name (county).
    pub region_name: String,
    /// Parent region name (state).
    pub parent_region: String,
    /// Cumulative cases reported up to and including `date`.
    pub cumulative_cases: u64,
}

impl RawRecord {
    /// Creates a new record.
    pub fn new(
        date: NaiveDate,
        region_name: impl Into<String>,
        parent_region: impl Into<String>,
        cumulative_cases: u64,
    ) -> Self {
        Self {
            date,
            region_name: region_name.into(),
            parent_region: parent_region.into(),
            cumulative_cases,
        }
    }

    /// The key of the region this record belongs to.
    pub fn key(&self) -> RegionKey {
        RegionKey::new(self.region_name.clone(), self.parent_region.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_key_comparison_is_case_sensitive() {
        let date = NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
        let record = RawRecord::new(date, "Kent", "Michigan", 10);

        assert_eq!(record.key(), RegionKey::new("Kent", "Michigan"));
        assert_ne!(record.key(), RegionKey::new("kent", "Michigan"));
        assert_ne!(record.key(), RegionKey::new("Kent", "Delaware"));
    }

    #[test]
    fn test_region_key_display() {
        let key = RegionKey::new("Washtenaw", "Michigan");
        assert_eq!(key.to_string(), "Washtenaw, Michigan");
    }

    #[test]
    fn test_raw_record_serialization() {
        let date = NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
        let record = RawRecord::new(date, "Albany", "New York", 250);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"date\":\"2020-04-01\""));

        let back: RawRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
