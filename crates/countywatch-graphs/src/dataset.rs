//! In-memory case-count table loaded once per run.

use countywatch_common::{parse_iso_date, CountyWatchError, RawRecord, RegionKey, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// One CSV row as published (`date,county,state,fips,cases,deaths`).
/// Columns other than these four are ignored.
#[derive(Debug, Deserialize)]
struct CountyRow {
    date: String,
    county: String,
    state: String,
    cases: String,
}

/// The loaded records with a per-region index.
///
/// Held immutably and shared by reference across every series build.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<RawRecord>,
    index: BTreeMap<RegionKey, Vec<usize>>,
}

impl Dataset {
    /// Builds a dataset from already parsed records, keeping their order.
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        let mut index: BTreeMap<RegionKey, Vec<usize>> = BTreeMap::new();
        for (position, record) in records.iter().enumerate() {
            index.entry(record.key()).or_default().push(position);
        }

        Self { records, index }
    }

    /// Loads the CSV file at `path`.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            CountyWatchError::with_source(format!("Failed to open dataset {}", path.display()), e)
        })?;

        let dataset = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            records = dataset.len(),
            regions = dataset.region_count(),
            "Loaded case-count dataset"
        );
        Ok(dataset)
    }

    /// Loads CSV data from any reader. The first line must be a header
    /// naming at least the `date`, `county`, `state` and `cases` columns.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            let line = row.position().map(csv::Position::line);
            let parsed: CountyRow = row.deserialize(Some(&headers))?;
            records.push(parse_row(parsed, line)?);
        }

        debug!(records = records.len(), "Parsed CSV rows");
        Ok(Self::from_records(records))
    }

    /// All records in load order.
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Records of one region in load order. Matching is exact and
    /// case-sensitive; an unknown key yields an empty list.
    pub fn records_for(&self, key: &RegionKey) -> Vec<&RawRecord> {
        self.index
            .get(key)
            .map(|positions| positions.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    /// Whether any record belongs to `key`.
    pub fn contains(&self, key: &RegionKey) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct regions.
    pub fn region_count(&self) -> usize {
        self.index.len()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_row(row: CountyRow, line: Option<u64>) -> Result<RawRecord> {
    let date = parse_iso_date(&row.date).map_err(|_| {
        CountyWatchError::data(format!("Invalid date '{}'", row.date), line)
    })?;
    let cases = parse_cases(&row.cases).ok_or_else(|| {
        CountyWatchError::data(format!("Invalid case count '{}'", row.cases), line)
    })?;

    Ok(RawRecord::new(date, row.county, row.state, cases))
}

/// Accepts `12` as well as integral floats such as `12.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn parse_cases(value: &str) -> Option<u64> {
    if let Ok(cases) = value.parse::<u64>() {
        return Some(cases);
    }

    let float: f64 = value.parse().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float < u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countywatch_common::test_utils::{date, fixtures};

    #[test]
    fn test_from_reader_parses_published_layout() {
        let dataset = Dataset::from_reader(fixtures::sample_csv().as_bytes()).unwrap();

        assert_eq!(dataset.len(), 30);
        assert_eq!(dataset.region_count(), 3);

        let wayne = dataset.records_for(&RegionKey::new("Wayne", "Michigan"));
        assert_eq!(wayne.len(), 10);
        assert_eq!(wayne[0].date, date(2020, 3, 20));
        assert_eq!(wayne[9].cumulative_cases, 100);
    }

    #[test]
    fn test_region_lookup_is_exact() {
        let dataset = Dataset::from_records(fixtures::sample_records());

        assert!(dataset.contains(&RegionKey::new("Kent", "Delaware")));
        assert!(!dataset.contains(&RegionKey::new("kent", "Michigan")));
        assert!(dataset.records_for(&RegionKey::new("Kent", "Ohio")).is_empty());
    }

    #[test]
    fn test_integral_float_cases_accepted() {
        let csv = "date,county,state,fips,cases,deaths\n2020-04-01,Kent,Michigan,26081,12.0,1\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.records()[0].cumulative_cases, 12);
    }

    #[test]
    fn test_bad_case_count_reports_line() {
        let csv = "date,county,state,fips,cases,deaths\n\
                   2020-04-01,Kent,Michigan,26081,12,1\n\
                   2020-04-02,Kent,Michigan,26081,12.5,1\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            CountyWatchError::Data { line, message } => {
                assert_eq!(line, Some(3));
                assert!(message.contains("12.5"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_rejected() {
        let csv = "date,county,state,cases\n04/01/2020,Kent,Michigan,3\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(CountyWatchError::Data { .. })
        ));
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let csv = "date,county,state\n2020-04-01,Kent,Michigan\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(CountyWatchError::Csv { .. })
        ));
    }

    #[test]
    fn test_parse_cases() {
        assert_eq!(parse_cases("0"), Some(0));
        assert_eq!(parse_cases("7.0"), Some(7));
        assert_eq!(parse_cases("-1"), None);
        assert_eq!(parse_cases("NaN"), None);
        assert_eq!(parse_cases(""), None);
    }
}
