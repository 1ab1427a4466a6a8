//! Integration tests for countywatch-common crate.

use chrono::NaiveDate;
use countywatch_common::{
    format_iso_date, parse_iso_date, CountyWatchError, LogFormat, LoggingConfig,
    RawRecord, RegionKey,
};

#[test]
fn test_region_key_selects_records() {
    let date = NaiveDate::from_ymd_opt(2020, 4, 5).unwrap();
    let records = vec![
        RawRecord::new(date, "Kent", "Michigan", 10),
        RawRecord::new(date, "Kent", "Delaware", 3),
        RawRecord::new(date, "Wayne", "Michigan", 99),
    ];

    let key = RegionKey::new("Kent", "Michigan");
    let selected: Vec<_> = records.iter().filter(|r| r.key() == key).collect();

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].cumulative_cases, 10);
}

#[test]
fn test_date_helpers_round_trip_through_text() {
    let date = parse_iso_date("2020-04-05").unwrap();
    assert_eq!(format_iso_date(date), "2020-04-05");
}

#[test]
fn test_missing_region_is_the_only_region_scoped_error() {
    assert!(CountyWatchError::missing_region("Nowhere", "Michigan").is_region_scoped());
    assert!(!CountyWatchError::config("bad").is_region_scoped());
    assert!(!CountyWatchError::data("bad row", Some(2)).is_region_scoped());
}

#[test]
fn test_logging_config_from_toml() {
    let config: LoggingConfig = toml::from_str(
        r#"
        level = "warn"
        format = "compact"
        file_path = "logs/countywatch.log"
        "#,
    )
    .unwrap();

    assert_eq!(config.level, "warn");
    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(
        config.file_path.as_deref(),
        Some(std::path::Path::new("logs/countywatch.log"))
    );
}
