use aqi_forecast::utils::{from_epoch_seconds, hourly_timestamps, parse_timestamp};
use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("2024-03-01T05:00:00Z")]
#[case("2024-03-01T07:00:00+02:00")]
#[case("2024-03-01 05:00:00")]
#[case("2024-03-01T05:00:00")]
#[case("2024-03-01 05:00")]
fn test_parse_timestamp_formats(#[case] input: &str) {
    let expected = Utc.with_ymd_and_hms(2024, 3, 1, 5, 0, 0).unwrap();
    assert_eq!(parse_timestamp(input).unwrap(), expected);
}

#[test]
fn test_parse_bare_date_is_midnight() {
    assert_eq!(
        parse_timestamp("2024-03-01").unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(parse_timestamp("yesterday").is_err());
}

#[test]
fn test_epoch_seconds() {
    assert_eq!(
        from_epoch_seconds(1_709_251_200).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_hourly_timestamps_cross_midnight() {
    let last = Utc.with_ymd_and_hms(2024, 2, 29, 22, 0, 0).unwrap();
    let timestamps = hourly_timestamps(last, 3);

    assert_eq!(
        timestamps,
        vec![
            last + Duration::hours(1),
            last + Duration::hours(2),
            Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap(),
        ]
    );
}
