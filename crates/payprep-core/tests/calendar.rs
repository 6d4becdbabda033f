use chrono::{TimeZone, Utc};
use polars::prelude::*;

use payprep_core::calendar::add_calendar_features;

fn timestamp_frame(micros: Vec<Option<i64>>) -> PolarsResult<DataFrame> {
    let timestamp = Series::new("timestamp".into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    DataFrame::new(vec![timestamp.into()])
}

#[test]
fn extracts_hour_and_monday_zero_weekday() -> PolarsResult<()> {
    // 2019-01-05 was a Saturday, 2019-01-07 a Monday.
    let saturday = Utc.with_ymd_and_hms(2019, 1, 5, 10, 15, 3).unwrap();
    let monday = Utc.with_ymd_and_hms(2019, 1, 7, 0, 0, 0).unwrap();
    let sunday = Utc.with_ymd_and_hms(2019, 1, 6, 23, 59, 59).unwrap();

    let df = timestamp_frame(vec![
        Some(saturday.timestamp_micros()),
        Some(monday.timestamp_micros()),
        Some(sunday.timestamp_micros()),
    ])?;

    let result = add_calendar_features(&df).unwrap();
    let hour = result.column("hour_of_day")?.i32()?;
    let weekday = result.column("day_of_week")?.i32()?;

    assert_eq!(hour.get(0), Some(10));
    assert_eq!(weekday.get(0), Some(5));
    assert_eq!(hour.get(1), Some(0));
    assert_eq!(weekday.get(1), Some(0));
    assert_eq!(hour.get(2), Some(23));
    assert_eq!(weekday.get(2), Some(6));

    Ok(())
}

#[test]
fn invalid_timestamps_yield_null_features() -> PolarsResult<()> {
    let valid = Utc.with_ymd_and_hms(2019, 1, 7, 0, 0, 0).unwrap();
    let df = timestamp_frame(vec![None, Some(valid.timestamp_micros())])?;

    let result = add_calendar_features(&df).unwrap();
    let hour = result.column("hour_of_day")?.i32()?;
    let weekday = result.column("day_of_week")?.i32()?;

    // Null, not a fabricated midnight-Monday default.
    assert_eq!(hour.get(0), None);
    assert_eq!(weekday.get(0), None);
    assert_eq!(hour.get(1), Some(0));
    assert_eq!(weekday.get(1), Some(0));

    Ok(())
}

#[test]
fn rerunning_replaces_derived_columns() -> PolarsResult<()> {
    let valid = Utc.with_ymd_and_hms(2019, 1, 5, 10, 15, 3).unwrap();
    let df = timestamp_frame(vec![Some(valid.timestamp_micros())])?;

    let once = add_calendar_features(&df).unwrap();
    let twice = add_calendar_features(&once).unwrap();

    assert!(twice.equals(&once));
    assert_eq!(once.width(), twice.width());

    Ok(())
}
