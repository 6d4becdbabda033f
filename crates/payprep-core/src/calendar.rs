use chrono::{DateTime, Datelike, Timelike, Utc};
use polars::prelude::*;

use crate::error::Result;

const DERIVED_COLUMNS: [&str; 2] = ["hour_of_day", "day_of_week"];

/// Adds `hour_of_day` (0-23) and `day_of_week` (0-6, Monday = 0) derived
/// from the normalized timestamp.
///
/// Rows carrying the null timestamp marker get null for both features, so
/// downstream consumers can tell "midnight Monday" apart from "timestamp
/// unknown". Pre-existing derived columns are replaced, making re-runs
/// idempotent.
pub fn add_calendar_features(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.drop_many(DERIVED_COLUMNS);
    let len = out.height();

    let timestamp = out.column("timestamp")?.datetime()?.clone();

    let mut hours: Vec<Option<i32>> = Vec::with_capacity(len);
    let mut weekdays: Vec<Option<i32>> = Vec::with_capacity(len);

    for idx in 0..len {
        match timestamp
            .get(idx)
            .and_then(DateTime::<Utc>::from_timestamp_micros)
        {
            Some(dt) => {
                hours.push(Some(dt.hour() as i32));
                weekdays.push(Some(dt.weekday().num_days_from_monday() as i32));
            }
            None => {
                hours.push(None);
                weekdays.push(None);
            }
        }
    }

    out.hstack_mut(&mut [
        Series::new("hour_of_day".into(), hours).into(),
        Series::new("day_of_week".into(), weekdays).into(),
    ])?;

    Ok(out)
}
