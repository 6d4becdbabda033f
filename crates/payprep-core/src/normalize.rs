use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::warn;

use crate::error::{PipelineError, Result};

/// Timestamp layouts the raw export is known to emit.
const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const FLAG_COLUMNS: [&str; 2] = ["success", "is_3d_secured"];
const CATEGORICAL_COLUMNS: [&str; 3] = ["country", "psp", "card"];

#[derive(Debug, Clone)]
pub struct NormalizeResult {
    pub dataframe: DataFrame,
    /// Rows whose timestamp could not be parsed and now carry the null marker.
    pub unparseable_timestamps: usize,
}

/// Coerces raw columns into their canonical types.
///
/// Timestamps that fail to parse degrade to null rather than failing the
/// batch; the count is carried in the result so callers can report it. A
/// success or 3-D Secure flag outside {0, 1} is a data-quality error and
/// fails the whole batch.
pub fn normalize_types(df: &DataFrame) -> Result<NormalizeResult> {
    let mut out = df.clone();

    let timestamp = parse_timestamp_column(out.column("timestamp")?)?;
    let unparseable_timestamps = timestamp.null_count();
    if unparseable_timestamps > 0 {
        warn!(
            count = unparseable_timestamps,
            "timestamps failed to parse and were nulled"
        );
    }
    out.replace("timestamp", timestamp)?;

    for name in CATEGORICAL_COLUMNS {
        let categorical = out
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Categorical(None, CategoricalOrdering::Physical))?;
        out.replace(name, categorical)?;
    }

    for name in FLAG_COLUMNS {
        let flag = coerce_binary_flag(out.column(name)?.as_materialized_series(), name)?;
        out.replace(name, flag)?;
    }

    Ok(NormalizeResult {
        dataframe: out,
        unparseable_timestamps,
    })
}

fn parse_timestamp_column(column: &Column) -> Result<Series> {
    let target = DataType::Datetime(TimeUnit::Microseconds, None);
    match column.dtype() {
        // Already normalized; re-cast only to settle the time unit.
        DataType::Datetime(_, _) | DataType::Date => {
            Ok(column.as_materialized_series().cast(&target)?)
        }
        DataType::String => {
            let ca = column.str()?;
            let mut micros: Vec<Option<i64>> = Vec::with_capacity(ca.len());
            for value in ca.iter() {
                micros.push(value.and_then(parse_timestamp_micros));
            }
            Ok(Series::new(column.name().clone(), micros).cast(&target)?)
        }
        other => Err(PipelineError::UnsupportedTimestamp {
            column: column.name().to_string(),
            dtype: other.to_string(),
        }),
    }
}

fn parse_timestamp_micros(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive_to_micros(dt));
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(naive_to_micros)
}

fn naive_to_micros(value: NaiveDateTime) -> i64 {
    let dt_utc = value.and_utc();
    dt_utc.timestamp() * 1_000_000 + i64::from(dt_utc.timestamp_subsec_nanos() / 1_000)
}

/// Coerces a boolean-as-integer column to Int64, rejecting anything outside
/// {0, 1}. Nulls are rejected too: a missing outcome flag is a broken row,
/// not a value to impute.
fn coerce_binary_flag(series: &Series, column: &str) -> Result<Series> {
    let len = series.len();
    let mut values: Vec<i64> = Vec::with_capacity(len);

    for idx in 0..len {
        let any = series.get(idx)?;
        let value = match any {
            AnyValue::Null => Err(coercion_error(column, "null")),
            AnyValue::Boolean(b) => Ok(i64::from(b)),
            AnyValue::String(text) => parse_flag_text(column, text),
            AnyValue::StringOwned(ref text) => parse_flag_text(column, text.as_str()),
            AnyValue::Float32(f) => whole_float_to_i64(column, f64::from(f)),
            AnyValue::Float64(f) => whole_float_to_i64(column, f),
            ref other => other
                .try_extract::<i64>()
                .map_err(|_| coercion_error(column, &any.to_string())),
        }?;

        if value != 0 && value != 1 {
            return Err(coercion_error(column, &value.to_string()));
        }
        values.push(value);
    }

    Ok(Series::new(column.into(), values))
}

fn parse_flag_text(column: &str, text: &str) -> Result<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| coercion_error(column, text))
}

fn whole_float_to_i64(column: &str, value: f64) -> Result<i64> {
    if value.fract() == 0.0 && value.is_finite() {
        Ok(value as i64)
    } else {
        Err(coercion_error(column, &value.to_string()))
    }
}

fn coercion_error(column: &str, value: &str) -> PipelineError {
    PipelineError::TypeCoercion {
        column: column.to_string(),
        value: value.to_string(),
    }
}
