use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;

/// Structural facts about one column of the dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub distinct: usize,
    pub nulls: usize,
}

/// Per-column overview of a dataset: name, dtype, distinct values, nulls.
/// Pure reporting; the frame is not touched.
pub fn summarize_columns(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    let mut summaries = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        summaries.push(ColumnSummary {
            name: column.name().to_string(),
            dtype: column.dtype().to_string(),
            distinct: series.n_unique()?,
            nulls: series.null_count(),
        });
    }

    Ok(summaries)
}
