use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::info;

use crate::calendar::add_calendar_features;
use crate::error::Result;
use crate::normalize::normalize_types;
use crate::sanitize::drop_export_artifacts;
use crate::sequence::assign_attempt_sequence;

/// Data-quality summary for one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    pub rows: usize,
    pub unparseable_timestamps: usize,
}

#[derive(Debug, Clone)]
pub struct FeatureResult {
    pub dataframe: DataFrame,
    pub report: FeatureReport,
}

/// Runs the four feature stages in order on one in-memory table:
/// artifact-column removal, type normalization, attempt sequencing, and
/// calendar extraction. Row count and row order are preserved exactly.
pub fn derive_features(df: &DataFrame) -> Result<FeatureResult> {
    let sanitized = drop_export_artifacts(df);
    let normalized = normalize_types(&sanitized)?;
    let sequenced = assign_attempt_sequence(&normalized.dataframe)?;
    let enriched = add_calendar_features(&sequenced)?;

    let report = FeatureReport {
        rows: enriched.height(),
        unparseable_timestamps: normalized.unparseable_timestamps,
    };
    info!(
        rows = report.rows,
        unparseable_timestamps = report.unparseable_timestamps,
        "feature derivation finished"
    );

    Ok(FeatureResult {
        dataframe: enriched,
        report,
    })
}
