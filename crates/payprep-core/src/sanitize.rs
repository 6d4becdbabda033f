use polars::prelude::*;

/// Drops the `Unnamed: N` artifact columns spreadsheet exports prepend.
///
/// Matching is case-insensitive on the `unnamed` prefix. A frame without any
/// artifact columns is returned as-is.
pub fn drop_export_artifacts(df: &DataFrame) -> DataFrame {
    let artifacts: Vec<String> = df
        .get_column_names()
        .iter()
        .filter(|name| name.to_lowercase().starts_with("unnamed"))
        .map(|name| name.to_string())
        .collect();

    if artifacts.is_empty() {
        return df.clone();
    }

    df.drop_many(artifacts)
}
