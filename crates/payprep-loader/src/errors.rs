use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("transaction export not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error while reading header row: {0}")]
    Csv(#[from] csv::Error),

    #[error("polars failed to parse the export: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("required column '{column}' missing after mapping; headers were {headers:?}")]
    MissingColumn {
        column: &'static str,
        headers: Vec<String>,
    },

    #[error("export contained no data rows")]
    EmptyData,
}
