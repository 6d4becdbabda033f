// crates/payprep-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("column '{column}' holds '{value}', which is not a 0/1 flag")]
    TypeCoercion { column: String, value: String },

    #[error("column '{column}' has unsupported type {dtype} for a timestamp")]
    UnsupportedTimestamp { column: String, dtype: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
