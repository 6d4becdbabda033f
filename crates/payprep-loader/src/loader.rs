use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::errors::LoaderError;
use crate::schema::{ColumnMapping, REQUIRED_COLUMNS};

/// Loads a raw transaction export with the default column mapping.
pub fn load_transactions(path: &Path) -> Result<DataFrame, LoaderError> {
    load_transactions_with_mapping(path, &ColumnMapping::default())
}

/// Loads a raw transaction export, renaming raw headers to canonical names.
///
/// Fails fast when the file is absent or a required column cannot be found
/// in the mapped header row; the full polars parse only runs once the input
/// contract is known to hold.
pub fn load_transactions_with_mapping(
    path: &Path,
    mapping: &ColumnMapping,
) -> Result<DataFrame, LoaderError> {
    if !path.exists() {
        return Err(LoaderError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read(path)?;
    let headers = read_header_row(&content)?;
    let mapped = mapping.mapped_headers(&headers);

    for column in REQUIRED_COLUMNS {
        if !mapped.iter().any(|header| header == column) {
            return Err(LoaderError::MissingColumn {
                column,
                headers: mapped,
            });
        }
    }

    debug!(path = %path.display(), columns = headers.len(), "parsing transaction export");

    let cursor = Cursor::new(&content);
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_ignore_errors(true)
        .into_reader_with_file_handle(cursor)
        .finish()?;

    for (raw, canonical) in &mapping.rename {
        if df.get_column_names().iter().any(|name| name.as_str() == raw) {
            df.rename(raw, canonical.as_str().into())?;
        }
    }

    if df.height() == 0 {
        return Err(LoaderError::EmptyData);
    }

    Ok(df)
}

fn read_header_row(content: &[u8]) -> Result<Vec<String>, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(content);
    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(|field| field.trim().to_string()).collect()),
        None => Err(LoaderError::EmptyData),
    }
}
