use std::fs::File;
use std::path::Path;

use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;

use crate::error::Result;

/// Writes the feature table as parquet for downstream consumers.
pub fn write_parquet(df: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut clone = df.clone();
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Zstd(None))
        .with_statistics(StatisticsOptions::default())
        .finish(&mut clone)?;
    Ok(())
}

/// Writes the feature table as CSV.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut clone = df.clone();
    CsvWriter::new(file).finish(&mut clone)?;
    Ok(())
}
