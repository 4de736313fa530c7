//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader}};

/// Every column is read as text. Codes keep their leading zeros, and counts
/// are interpreted (with non-numeric cells becoming zero) only when a topic
/// column is aggregated.
fn text_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Reads a CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReader::new(file)
        .with_options(text_options())
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Read DataFrame from CSV bytes (fetched datasets).
pub(crate) fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    CsvReader::new(Cursor::new(bytes))
        .with_options(text_options())
        .finish()
        .context("[io::csv::read] Failed to read CSV from bytes")
}
