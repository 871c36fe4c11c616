//! Dataset loader for CSV and Parquet survey files

use polars::prelude::*;
use std::path::Path;

use crate::error::{ConjointError, Result};
use crate::utils::{create_spinner, finish_with_success};

/// Load a dataset lazily from a file (CSV or Parquet based on extension).
///
/// `infer_schema_length` only applies to CSV; `0` means a full table scan.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .map_err(|e| {
                ConjointError::DataLoadFailure(format!(
                    "Failed to load CSV file {}: {}",
                    path.display(),
                    e
                ))
            })?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default()).map_err(|e| {
            ConjointError::DataLoadFailure(format!(
                "Failed to load Parquet file {}: {}",
                path.display(),
                e
            ))
        })?,
        _ => {
            return Err(ConjointError::DataLoadFailure(format!(
                "Unsupported file format: '{}'. Supported formats: csv, parquet",
                extension
            )))
        }
    };

    Ok(lf)
}

/// Load and collect a dataset behind a spinner.
///
/// Returns the frame together with its row count, column count and estimated
/// in-memory size in megabytes.
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    if !path.exists() {
        return Err(ConjointError::DataLoadFailure(format!(
            "Input file does not exist: {}",
            path.display()
        )));
    }

    let spinner = create_spinner("Loading dataset...");
    let df = load_dataset(path, infer_schema_length)?
        .collect()
        .map_err(|e| {
            ConjointError::DataLoadFailure(format!("Failed to read {}: {}", path.display(), e))
        })?;

    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    finish_with_success(&spinner, &format!("Loaded {} rows", rows));

    tracing::debug!(rows, cols, memory_mb, path = %path.display(), "dataset loaded");

    Ok((df, rows, cols, memory_mb))
}

/// Read only the column names of a dataset (schema metadata, no row scan)
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let schema = load_dataset(path, 100)?.collect_schema().map_err(|e| {
        ConjointError::DataLoadFailure(format!(
            "Failed to read schema of {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}
