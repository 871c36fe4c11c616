//! Missing value analysis and row cleaning

use polars::prelude::*;

use super::columns::{column_to_string_vec, is_missing_token, require_column};
use crate::error::Result;

/// Result of dropping incomplete rows
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    /// Frame with every incomplete row removed
    pub df: DataFrame,
    pub rows_before: usize,
    pub rows_dropped: usize,
}

impl CleaningOutcome {
    pub fn rows_after(&self) -> usize {
        self.rows_before - self.rows_dropped
    }
}

/// Count missing values per column, in column order.
///
/// A value is missing when it is null, blank, or equal to one of `na_values`
/// after trimming.
pub fn analyze_missing_values(df: &DataFrame, na_values: &[String]) -> Result<Vec<(String, usize)>> {
    let mut counts = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let missing = count_missing(col, na_values)?;
        counts.push((col.name().to_string(), missing));
    }

    Ok(counts)
}

fn count_missing(col: &Column, na_values: &[String]) -> Result<usize> {
    // Only string columns can hold blank or NA tokens
    if col.dtype() != &DataType::String {
        return Ok(col.null_count());
    }

    Ok(column_to_string_vec(col)?
        .iter()
        .filter(|v| v.as_deref().map_or(true, |s| is_missing_token(s, na_values)))
        .count())
}

/// Drop every row with a missing value in any of `columns`.
///
/// Errors with `MissingAttributeColumn` if one of the columns is absent.
pub fn drop_incomplete_rows(
    df: &DataFrame,
    columns: &[String],
    na_values: &[String],
) -> Result<CleaningOutcome> {
    let rows_before = df.height();
    let mut keep = vec![true; rows_before];

    for name in columns {
        let values = column_to_string_vec(require_column(df, name)?)?;
        for (row, value) in values.iter().enumerate() {
            let missing = value
                .as_deref()
                .map_or(true, |s| is_missing_token(s, na_values));
            if missing {
                keep[row] = false;
            }
        }
    }

    let rows_dropped = keep.iter().filter(|k| !**k).count();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let cleaned = df.filter(&mask)?;

    tracing::debug!(rows_before, rows_dropped, "dropped incomplete rows");

    Ok(CleaningOutcome {
        df: cleaned,
        rows_before,
        rows_dropped,
    })
}
