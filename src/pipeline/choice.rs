//! Choice column analysis and mapping
//!
//! The logit model needs the observed choice as 0/1. Survey exports often
//! store it that way already; otherwise two named values are mapped to
//! chosen (1) and not chosen (0).

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::columns::{column_to_string_vec, require_column};
use crate::error::{ConjointError, Result};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Mapping configuration for converting choice column values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMapping {
    /// Value that maps to 1 (chosen)
    pub chosen_value: String,
    /// Value that maps to 0 (not chosen)
    pub not_chosen_value: String,
}

impl ChoiceMapping {
    pub fn new(chosen_value: String, not_chosen_value: String) -> Self {
        Self {
            chosen_value,
            not_chosen_value,
        }
    }
}

/// Result of analyzing a choice column
#[derive(Debug, Clone)]
pub enum ChoiceAnalysis {
    /// Column is already binary 0/1
    AlreadyBinary,
    /// Column needs mapping - contains these unique values
    NeedsMapping { unique_values: Vec<String> },
}

fn is_zero(v: f64) -> bool {
    v.abs() < TOLERANCE
}

fn is_one(v: f64) -> bool {
    (v - 1.0).abs() < TOLERANCE
}

/// Read a column as numbers, one entry per row.
///
/// String columns qualify when every non-null value parses as a number,
/// which is how a CSV 0/1 column with NA tokens arrives after cleaning.
/// Returns `None` when the column is not numeric.
fn numeric_values(col: &Column) -> Result<Option<Vec<Option<f64>>>> {
    if col.dtype().is_primitive_numeric() || col.dtype() == &DataType::Boolean {
        let float_col = col.cast(&DataType::Float64)?;
        return Ok(Some(float_col.f64()?.into_iter().collect()));
    }
    if col.dtype() != &DataType::String {
        return Ok(None);
    }

    let mut parsed = Vec::with_capacity(col.len());
    for value in col.str()?.into_iter() {
        match value {
            None => parsed.push(None),
            Some(s) => match s.trim().parse::<f64>() {
                Ok(v) => parsed.push(Some(v)),
                Err(_) => return Ok(None),
            },
        }
    }
    Ok(Some(parsed))
}

/// Whether a column value matches a user-supplied mapping value.
///
/// Numbers compare numerically so `1.0` matches a value rendered as `1`.
fn matches_value(actual: &str, expected: &str) -> bool {
    if actual == expected {
        return true;
    }
    match (actual.trim().parse::<f64>(), expected.trim().parse::<f64>()) {
        (Ok(a), Ok(e)) => (a - e).abs() < TOLERANCE,
        _ => false,
    }
}

/// Determine whether a choice column is already binary 0/1
pub fn analyze_choice_column(df: &DataFrame, choice: &str) -> Result<ChoiceAnalysis> {
    let col = require_column(df, choice)?;

    if col.len() == 0 {
        return Err(ConjointError::DataLoadFailure(format!(
            "Choice column '{}' is empty",
            choice
        )));
    }
    if col.null_count() == col.len() {
        return Err(ConjointError::DataLoadFailure(format!(
            "Choice column '{}' contains only null values",
            choice
        )));
    }

    if let Some(values) = numeric_values(col)? {
        let is_binary = values.into_iter().flatten().all(|v| is_zero(v) || is_one(v));
        if is_binary {
            return Ok(ChoiceAnalysis::AlreadyBinary);
        }
    }

    let mut unique_values: Vec<String> = column_to_string_vec(col)?.into_iter().flatten().collect();
    unique_values.sort();
    unique_values.dedup();

    Ok(ChoiceAnalysis::NeedsMapping { unique_values })
}

/// Extract the choice column as 0.0/1.0 labels, one per row.
///
/// Without a mapping the column must already be binary. With a mapping,
/// every row must hold one of the two mapped values; anything else is a
/// load failure since rows are expected to be cleaned beforehand.
pub fn extract_choices(
    df: &DataFrame,
    choice: &str,
    mapping: Option<&ChoiceMapping>,
) -> Result<Vec<f64>> {
    let col = require_column(df, choice)?;

    let labels = match mapping {
        Some(mapping) => column_to_string_vec(col)?
            .iter()
            .enumerate()
            .map(|(row, v)| match v.as_deref() {
                Some(s) if matches_value(s, &mapping.chosen_value) => Ok(1.0),
                Some(s) if matches_value(s, &mapping.not_chosen_value) => Ok(0.0),
                other => Err(ConjointError::DataLoadFailure(format!(
                    "Choice column '{}' row {} holds {:?}, expected '{}' or '{}'",
                    choice, row, other, mapping.chosen_value, mapping.not_chosen_value
                ))),
            })
            .collect::<Result<Vec<f64>>>()?,
        None => {
            if let ChoiceAnalysis::NeedsMapping { unique_values } =
                analyze_choice_column(df, choice)?
            {
                return Err(ConjointError::DataLoadFailure(format!(
                    "Choice column '{}' is not binary 0/1 (values: {:?}). \
                     Provide --event-value and --non-event-value to map it.",
                    choice, unique_values
                )));
            }
            numeric_values(col)?
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(row, v)| match v {
                    Some(v) if is_zero(v) => Ok(0.0),
                    Some(_) => Ok(1.0),
                    None => Err(ConjointError::DataLoadFailure(format!(
                        "Choice column '{}' row {} is missing",
                        choice, row
                    ))),
                })
                .collect::<Result<Vec<f64>>>()?
        }
    };

    Ok(labels)
}

/// Count chosen and not-chosen rows in a label vector
pub fn count_choices(labels: &[f64]) -> (usize, usize) {
    let chosen = labels.iter().filter(|&&y| y == 1.0).count();
    (chosen, labels.len() - chosen)
}
