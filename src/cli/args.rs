//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::pipeline::{ChoiceMapping, FitConfig, DEFAULT_ATTRIBUTES};
use crate::report::default_export_path;

/// Name of the choice column when none is given
pub const DEFAULT_CHOICE_COLUMN: &str = "Choice";

/// Conjoint - Estimate part-worth utilities and attribute importance from choice data
#[derive(Parser, Debug)]
#[command(name = "conjoint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Choice column name (defaults to "Choice").
    /// If the column is missing, it will be selected interactively from available columns.
    #[arg(short, long)]
    pub choice: Option<String>,

    /// Attribute columns to analyze (comma-separated).
    /// Defaults to the five wine attributes.
    #[arg(short, long, value_delimiter = ',')]
    pub attributes: Vec<String>,

    /// Value in choice column that means CHOSEN (maps to 1).
    /// Required with --non-event-value when the choice column is not binary 0/1.
    #[arg(long)]
    pub event_value: Option<String>,

    /// Value in choice column that means NOT CHOSEN (maps to 0).
    /// Required with --event-value when the choice column is not binary 0/1.
    #[arg(long)]
    pub non_event_value: Option<String>,

    /// Tokens treated as missing in attribute columns (comma-separated).
    /// Blank cells are always treated as missing.
    #[arg(long, value_delimiter = ',', default_value = "NA")]
    pub na_values: Vec<String>,

    /// Extra columns whose missing values also drop the row (comma-separated).
    /// Attribute and choice columns are always checked.
    #[arg(long, value_delimiter = ',')]
    pub drop_missing: Vec<String>,

    /// Maximum Newton-Raphson iterations for the logit fit
    #[arg(long, default_value = "35")]
    pub max_iterations: usize,

    /// Convergence tolerance on the largest coefficient step
    #[arg(long, default_value = "1e-8", value_parser = validate_tolerance)]
    pub tolerance: f64,

    /// Ridge penalty on the logit coefficients (0 = plain maximum likelihood).
    /// A small value keeps estimates finite under separation.
    #[arg(long, default_value = "0.0", value_parser = validate_l2_penalty)]
    pub l2_penalty: f64,

    /// JSON export path.
    /// Defaults to input directory with '_conjoint.json' suffix (e.g., wine.csv → wine_conjoint.json).
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Disable the JSON export
    #[arg(long, default_value = "false", conflicts_with = "export")]
    pub no_export: bool,

    /// Print the full-factorial table of candidate profiles
    #[arg(long, default_value = "false")]
    pub show_profiles: bool,

    /// Skip interactive prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Enable debug logging
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Cli {
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// Choice column, falling back to "Choice"
    pub fn choice_column(&self) -> &str {
        self.choice.as_deref().unwrap_or(DEFAULT_CHOICE_COLUMN)
    }

    /// Attribute columns, falling back to the wine attributes
    pub fn attribute_names(&self) -> Vec<String> {
        if self.attributes.is_empty() {
            DEFAULT_ATTRIBUTES.iter().map(|s| s.to_string()).collect()
        } else {
            self.attributes.iter().map(|s| s.trim().to_string()).collect()
        }
    }

    /// Columns checked by the missing value cleaner: attributes, the choice
    /// column, then any --drop-missing columns, without repeats
    pub fn cleaning_columns(&self, choice: &str) -> Vec<String> {
        let mut columns = self.attribute_names();
        let extra = std::iter::once(choice.to_string())
            .chain(self.drop_missing.iter().map(|s| s.trim().to_string()));
        for column in extra {
            if !column.is_empty() && !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }

    /// Export path, derived from the input unless given; `None` when disabled
    pub fn export_path(&self) -> Option<PathBuf> {
        if self.no_export {
            return None;
        }
        let input = self.input.as_ref()?;
        Some(
            self.export
                .clone()
                .unwrap_or_else(|| default_export_path(input)),
        )
    }

    /// Explicit choice mapping from --event-value / --non-event-value
    pub fn choice_mapping(&self) -> Result<Option<ChoiceMapping>> {
        match (&self.event_value, &self.non_event_value) {
            (Some(chosen), Some(not_chosen)) => {
                if chosen == not_chosen {
                    bail!("--event-value and --non-event-value must differ");
                }
                Ok(Some(ChoiceMapping::new(chosen.clone(), not_chosen.clone())))
            }
            (None, None) => Ok(None),
            _ => bail!("--event-value and --non-event-value must be given together"),
        }
    }

    pub fn fit_config(&self) -> FitConfig {
        FitConfig {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            l2_penalty: self.l2_penalty,
        }
    }
}

/// The choice column is the outcome and cannot also be an attribute
pub fn ensure_choice_not_attribute(attributes: &[String], choice: &str) -> Result<()> {
    if attributes.iter().any(|a| a == choice) {
        bail!(
            "Column '{}' is the choice column and cannot also be an attribute",
            choice
        );
    }
    Ok(())
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse()
        .map_err(|_| format!("'{}' is not a valid number", s))
}

/// Validator for tolerance parameter
fn validate_tolerance(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("tolerance must be a positive number, got {}", value))
    }
}

/// Validator for l2_penalty parameter
fn validate_l2_penalty(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("l2_penalty must be zero or positive, got {}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validators() {
        assert_eq!(validate_tolerance("1e-6"), Ok(1e-6));
        assert!(validate_tolerance("0").is_err());
        assert!(validate_tolerance("abc").is_err());
        assert_eq!(validate_l2_penalty("0"), Ok(0.0));
        assert!(validate_l2_penalty("-0.5").is_err());
    }
}
