//! Interactive prompts using dialoguer

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Select};

/// Let the user pick the choice column from the dataset's columns
pub fn select_choice_column(columns: &[String], missing: &str) -> Result<String> {
    if columns.is_empty() {
        bail!("Dataset has no columns to choose from");
    }
    let prompt = format!("Column '{}' not found. Select the choice column", missing);
    let idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(columns)
        .default(0)
        .interact()?;
    Ok(columns[idx].clone())
}

/// Let the user pick which of the choice column's values means "chosen".
///
/// Only offered for two-valued columns; the other value maps to not chosen.
pub fn select_chosen_value(column: &str, values: &[String]) -> Result<(String, String)> {
    if values.len() != 2 {
        bail!(
            "Choice column '{}' has {} distinct values; exactly two are required",
            column,
            values.len()
        );
    }
    let prompt = format!("Which value of '{}' means CHOSEN (1)?", column);
    let idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(values)
        .default(0)
        .interact()?;
    Ok((values[idx].clone(), values[1 - idx].clone()))
}
