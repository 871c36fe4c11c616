//! JSON export of a conjoint run

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    AttributeImportance, FitConfig, FittedModel, ImportanceTable, PartWorth, PartWorthTable,
};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the analysis (RFC 3339)
    pub timestamp: String,
    pub conjoint_version: String,
    pub input_file: String,
    pub choice_column: String,
    pub attributes: Vec<String>,
    pub rows_loaded: usize,
    pub rows_used: usize,
    pub fit: FitConfig,
}

/// One coefficient row, keyed by its design column label
#[derive(Serialize)]
pub struct CoefficientEntry {
    pub term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub estimate: f64,
    pub std_error: f64,
    pub z_value: f64,
    pub p_value: f64,
}

#[derive(Serialize)]
pub struct ModelExport {
    pub log_likelihood: f64,
    pub null_log_likelihood: f64,
    pub pseudo_r_squared: f64,
    pub iterations: usize,
    pub n_observations: usize,
    pub coefficients: Vec<CoefficientEntry>,
}

/// Complete conjoint export
#[derive(Serialize)]
pub struct ConjointExport<'a> {
    pub metadata: ExportMetadata,
    pub model: ModelExport,
    pub part_worths: &'a [PartWorth],
    pub importance: Vec<&'a AttributeImportance>,
    pub ideal_profile: Vec<PartWorth>,
}

/// Parameters describing the run for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a Path,
    pub choice_column: &'a str,
    pub attributes: &'a [String],
    pub rows_loaded: usize,
    pub rows_used: usize,
    pub fit: FitConfig,
}

/// Default export location: `<stem>_conjoint.json` next to the input file
pub fn default_export_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "conjoint".to_string());
    input.with_file_name(format!("{}_conjoint.json", stem))
}

fn model_export(model: &FittedModel) -> ModelExport {
    use crate::pipeline::DesignColumn;

    let coefficients = model
        .coefficients
        .iter()
        .map(|c| {
            let (attribute, level) = match &c.column {
                DesignColumn::Intercept => (None, None),
                DesignColumn::Level { attribute, level } => {
                    (Some(attribute.clone()), Some(level.clone()))
                }
            };
            CoefficientEntry {
                term: c.column.to_string(),
                attribute,
                level,
                estimate: c.estimate,
                std_error: c.std_error,
                z_value: c.z_value,
                p_value: c.p_value,
            }
        })
        .collect();

    ModelExport {
        log_likelihood: model.log_likelihood,
        null_log_likelihood: model.null_log_likelihood,
        pseudo_r_squared: model.pseudo_r_squared,
        iterations: model.iterations,
        n_observations: model.n_observations,
        coefficients,
    }
}

/// Build the export document without writing it
pub fn build_export<'a>(
    model: &FittedModel,
    part_worths: &'a PartWorthTable,
    importance: &'a ImportanceTable,
    params: &ExportParams,
) -> ConjointExport<'a> {
    ConjointExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            conjoint_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.display().to_string(),
            choice_column: params.choice_column.to_string(),
            attributes: params.attributes.to_vec(),
            rows_loaded: params.rows_loaded,
            rows_used: params.rows_used,
            fit: params.fit,
        },
        model: model_export(model),
        part_worths: &part_worths.entries,
        importance: importance.ranked(),
        ideal_profile: part_worths.ideal_profile(),
    }
}

/// Write the part-worths, importances and fit to a pretty-printed JSON file
pub fn export_results(
    model: &FittedModel,
    part_worths: &PartWorthTable,
    importance: &ImportanceTable,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = build_export(model, part_worths, importance, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize conjoint results to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write results to {}", output_path.display()))?;

    tracing::debug!(path = %output_path.display(), "export written");
    Ok(())
}
