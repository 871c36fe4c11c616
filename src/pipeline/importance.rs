//! Relative attribute importance from part-worth ranges

use serde::Serialize;

use super::partworth::PartWorthTable;
use crate::error::{ConjointError, Result};

/// Share of total preference variation attributable to one attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeImportance {
    pub attribute: String,
    /// max(utility) - min(utility) over the attribute's levels
    pub range: f64,
    /// range / total_range * 100
    pub importance_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportanceTable {
    /// In part-worth table (catalog) order
    pub entries: Vec<AttributeImportance>,
    pub total_range: f64,
}

impl ImportanceTable {
    pub fn get(&self, attribute: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.attribute == attribute)
            .map(|e| e.importance_pct)
    }

    /// Entries by descending importance; ties keep catalog order
    pub fn ranked(&self) -> Vec<&AttributeImportance> {
        let mut ranked: Vec<&AttributeImportance> = self.entries.iter().collect();
        ranked.sort_by(|a, b| {
            b.importance_pct
                .partial_cmp(&a.importance_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

/// Compute per-attribute utility ranges and normalize them to percentages.
///
/// Fails with `DegenerateModel` when the ranges sum to zero (or are not
/// finite), since the percentages would be undefined.
pub fn compute_importance(part_worths: &PartWorthTable) -> Result<ImportanceTable> {
    let ranges: Vec<(String, f64)> = part_worths
        .attributes()
        .into_iter()
        .map(|attribute| {
            let (min, max) = part_worths
                .levels_of(attribute)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
                    (lo.min(e.utility), hi.max(e.utility))
                });
            (attribute.to_string(), max - min)
        })
        .collect();

    let total_range: f64 = ranges.iter().map(|(_, r)| r).sum();

    if !total_range.is_finite() || total_range <= 0.0 {
        return Err(ConjointError::DegenerateModel(format!(
            "total part-worth range is {} across {} attribute(s); relative importance is undefined",
            total_range,
            ranges.len()
        )));
    }

    let entries = ranges
        .into_iter()
        .map(|(attribute, range)| AttributeImportance {
            attribute,
            range,
            importance_pct: range / total_range * 100.0,
        })
        .collect();

    Ok(ImportanceTable {
        entries,
        total_range,
    })
}
