//! Part-worth utilities: fitted coefficients mapped back onto attribute levels

use serde::Serialize;

use super::catalog::AttributeCatalog;
use super::fitter::FittedModel;

/// Utility of one level of one attribute, in log-odds relative to the
/// attribute's reference level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartWorth {
    pub attribute: String,
    pub level: String,
    pub utility: f64,
    pub is_reference: bool,
}

/// Part-worths of every level, grouped by attribute in catalog order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartWorthTable {
    pub entries: Vec<PartWorth>,
}

impl PartWorthTable {
    /// Look up a part-worth by its (attribute, level) pair
    pub fn get(&self, attribute: &str, level: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.attribute == attribute && e.level == level)
            .map(|e| e.utility)
    }

    /// Attribute names in table order, without repeats
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if names.last() != Some(&entry.attribute.as_str()) {
                names.push(&entry.attribute);
            }
        }
        names
    }

    pub fn levels_of<'a>(&'a self, attribute: &'a str) -> impl Iterator<Item = &'a PartWorth> + 'a {
        self.entries.iter().filter(move |e| e.attribute == attribute)
    }

    /// Highest-utility level of each attribute; ties go to the first level
    /// in sorted order
    pub fn ideal_profile(&self) -> Vec<PartWorth> {
        self.attributes()
            .into_iter()
            .filter_map(|attribute| {
                self.levels_of(attribute).fold(None, |best: Option<&PartWorth>, e| match best {
                    Some(b) if b.utility >= e.utility => Some(b),
                    _ => Some(e),
                })
            })
            .cloned()
            .collect()
    }

    /// Largest absolute utility, used to scale bar charts
    pub fn max_abs_utility(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.utility.abs())
            .fold(0.0, f64::max)
    }
}

/// Build the part-worth table from a fitted model.
///
/// Levels with a fitted indicator column take its coefficient; every other
/// level (the reference, or one absent from the fit) gets 0.0.
pub fn extract_part_worths(model: &FittedModel, catalog: &AttributeCatalog) -> PartWorthTable {
    let mut entries = Vec::new();

    for attribute in &catalog.attributes {
        for level in &attribute.levels {
            let fitted = model.coefficient_for(&attribute.name, level);
            entries.push(PartWorth {
                attribute: attribute.name.clone(),
                level: level.clone(),
                utility: fitted.map_or(0.0, |c| c.estimate),
                is_reference: fitted.is_none(),
            });
        }
    }

    PartWorthTable { entries }
}
