//! Dummy (treatment) encoding of categorical attributes into a design matrix
//!
//! Each attribute contributes one indicator column per non-reference level;
//! the reference level is the first level in sorted order and is encoded as
//! all zeros. Column 0 is a constant intercept.

use std::collections::HashMap;
use std::fmt;

use faer::Mat;
use serde::Serialize;

use super::catalog::{Attribute, AttributeCatalog, Observation};
use crate::error::{ConjointError, Result};

/// A single column of the design matrix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DesignColumn {
    Intercept,
    Level { attribute: String, level: String },
}

impl fmt::Display for DesignColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignColumn::Intercept => write!(f, "const"),
            DesignColumn::Level { attribute, level } => write!(f, "{}_{}", attribute, level),
        }
    }
}

/// Column order of a design matrix and the (attribute, level) lookup into it
#[derive(Debug, Clone, PartialEq)]
pub struct DesignLayout {
    columns: Vec<DesignColumn>,
    index: HashMap<(String, String), usize>,
    /// Attributes with the level universe the layout was built from
    universe: Vec<Attribute>,
}

impl DesignLayout {
    /// Build the layout for a catalog: intercept first, then each attribute's
    /// non-reference levels in sorted order
    pub fn from_catalog(catalog: &AttributeCatalog) -> Self {
        let mut columns = vec![DesignColumn::Intercept];
        let mut index = HashMap::new();

        for attribute in &catalog.attributes {
            for level in attribute.levels.iter().skip(1) {
                index.insert((attribute.name.clone(), level.clone()), columns.len());
                columns.push(DesignColumn::Level {
                    attribute: attribute.name.clone(),
                    level: level.clone(),
                });
            }
        }

        Self {
            columns,
            index,
            universe: catalog.attributes.clone(),
        }
    }

    pub fn columns(&self) -> &[DesignColumn] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Column index of an (attribute, level) indicator; `None` for reference
    /// levels and levels outside the universe
    pub fn column_index(&self, attribute: &str, level: &str) -> Option<usize> {
        self.index.get(&(attribute.to_string(), level.to_string())).copied()
    }

    pub fn attribute_count(&self) -> usize {
        self.universe.len()
    }

    /// Encode attribute values (catalog order) into one design row
    fn encode_values(&self, values: &[String]) -> Result<Vec<f64>> {
        if values.len() != self.universe.len() {
            return Err(ConjointError::SchemaMismatch(format!(
                "expected {} attribute values, got {}",
                self.universe.len(),
                values.len()
            )));
        }

        let mut row = vec![0.0; self.columns.len()];
        row[0] = 1.0;

        for (attribute, value) in self.universe.iter().zip(values) {
            if !attribute.has_level(value) {
                return Err(ConjointError::SchemaMismatch(format!(
                    "level '{}' of attribute '{}' was not seen when fitting (known levels: {:?})",
                    value, attribute.name, attribute.levels
                )));
            }
            if let Some(&col) = self.index.get(&(attribute.name.clone(), value.clone())) {
                row[col] = 1.0;
            }
        }

        Ok(row)
    }
}

/// Numeric design matrix: one row per observation, columns per the layout
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    pub layout: DesignLayout,
    pub x: Mat<f64>,
}

impl DesignMatrix {
    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    pub fn row(&self, i: usize) -> Vec<f64> {
        (0..self.x.ncols()).map(|j| self.x[(i, j)]).collect()
    }
}

/// Converts observations into a design matrix
pub trait Encoder {
    fn layout(&self) -> &DesignLayout;

    fn encode(&self, observations: &[Observation]) -> Result<DesignMatrix>;

    /// Encode a single profile (attribute values in catalog order)
    fn encode_profile(&self, profile: &[String]) -> Result<Vec<f64>>;
}

/// Treatment-coded encoder with the first sorted level of each attribute as
/// the reference
#[derive(Debug, Clone)]
pub struct DummyEncoder {
    layout: DesignLayout,
}

impl DummyEncoder {
    /// The catalog must come from the same data that will be fitted
    pub fn new(catalog: &AttributeCatalog) -> Self {
        Self {
            layout: DesignLayout::from_catalog(catalog),
        }
    }
}

impl Encoder for DummyEncoder {
    fn layout(&self) -> &DesignLayout {
        &self.layout
    }

    fn encode(&self, observations: &[Observation]) -> Result<DesignMatrix> {
        let width = self.layout.width();
        let mut x = Mat::<f64>::zeros(observations.len(), width);

        for (i, obs) in observations.iter().enumerate() {
            let row = self.layout.encode_values(&obs.values)?;
            for (j, value) in row.into_iter().enumerate() {
                x[(i, j)] = value;
            }
        }

        tracing::debug!(rows = observations.len(), columns = width, "encoded design matrix");

        Ok(DesignMatrix {
            layout: self.layout.clone(),
            x,
        })
    }

    fn encode_profile(&self, profile: &[String]) -> Result<Vec<f64>> {
        self.layout.encode_values(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::catalog::Attribute;

    fn catalog() -> AttributeCatalog {
        AttributeCatalog::new(vec![
            Attribute::new("Price", ["Low", "Mid", "High"]),
            Attribute::new("Brand", ["A", "B"]),
        ])
    }

    fn obs(values: &[&str], choice: f64) -> Observation {
        Observation {
            values: values.iter().map(|s| s.to_string()).collect(),
            choice,
        }
    }

    #[test]
    fn test_layout_drops_first_sorted_level() {
        let layout = DesignLayout::from_catalog(&catalog());
        let names: Vec<String> = layout.columns().iter().map(|c| c.to_string()).collect();

        // Sorted Price levels are High, Low, Mid: High is the reference
        assert_eq!(names, vec!["const", "Price_Low", "Price_Mid", "Brand_B"]);
        assert_eq!(layout.column_index("Price", "High"), None);
        assert_eq!(layout.column_index("Brand", "B"), Some(3));
    }

    #[test]
    fn test_encode_rows() {
        let encoder = DummyEncoder::new(&catalog());
        let design = encoder
            .encode(&[obs(&["Mid", "B"], 1.0), obs(&["High", "A"], 0.0)])
            .unwrap();

        assert_eq!(design.nrows(), 2);
        assert_eq!(design.ncols(), 4);
        assert_eq!(design.row(0), vec![1.0, 0.0, 1.0, 1.0]);
        assert_eq!(design.row(1), vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unseen_level_is_schema_mismatch() {
        let encoder = DummyEncoder::new(&catalog());
        let result = encoder.encode_profile(&["Premium".to_string(), "A".to_string()]);
        match result {
            Err(ConjointError::SchemaMismatch(msg)) => {
                assert!(msg.contains("Premium"));
                assert!(msg.contains("Price"));
            }
            other => panic!("Expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_profile_arity_is_checked() {
        let encoder = DummyEncoder::new(&catalog());
        let result = encoder.encode_profile(&["Low".to_string()]);
        assert!(matches!(result, Err(ConjointError::SchemaMismatch(_))));
    }

    #[test]
    fn test_single_level_attribute_adds_no_columns() {
        let catalog = AttributeCatalog::new(vec![
            Attribute::new("Price", ["Low", "High"]),
            Attribute::new("Region", ["Trentino"]),
        ]);
        let layout = DesignLayout::from_catalog(&catalog);
        assert_eq!(layout.width(), 2);
        assert_eq!(layout.attribute_count(), 2);
    }
}
