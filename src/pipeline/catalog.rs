//! Attribute catalog: the observed level universe of each product attribute

use polars::prelude::*;
use serde::Serialize;

use super::columns::{column_to_string_vec, require_column};
use crate::error::{ConjointError, Result};

/// Attributes of the reference wine preference survey
pub const DEFAULT_ATTRIBUTES: [&str; 5] = [
    "Price",
    "Brand",
    "Type of Wine",
    "Percentage of Alcohol",
    "Aging time of Wine",
];

/// A product attribute and its distinct observed levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    /// Sorted lexicographically, deduplicated
    pub levels: Vec<String>,
}

impl Attribute {
    /// Build an attribute from raw level values; sorts and deduplicates them
    pub fn new(name: impl Into<String>, levels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut levels: Vec<String> = levels.into_iter().map(Into::into).collect();
        levels.sort();
        levels.dedup();
        Self {
            name: name.into(),
            levels,
        }
    }

    /// Baseline level omitted from the design matrix (smallest in sort order)
    pub fn reference_level(&self) -> Option<&str> {
        self.levels.first().map(String::as_str)
    }

    pub fn has_level(&self, level: &str) -> bool {
        self.levels.binary_search_by(|l| l.as_str().cmp(level)).is_ok()
    }
}

/// One survey response: attribute values in catalog order plus the choice
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub values: Vec<String>,
    pub choice: f64,
}

/// The fixed set of attributes with the levels observed in the data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeCatalog {
    pub attributes: Vec<Attribute>,
}

impl AttributeCatalog {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    /// Discover the levels of each named attribute in a cleaned frame.
    ///
    /// Missing values must already be removed; nulls are skipped here. Each
    /// attribute may be named only once.
    pub fn from_dataframe(df: &DataFrame, attribute_names: &[String]) -> Result<Self> {
        let mut attributes: Vec<Attribute> = Vec::with_capacity(attribute_names.len());

        for name in attribute_names {
            if attributes.iter().any(|a| &a.name == name) {
                return Err(ConjointError::SchemaMismatch(format!(
                    "attribute '{}' is listed more than once",
                    name
                )));
            }
            let values = column_to_string_vec(require_column(df, name)?)?;
            let attribute = Attribute::new(name.clone(), values.into_iter().flatten());
            tracing::debug!(attribute = %name, levels = attribute.levels.len(), "catalogued attribute");
            attributes.push(attribute);
        }

        Ok(Self { attributes })
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.attributes.iter().map(|a| a.name.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Number of profiles in the full factorial design
    pub fn profile_count(&self) -> usize {
        if self.attributes.is_empty() {
            return 0;
        }
        self.attributes.iter().map(|a| a.levels.len()).product()
    }

    /// Every combination of levels, last attribute varying fastest
    pub fn enumerate_profiles(&self) -> Vec<Vec<String>> {
        if self.profile_count() == 0 {
            return Vec::new();
        }

        let mut profiles: Vec<Vec<String>> = vec![Vec::with_capacity(self.attributes.len())];
        for attribute in &self.attributes {
            profiles = profiles
                .into_iter()
                .flat_map(|prefix| {
                    attribute.levels.iter().map(move |level| {
                        let mut next = prefix.clone();
                        next.push(level.clone());
                        next
                    })
                })
                .collect();
        }
        profiles
    }

    /// Turn cleaned rows into observations aligned to this catalog
    pub fn observations(&self, df: &DataFrame, choices: &[f64]) -> Result<Vec<Observation>> {
        if choices.len() != df.height() {
            return Err(ConjointError::SchemaMismatch(format!(
                "{} choice labels for {} rows",
                choices.len(),
                df.height()
            )));
        }

        let columns: Vec<Vec<Option<String>>> = self
            .attributes
            .iter()
            .map(|a| column_to_string_vec(require_column(df, &a.name)?))
            .collect::<Result<_>>()?;

        (0..df.height())
            .map(|row| {
                let values = columns
                    .iter()
                    .zip(&self.attributes)
                    .map(|(col, attribute)| {
                        col[row].clone().ok_or_else(|| {
                            ConjointError::DataLoadFailure(format!(
                                "Attribute '{}' is missing in row {} after cleaning",
                                attribute.name, row
                            ))
                        })
                    })
                    .collect::<Result<Vec<String>>>()?;
                Ok(Observation {
                    values,
                    choice: choices[row],
                })
            })
            .collect()
    }
}
