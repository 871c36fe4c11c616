//! Column access helpers shared by the cleaning and catalog stages

use polars::prelude::*;

use crate::error::{ConjointError, Result};

/// Look up a column, reporting the available columns if it is absent
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| ConjointError::MissingAttributeColumn {
            column: name.to_string(),
            available: df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
}

/// Render a column as optional strings, one entry per row.
///
/// Integers render without a fractional part and floats use Rust's shortest
/// round-trip formatting, so `5.5` stays `5.5` and `12` stays `12`.
pub fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

/// True when a rendered value counts as missing: blank or one of the NA tokens
pub fn is_missing_token(value: &str, na_values: &[String]) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || na_values.iter().any(|na| na == trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_columns_render_as_strings() {
        let df = df! {
            "int" => [12i64, 5],
            "float" => [5.5f64, 18.0],
        }
        .unwrap();

        let ints = column_to_string_vec(df.column("int").unwrap()).unwrap();
        let floats = column_to_string_vec(df.column("float").unwrap()).unwrap();

        assert_eq!(ints, vec![Some("12".to_string()), Some("5".to_string())]);
        assert_eq!(floats, vec![Some("5.5".to_string()), Some("18".to_string())]);
    }

    #[test]
    fn test_nulls_stay_none() {
        let df = df! {
            "brand" => [Some("Ferrari"), None],
        }
        .unwrap();

        let values = column_to_string_vec(df.column("brand").unwrap()).unwrap();
        assert_eq!(values, vec![Some("Ferrari".to_string()), None]);
    }

    #[test]
    fn test_missing_tokens() {
        let na = vec!["NA".to_string()];
        assert!(is_missing_token("", &na));
        assert!(is_missing_token("   ", &na));
        assert!(is_missing_token("NA", &na));
        assert!(is_missing_token(" NA ", &na));
        assert!(!is_missing_token("N/A", &na));
        assert!(!is_missing_token("Red", &na));
    }

    #[test]
    fn test_require_column_reports_available() {
        let df = df! { "Price" => ["Low"] }.unwrap();
        let err = require_column(&df, "Brand").unwrap_err();
        match err {
            ConjointError::MissingAttributeColumn { column, available } => {
                assert_eq!(column, "Brand");
                assert_eq!(available, vec!["Price".to_string()]);
            }
            other => panic!("Expected MissingAttributeColumn, got {other:?}"),
        }
    }
}
