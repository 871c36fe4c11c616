//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Wine survey with a closed-form logit solution.
///
/// Price levels sort as "1-Low" < "2-Mid" < "3-High", so "1-Low" is the
/// reference. Choice rates are 2/8, 4/8 and 6/8 per price level and each
/// price level is split evenly between brands A and B, so:
/// - intercept = logit(0.25)
/// - Price "2-Mid" = logit(0.5) - logit(0.25) = ln 3
/// - Price "3-High" = logit(0.75) - logit(0.25) = 2 ln 3
/// - Brand "B" = 0
pub fn create_graded_price_dataframe() -> DataFrame {
    let mut price = Vec::new();
    let mut brand = Vec::new();
    let mut choice = Vec::new();

    let patterns: [(&str, [i32; 8]); 3] = [
        ("1-Low", [1, 1, 0, 0, 0, 0, 0, 0]),
        ("2-Mid", [1, 1, 0, 0, 1, 1, 0, 0]),
        ("3-High", [1, 1, 1, 1, 1, 1, 0, 0]),
    ];
    for (level, outcomes) in patterns {
        for (i, chosen) in outcomes.iter().enumerate() {
            price.push(level);
            brand.push(if i % 2 == 0 { "A" } else { "B" });
            choice.push(*chosen);
        }
    }

    df! {
        "Price" => price,
        "Brand" => brand,
        "Choice" => choice,
    }
    .unwrap()
}

/// Level universe of the five wine attributes used by the random fixtures
pub fn wine_levels() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("Price", vec!["Low", "Medium", "High"]),
        ("Brand", vec!["Cellar", "Estate", "Reserve"]),
        ("Type of Wine", vec!["Red", "Rose", "White"]),
        ("Percentage of Alcohol", vec!["11", "12.5", "14"]),
        ("Aging time of Wine", vec!["1 year", "3 years", "5 years"]),
    ]
}

/// Random wine survey with independent 50/50 choices (no real preference)
pub fn create_random_wine_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut columns: Vec<Column> = Vec::new();

    for (name, levels) in wine_levels() {
        let values: Vec<&str> = (0..rows)
            .map(|_| levels[rng.gen_range(0..levels.len())])
            .collect();
        columns.push(Column::new(name.into(), values));
    }
    let choice: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("Choice".into(), choice));

    DataFrame::new(columns).unwrap()
}

/// Survey where Brand A is always chosen and Brand B never is
pub fn create_separable_dataframe(per_brand: usize) -> DataFrame {
    let mut brand = Vec::new();
    let mut price = Vec::new();
    let mut choice = Vec::new();

    for (b, chosen) in [("A", 1i32), ("B", 0)] {
        for i in 0..per_brand {
            brand.push(b);
            price.push(if i % 2 == 0 { "High" } else { "Low" });
            choice.push(chosen);
        }
    }

    df! {
        "Brand" => brand,
        "Price" => price,
        "Choice" => choice,
    }
    .unwrap()
}

/// Survey with blank and NA attribute values scattered through it
pub fn create_incomplete_dataframe() -> DataFrame {
    df! {
        "Price" => [Some("Low"), Some("High"), None, Some("NA"), Some("Low"), Some("High")],
        "Brand" => [Some("A"), Some("  "), Some("B"), Some("A"), Some("B"), Some("A")],
        "Choice" => [1i32, 0, 1, 0, 0, 1],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("wine_survey.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("wine_survey.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Assert two floats agree to within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64, what: &str) {
    assert!(
        (actual - expected).abs() < tol,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}
