//! Tests for missing value cleaning and choice extraction

use conjoint::error::ConjointError;
use conjoint::pipeline::{
    analyze_choice_column, analyze_missing_values, drop_incomplete_rows, extract_choices,
    load_dataset_with_progress, AttributeCatalog, ChoiceAnalysis, ChoiceMapping, DummyEncoder,
    Encoder, LogisticFitter, NewtonRaphsonFitter,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::names;

#[test]
fn test_drop_rows_with_blank_null_and_na() {
    let df = common::create_incomplete_dataframe();
    let na = names(&["NA"]);

    let outcome = drop_incomplete_rows(&df, &names(&["Price", "Brand"]), &na).unwrap();

    assert_eq!(outcome.rows_before, 6);
    assert_eq!(outcome.rows_dropped, 3);
    assert_eq!(outcome.rows_after(), 3);
    assert_eq!(outcome.df.height(), 3);
}

#[test]
fn test_custom_na_tokens() {
    let df = df! {
        "Price" => ["Low", "?", "High", "n/a"],
        "Choice" => [1i32, 0, 1, 0],
    }
    .unwrap();

    let default_na = drop_incomplete_rows(&df, &names(&["Price"]), &names(&["NA"])).unwrap();
    assert_eq!(default_na.rows_dropped, 0);

    let custom = drop_incomplete_rows(&df, &names(&["Price"]), &names(&["?", "n/a"])).unwrap();
    assert_eq!(custom.rows_dropped, 2);
}

#[test]
fn test_only_listed_columns_are_checked() {
    let df = df! {
        "Price" => ["Low", "High", "Low"],
        "Comment" => [None::<&str>, None, Some("nice")],
        "Choice" => [1i32, 0, 1],
    }
    .unwrap();

    let outcome = drop_incomplete_rows(&df, &names(&["Price", "Choice"]), &names(&["NA"])).unwrap();

    assert_eq!(outcome.rows_dropped, 0);
}

#[test]
fn test_missing_attribute_column() {
    let df = common::create_graded_price_dataframe();

    let result = drop_incomplete_rows(&df, &names(&["Price", "Vintage"]), &names(&["NA"]));

    match result {
        Err(ConjointError::MissingAttributeColumn { column, available }) => {
            assert_eq!(column, "Vintage");
            assert!(available.contains(&"Price".to_string()));
        }
        other => panic!("expected MissingAttributeColumn, got {:?}", other.map(|o| o.df)),
    }
}

#[test]
fn test_missing_counts_per_column() {
    let df = common::create_incomplete_dataframe();

    let counts = analyze_missing_values(&df, &names(&["NA"])).unwrap();

    assert_eq!(
        counts,
        vec![
            ("Price".to_string(), 2),
            ("Brand".to_string(), 1),
            ("Choice".to_string(), 0)
        ]
    );
}

#[test]
fn test_cleaning_after_csv_round_trip() {
    let mut df = common::create_incomplete_dataframe();
    let (_temp_dir, csv_path) = common::create_temp_csv(&mut df);

    let (loaded, _, _, _) = load_dataset_with_progress(&csv_path, 100).unwrap();
    let outcome =
        drop_incomplete_rows(&loaded, &names(&["Price", "Brand"]), &names(&["NA"])).unwrap();

    assert_eq!(outcome.rows_after(), 3);
}

#[test]
fn test_string_choice_column_needs_mapping() {
    let df = df! {
        "Choice" => ["Yes", "No", "No", "Yes"],
    }
    .unwrap();

    match analyze_choice_column(&df, "Choice").unwrap() {
        ChoiceAnalysis::NeedsMapping { unique_values } => {
            assert_eq!(unique_values, names(&["No", "Yes"]))
        }
        ChoiceAnalysis::AlreadyBinary => panic!("string column reported as binary"),
    }

    assert!(matches!(
        extract_choices(&df, "Choice", None),
        Err(ConjointError::DataLoadFailure(_))
    ));

    let mapping = ChoiceMapping::new("Yes".to_string(), "No".to_string());
    let labels = extract_choices(&df, "Choice", Some(&mapping)).unwrap();
    assert_eq!(labels, vec![1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_binary_choice_column() {
    let df = common::create_graded_price_dataframe();

    assert!(matches!(
        analyze_choice_column(&df, "Choice").unwrap(),
        ChoiceAnalysis::AlreadyBinary
    ));
    let labels = extract_choices(&df, "Choice", None).unwrap();
    assert_eq!(labels.iter().sum::<f64>(), 12.0);
}

#[test]
fn test_na_in_choice_column_is_cleaned_then_fitted() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("choice_na.csv");
    let mut rows = vec!["Price,Choice".to_string()];
    for (price, choice) in [
        ("High", "1"),
        ("High", "0"),
        ("High", "1"),
        ("High", "NA"),
        ("Low", "0"),
        ("Low", "1"),
        ("Low", "0"),
        ("Low", "0"),
    ] {
        rows.push(format!("{},{}", price, choice));
    }
    std::fs::write(&csv_path, rows.join("\n") + "\n").unwrap();

    let (df, _, _, _) = load_dataset_with_progress(&csv_path, 100).unwrap();
    let outcome = drop_incomplete_rows(&df, &names(&["Price", "Choice"]), &names(&["NA"])).unwrap();
    assert_eq!(outcome.rows_after(), 7);

    assert!(matches!(
        analyze_choice_column(&outcome.df, "Choice").unwrap(),
        ChoiceAnalysis::AlreadyBinary
    ));
    let labels = extract_choices(&outcome.df, "Choice", None).unwrap();
    assert_eq!(labels, vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0]);

    let catalog = AttributeCatalog::from_dataframe(&outcome.df, &names(&["Price"])).unwrap();
    let observations = catalog.observations(&outcome.df, &labels).unwrap();
    let design = DummyEncoder::new(&catalog).encode(&observations).unwrap();
    let model = NewtonRaphsonFitter::default().fit(&design, &labels).unwrap();
    assert_eq!(model.n_observations, 7);
}

#[test]
fn test_row_missing_only_an_extra_column_is_dropped() {
    let df = df! {
        "Price" => ["Low", "High", "Low", "High"],
        "Physical Activities" => [Some("Running"), Some(" "), Some("NA"), Some("Yoga")],
        "Choice" => [1i32, 0, 1, 0],
    }
    .unwrap();

    let attributes_only = drop_incomplete_rows(&df, &names(&["Price", "Choice"]), &names(&["NA"])).unwrap();
    assert_eq!(attributes_only.rows_dropped, 0);

    let with_extra = drop_incomplete_rows(
        &df,
        &names(&["Price", "Choice", "Physical Activities"]),
        &names(&["NA"]),
    )
    .unwrap();
    assert_eq!(with_extra.rows_dropped, 2);
    assert_eq!(
        extract_choices(&with_extra.df, "Choice", None).unwrap(),
        vec![1.0, 0.0]
    );
}
