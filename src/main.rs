//! Conjoint: part-worth and importance CLI
//!
//! Loads a choice-based survey, fits a binary logit on dummy-coded product
//! attributes and reports part-worth utilities and attribute importance.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use conjoint::cli::{
    ensure_choice_not_attribute, select_choice_column, select_chosen_value, Cli,
};
use conjoint::pipeline::{
    analyze_choice_column, analyze_missing_values, compute_importance, count_choices,
    drop_incomplete_rows, extract_choices, extract_part_worths, load_dataset_with_progress,
    simulate_profile, AttributeCatalog, ChoiceAnalysis, ChoiceMapping, DummyEncoder, Encoder,
    LogisticFitter, NewtonRaphsonFitter,
};
use conjoint::report::{
    coefficient_table, export_results, fit_statistics_table, importance_table, part_worth_table,
    print_table, profile_table, ExportParams, RunSummary,
};
use conjoint::utils::{
    create_spinner, finish_with_success, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success, print_warning,
    RunCard,
};

/// Profiles listed by --show-profiles before the table is cut off
const PROFILE_DISPLAY_LIMIT: usize = 500;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("conjoint=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let attributes = cli.attribute_names();
    let export_path = cli.export_path();
    let fit_config = cli.fit_config();
    let explicit_mapping = cli.choice_mapping()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&RunCard {
        input,
        choice: cli.choice_column(),
        attributes: &attributes,
        export: export_path.as_deref(),
        max_iterations: fit_config.max_iterations,
        tolerance: fit_config.tolerance,
        l2_penalty: fit_config.l2_penalty,
    });

    // Step 1: Load dataset
    let step_start = Instant::now();
    println!();
    let (df, rows, cols, memory_mb) = load_dataset_with_progress(input, cli.infer_schema_length)?;
    print_success("Dataset loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    let mut summary = RunSummary::new(rows);
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Resolve the choice column
    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let choice = if column_names.iter().any(|c| c == cli.choice_column()) {
        cli.choice_column().to_string()
    } else if cli.no_confirm {
        anyhow::bail!(
            "Choice column '{}' not found in dataset. Available columns: {:?}",
            cli.choice_column(),
            column_names
        );
    } else {
        select_choice_column(&column_names, cli.choice_column())?
    };

    // Step 2: Missing values
    print_step_header(1, "Missing Value Cleaning");

    let step_start = Instant::now();
    ensure_choice_not_attribute(&attributes, &choice)?;
    let required = cli.cleaning_columns(&choice);

    let spinner = create_spinner("Scanning for missing values...");
    let missing_counts = analyze_missing_values(&df, &cli.na_values)?;
    let outcome = drop_incomplete_rows(&df, &required, &cli.na_values)?;
    finish_with_success(&spinner, "Missing value scan complete");

    for (column, count) in missing_counts
        .iter()
        .filter(|(column, count)| *count > 0 && required.contains(column))
    {
        print_count(
            "missing value(s) in",
            *count,
            Some(&format!("'{}'", column)),
        );
    }
    if outcome.rows_dropped == 0 {
        print_info("No incomplete rows found");
    } else {
        print_warning(&format!(
            "Dropped {} incomplete row(s), {} remain",
            outcome.rows_dropped,
            outcome.rows_after()
        ));
    }
    summary.rows_dropped = outcome.rows_dropped;
    let df = outcome.df;
    let clean_elapsed = step_start.elapsed();
    summary.set_clean_time(clean_elapsed);
    print_step_time(clean_elapsed);

    // Step 3: Choices and attribute catalog
    print_step_header(2, "Attribute Catalog & Encoding");

    let step_start = Instant::now();
    let mapping = match explicit_mapping {
        Some(mapping) => Some(mapping),
        None => match analyze_choice_column(&df, &choice)? {
            ChoiceAnalysis::AlreadyBinary => None,
            ChoiceAnalysis::NeedsMapping { unique_values } if !cli.no_confirm => {
                let (chosen, not_chosen) = select_chosen_value(&choice, &unique_values)?;
                Some(ChoiceMapping::new(chosen, not_chosen))
            }
            ChoiceAnalysis::NeedsMapping { .. } => None,
        },
    };
    let choices = extract_choices(&df, &choice, mapping.as_ref())?;
    let (chosen, not_chosen) = count_choices(&choices);
    summary.chosen = chosen;
    summary.not_chosen = not_chosen;
    print_info(&format!("{} chosen / {} not chosen", chosen, not_chosen));

    let catalog = AttributeCatalog::from_dataframe(&df, &attributes)?;
    for attribute in &catalog.attributes {
        print_count(
            "level(s) of",
            attribute.levels.len(),
            Some(&format!("'{}'", attribute.name)),
        );
    }
    print_info(&format!(
        "{} profiles in the full factorial design",
        catalog.profile_count()
    ));
    if cli.show_profiles {
        print_table(
            "Candidate Profiles",
            &profile_table(&catalog, PROFILE_DISPLAY_LIMIT),
        );
        if catalog.profile_count() > PROFILE_DISPLAY_LIMIT {
            print_info(&format!("Showing first {} profiles", PROFILE_DISPLAY_LIMIT));
        }
    }

    let encoder = DummyEncoder::new(&catalog);
    let observations = catalog.observations(&df, &choices)?;
    let design = encoder.encode(&observations)?;
    summary.attributes = catalog.len();
    summary.levels = catalog.attributes.iter().map(|a| a.levels.len()).sum();
    summary.parameters = design.ncols();
    print_success(&format!(
        "Encoded {} x {} design matrix",
        design.nrows(),
        design.ncols()
    ));
    let encode_elapsed = step_start.elapsed();
    summary.set_encode_time(encode_elapsed);
    print_step_time(encode_elapsed);

    // Step 4: Logit fit
    print_step_header(3, "Logit Model Fit");

    let step_start = Instant::now();
    let spinner = create_spinner("Fitting logit model...");
    let fitter = NewtonRaphsonFitter::new(fit_config);
    let labels: Vec<f64> = observations.iter().map(|o| o.choice).collect();
    let model = fitter.fit(&design, &labels).context("Logit model fit failed")?;
    finish_with_success(
        &spinner,
        &format!("Converged in {} iteration(s)", model.iterations),
    );
    print_table("Fit Statistics", &fit_statistics_table(&model));
    print_table("Coefficients", &coefficient_table(&model));
    let fit_elapsed = step_start.elapsed();
    summary.set_fit_time(fit_elapsed);
    print_step_time(fit_elapsed);

    // Step 5: Part-worths and importance
    print_step_header(4, "Part-Worths & Importance");

    let step_start = Instant::now();
    let part_worths = extract_part_worths(&model, &catalog);
    let importance = compute_importance(&part_worths)?;
    print_table("Part-Worth Utilities", &part_worth_table(&part_worths));
    print_table("Relative Importance", &importance_table(&importance));

    let ideal = part_worths.ideal_profile();
    let ideal_levels: Vec<String> = ideal.iter().map(|p| p.level.clone()).collect();
    let score = simulate_profile(&encoder, &model, &ideal_levels)?;
    println!();
    println!("    {} Ideal Profile:", style("★").yellow());
    for entry in &ideal {
        println!(
            "      {}: {}",
            style(&entry.attribute).dim(),
            style(&entry.level).green().bold()
        );
    }
    println!(
        "      Utility {:+.4}, choice probability {:.1}%",
        score.utility,
        score.probability * 100.0
    );
    let summarize_elapsed = step_start.elapsed();
    summary.set_summarize_time(summarize_elapsed);
    print_step_time(summarize_elapsed);

    // Step 6: Export
    if let Some(path) = &export_path {
        print_step_header(5, "Export Results");
        let spinner = create_spinner("Writing JSON export...");
        export_results(
            &model,
            &part_worths,
            &importance,
            path,
            &ExportParams {
                input_file: input,
                choice_column: &choice,
                attributes: &catalog.names(),
                rows_loaded: summary.rows_loaded,
                rows_used: summary.rows_used(),
                fit: fit_config,
            },
        )?;
        finish_with_success(&spinner, &format!("Saved to {}", path.display()));
    }

    summary.display();
    print_completion();

    Ok(())
}
