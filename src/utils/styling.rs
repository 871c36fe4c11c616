//! Terminal styling utilities for the analysis run

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static TAG: Emoji<'_, '_> = Emoji("🏷️  ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     ___  ___   _ __   (_)  ___  (_) _ __  | |_
    / __|/ _ \ | '_ \  | | / _ \ | || '_ \ | __|
   | (__| (_) || | | | | || (_) || || | | || |_
    \___|\___/ |_| |_|_/ | \___/ |_||_| |_| \__|
                     |__/
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("β").magenta().bold(),
        style("Part-worth utilities from choice data").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Settings shown on the configuration card
pub struct RunCard<'a> {
    pub input: &'a Path,
    pub choice: &'a str,
    pub attributes: &'a [String],
    pub export: Option<&'a Path>,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub l2_penalty: f64,
}

/// Print configuration card
pub fn print_config(card: &RunCard<'_>) {
    let box_width = 60;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!("    │ {}", style("Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!("    │  {} Input:  {}", FOLDER, truncate_path(card.input, 42));
    println!("    │  {} Choice: {}", TARGET, truncate_string(card.choice, 42));
    println!(
        "    │  {} Export: {}",
        SAVE,
        card.export
            .map(|p| truncate_path(p, 42))
            .unwrap_or_else(|| "disabled".to_string())
    );
    println!("    ├{}┤", line);
    println!("    │  {} Attributes:", TAG);
    for attribute in card.attributes {
        println!("    │      {} {}", style("•").dim(), truncate_string(attribute, 44));
    }
    println!("    ├{}┤", line);
    println!(
        "    │  {} Max iterations: {}   Tolerance: {}   L2: {}",
        GEAR,
        style(card.max_iterations).yellow(),
        style(format!("{:e}", card.tolerance)).yellow(),
        style(card.l2_penalty).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}",
        style(format!("⏱  {:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Conjoint analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(info) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
