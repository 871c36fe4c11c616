//! Table rendering for the three analysis products

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{AttributeCatalog, FittedModel, ImportanceTable, PartWorthTable};

/// Width of the widest bar in the part-worth and importance charts
const BAR_WIDTH: usize = 24;

fn base_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

/// Horizontal bar proportional to `value / scale`, signed by direction
fn bar(value: f64, scale: f64) -> String {
    if scale <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let len = ((value.abs() / scale) * BAR_WIDTH as f64).round() as usize;
    let glyph = if value < 0.0 { "▒" } else { "█" };
    glyph.repeat(len.min(BAR_WIDTH))
}

/// Part-worth utilities, one row per (attribute, level)
pub fn part_worth_table(part_worths: &PartWorthTable) -> Table {
    let mut table = base_table(&["Attribute", "Level", "Utility", ""]);
    let scale = part_worths.max_abs_utility();

    for entry in &part_worths.entries {
        let color = if entry.is_reference {
            Color::DarkGrey
        } else if entry.utility >= 0.0 {
            Color::Green
        } else {
            Color::Red
        };
        let level = if entry.is_reference {
            format!("{} (ref)", entry.level)
        } else {
            entry.level.clone()
        };
        table.add_row(vec![
            Cell::new(&entry.attribute),
            Cell::new(level),
            Cell::new(format!("{:+.4}", entry.utility))
                .fg(color)
                .set_alignment(CellAlignment::Right),
            Cell::new(bar(entry.utility, scale)).fg(color),
        ]);
    }

    table
}

/// Relative importance, most important attribute first
pub fn importance_table(importance: &ImportanceTable) -> Table {
    let mut table = base_table(&["Attribute", "Range", "Relative Importance (%)", ""]);

    for entry in importance.ranked() {
        table.add_row(vec![
            Cell::new(&entry.attribute),
            Cell::new(format!("{:.4}", entry.range)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", entry.importance_pct))
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
            Cell::new(bar(entry.importance_pct, 100.0)).fg(Color::Cyan),
        ]);
    }

    table
}

/// Coefficient table of the logit fit
pub fn coefficient_table(model: &FittedModel) -> Table {
    let mut table = base_table(&["Term", "Coef", "Std Err", "z", "P>|z|"]);

    for coef in &model.coefficients {
        let p_color = if coef.p_value < 0.05 {
            Color::Green
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(coef.column.to_string()),
            Cell::new(format!("{:.4}", coef.estimate)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", coef.std_error)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", coef.z_value)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", coef.p_value))
                .fg(p_color)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Goodness-of-fit statistics of the logit fit
pub fn fit_statistics_table(model: &FittedModel) -> Table {
    let mut table = base_table(&["Statistic", "Value"]);
    let rows: [(&str, String); 5] = [
        ("Observations", model.n_observations.to_string()),
        ("Iterations", model.iterations.to_string()),
        ("Log-Likelihood", format!("{:.4}", model.log_likelihood)),
        ("LL-Null", format!("{:.4}", model.null_log_likelihood)),
        ("Pseudo R-squ.", format!("{:.4}", model.pseudo_r_squared)),
    ];
    for (name, value) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Full-factorial profiles, capped at `limit` rows
pub fn profile_table(catalog: &AttributeCatalog, limit: usize) -> Table {
    let mut headers: Vec<&str> = vec!["#"];
    headers.extend(catalog.attributes.iter().map(|a| a.name.as_str()));
    let mut table = base_table(&headers);

    for (i, profile) in catalog.enumerate_profiles().into_iter().take(limit).enumerate() {
        let mut row = vec![Cell::new(i + 1)];
        row.extend(profile.into_iter().map(Cell::new));
        table.add_row(row);
    }

    table
}

/// Print a section title followed by an indented table
pub fn print_table(title: &str, table: &Table) {
    println!();
    println!("    {}", style(title).white().bold());
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{AttributeImportance, PartWorth};

    #[test]
    fn test_bar_scales_and_caps() {
        assert_eq!(bar(1.0, 1.0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(0.5, 1.0).chars().count(), BAR_WIDTH / 2);
        assert!(bar(-1.0, 1.0).starts_with('▒'));
        assert!(bar(1.0, 0.0).is_empty());
    }

    #[test]
    fn test_part_worth_table_marks_reference() {
        let table = part_worth_table(&PartWorthTable {
            entries: vec![
                PartWorth {
                    attribute: "Price".to_string(),
                    level: "High".to_string(),
                    utility: 0.0,
                    is_reference: true,
                },
                PartWorth {
                    attribute: "Price".to_string(),
                    level: "Mid".to_string(),
                    utility: 0.75,
                    is_reference: false,
                },
            ],
        });

        let rendered = table.to_string();
        assert!(rendered.contains("High (ref)"));
        assert!(rendered.contains("+0.7500"));
    }

    #[test]
    fn test_importance_table_is_ranked() {
        let table = importance_table(&ImportanceTable {
            entries: vec![
                AttributeImportance {
                    attribute: "Brand".to_string(),
                    range: 0.5,
                    importance_pct: 20.0,
                },
                AttributeImportance {
                    attribute: "Price".to_string(),
                    range: 2.0,
                    importance_pct: 80.0,
                },
            ],
            total_range: 2.5,
        });

        let rendered = table.to_string();
        let price = rendered.find("Price").unwrap();
        let brand = rendered.find("Brand").unwrap();
        assert!(price < brand);
        assert!(rendered.contains("80.00"));
    }
}
