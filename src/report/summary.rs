//! Run summary: data volumes and step timings

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde::Serialize;

/// Step timings in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimingInfo {
    pub load_ms: u64,
    pub clean_ms: u64,
    pub encode_ms: u64,
    pub fit_ms: u64,
    pub summarize_ms: u64,
}

impl TimingInfo {
    pub fn total_ms(&self) -> u64 {
        self.load_ms + self.clean_ms + self.encode_ms + self.fit_ms + self.summarize_ms
    }
}

/// Summary of one conjoint run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub rows_dropped: usize,
    pub chosen: usize,
    pub not_chosen: usize,
    pub attributes: usize,
    pub levels: usize,
    pub parameters: usize,
    pub timing: TimingInfo,
}

impl RunSummary {
    pub fn new(rows_loaded: usize) -> Self {
        Self {
            rows_loaded,
            ..Default::default()
        }
    }

    pub fn rows_used(&self) -> usize {
        self.rows_loaded - self.rows_dropped
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.timing.load_ms = elapsed.as_millis() as u64;
    }

    pub fn set_clean_time(&mut self, elapsed: Duration) {
        self.timing.clean_ms = elapsed.as_millis() as u64;
    }

    pub fn set_encode_time(&mut self, elapsed: Duration) {
        self.timing.encode_ms = elapsed.as_millis() as u64;
    }

    pub fn set_fit_time(&mut self, elapsed: Duration) {
        self.timing.fit_ms = elapsed.as_millis() as u64;
    }

    pub fn set_summarize_time(&mut self, elapsed: Duration) {
        self.timing.summarize_ms = elapsed.as_millis() as u64;
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows Loaded"), Cell::new(self.rows_loaded)]);
        table.add_row(vec![
            Cell::new("🗑️  Rows Dropped (Missing)"),
            Cell::new(self.rows_dropped).fg(if self.rows_dropped == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);
        table.add_row(vec![
            Cell::new("✅ Rows Used"),
            Cell::new(self.rows_used())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🍷 Chosen / Not Chosen"),
            Cell::new(format!("{} / {}", self.chosen, self.not_chosen)),
        ]);
        table.add_row(vec![
            Cell::new("🏷️  Attributes / Levels"),
            Cell::new(format!("{} / {}", self.attributes, self.levels)),
        ]);
        table.add_row(vec![
            Cell::new("📐 Parameters"),
            Cell::new(self.parameters),
        ]);
        table.add_row(vec![
            Cell::new("⏱  Total Time"),
            Cell::new(format!("{} ms", self.timing.total_ms())).fg(Color::Cyan),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }
    }
}
