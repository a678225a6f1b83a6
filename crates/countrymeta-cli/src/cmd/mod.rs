//! Subcommands

use std::path::PathBuf;

use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use crate::config::Config;

pub mod build;
pub mod cache;
pub mod fetch;
pub mod reshape;

/// Directory overrides shared by the pipeline subcommands
#[derive(Args, Debug)]
pub struct DirArgs {
    /// Output directory for the JSON artifacts
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Build directory holding the relation cache
    #[arg(short, long)]
    pub build_dir: Option<PathBuf>,
}

impl DirArgs {
    pub fn output_dir(&self, config: &Config) -> PathBuf {
        self.output.clone().unwrap_or_else(|| config.output.dir.clone())
    }

    pub fn build_dir(&self, config: &Config) -> PathBuf {
        self.build_dir
            .clone()
            .unwrap_or_else(|| config.build.dir.clone())
    }
}

/// Two-column table in the house style.
pub fn key_value_table(header: (&str, &str), rows: &[(&str, String)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(header.0).fg(Color::Cyan),
            Cell::new(header.1).fg(Color::Cyan),
        ]);
    for (key, value) in rows {
        table.add_row(vec![*key, value.as_str()]);
    }
    table
}

/// Summary rows for a finished fetch phase.
pub fn fetch_rows(summary: &countrymeta_fetch::FetchSummary) -> Vec<(&'static str, String)> {
    let o = &summary.outcome;
    vec![
        ("Requested", summary.discovered.to_string()),
        ("Indexed", o.index.len().to_string()),
        ("Retried", o.retried.to_string()),
        (
            "Dropped",
            format!(
                "{} (empty {}, invalid {}, rejected {}, exhausted {})",
                o.dropped(),
                o.empty,
                o.invalid,
                o.rejected,
                o.exhausted
            ),
        ),
        ("Fetch time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
    ]
}
