//! @acp:module "Stats Command"
//! @acp:summary "Report dataset statistics from a bridge_summary.json"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use crate::config::Config;
use crate::model::{read_records, SUMMARY_FILE_NAME};
use crate::stats::DatasetStats;

/// Options for the stats command
#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    /// Summary file; defaults to `<outputDir>/bridge_summary.json`
    pub summary: Option<PathBuf>,
    /// Print JSON instead of text
    pub json: bool,
}

/// Execute the stats command
pub fn execute_stats(options: StatsOptions, config: Config) -> Result<()> {
    let path = options
        .summary
        .unwrap_or_else(|| config.output_dir.join(SUMMARY_FILE_NAME));

    let records = read_records(&path)
        .with_context(|| format!("failed to read summary {}", path.display()))?;
    let stats = DatasetStats::from_records(&records);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{} {}\n", style("→").cyan(), path.display());
        print!("{}", stats.render_text());
    }
    Ok(())
}
