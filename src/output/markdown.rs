//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a harvest run,
//! including the requested range, filters, outcomes and abandoned days.

use crate::config::Config;
use crate::output::stats::HarvestStats;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of a run to `output_path`
///
/// # Arguments
///
/// * `stats` - The run statistics
/// * `config` - The configuration the run used
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(
    stats: &HarvestStats,
    config: &Config,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats, config);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats run statistics as markdown
pub fn format_markdown_summary(stats: &HarvestStats, config: &Config) -> String {
    let mut md = String::new();

    md.push_str("# Guardian Harvest Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Range**: {} to {}\n",
        config.harvest.start_date, config.harvest.end_date
    ));
    md.push_str(&format!("- **Section**: {}\n", config.api.section));
    md.push_str(&format!("- **Tag**: {}\n", config.api.tag));
    md.push_str(&format!(
        "- **Content Type**: {}\n",
        config.api.content_type
    ));
    md.push_str(&format!(
        "- **Tries Threshold**: {}\n",
        config.harvest.tries_threshold
    ));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n\n",
        stats.elapsed.as_secs_f64()
    ));

    md.push_str("## Outcomes\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Work Items | {} |\n", stats.work_items));
    md.push_str(&format!("| Succeeded | {} |\n", stats.succeeded));
    md.push_str(&format!("| Abandoned | {} |\n", stats.abandoned));
    md.push_str(&format!("| Retries | {} |\n", stats.retries));
    md.push_str(&format!("| Records Saved | {} |\n", stats.records_saved));
    md.push_str(&format!("| Failed Writes | {} |\n", stats.save_failures));
    md.push_str(&format!(
        "| Skipped Entries | {} |\n",
        stats.skipped_entries
    ));
    md.push_str(&format!(
        "| Requests | {} / {} |\n\n",
        stats.requests, stats.daily_request_quota
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    if !stats.abandoned_partitions.is_empty() {
        md.push_str("## Abandoned Days\n\n");
        md.push_str("No articles were persisted for these days:\n\n");
        for day in &stats.abandoned_partitions {
            md.push_str(&format!("- {}\n", day));
        }
        md.push('\n');
    }

    if stats.save_failures > 0 {
        md.push_str("## Warnings\n\n");
        md.push_str(&format!(
            "{} records failed to write although their days are counted as succeeded; see the log for ids.\n\n",
            stats.save_failures
        ));
    }

    md
}
