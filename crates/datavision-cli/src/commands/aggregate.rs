//! Aggregate command - roll a value column up into date buckets.

use std::path::PathBuf;

use colored::Colorize;
use datavision::{FileDecoder, Period, PeriodAggregator, PeriodConfig};

use crate::cli::WeekStartChoice;

pub fn run(
    file: PathBuf,
    date_column: String,
    value_column: String,
    period: String,
    week_start: WeekStartChoice,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = FileDecoder::new().decode_path(&file)?;
    let period = Period::from_name(&period);
    let aggregator = PeriodAggregator::with_config(PeriodConfig {
        week_start: week_start.0,
        ..PeriodConfig::default()
    });

    if verbose {
        eprintln!(
            "Aggregating {} rows of {} by {}",
            table.row_count(),
            file.display(),
            period
        );
    }

    let buckets = aggregator.aggregate(&table.rows, &date_column, &value_column, period);

    if json_output {
        let report = serde_json::json!({ "data": buckets });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} {} {}",
        value_column.white().bold(),
        "by".dimmed(),
        period.to_string().cyan().bold(),
        format!("({})", date_column).dimmed()
    );

    if buckets.is_empty() {
        println!("  {}", "No rows".yellow());
    }
    for bucket in &buckets {
        let label = if bucket.period.is_empty() {
            "(undated)".dimmed().to_string()
        } else {
            bucket.period.clone()
        };
        println!("  {:<20} {}", label, bucket.value);
    }

    Ok(())
}
