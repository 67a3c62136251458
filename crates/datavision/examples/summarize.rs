//! Example: Summarize a numeric column of a tabular file.
//!
//! Usage:
//!   cargo run --example summarize -- <file_path> <value_column> [date_column]
//!
//! Example:
//!   cargo run --example summarize -- sales.csv amount date

use std::env;
use std::fs;

use datavision::{CalculationResult, DataVision, Formula, Period};

fn main() -> datavision::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: cargo run --example summarize -- <file_path> <value_column> [date_column]");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let value_column = &args[2];

    let bytes = fs::read(file_path).map_err(|e| datavision::DataVisionError::Io {
        path: file_path.into(),
        source: e,
    })?;

    let service = DataVision::new();
    let (id, dataset) = service.upload(&bytes, file_path)?;

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Data Vision Summary: {}", file_path);
    println!("{}", separator);
    println!("  Rows:    {}", dataset.row_count());
    println!("  Columns: {}", dataset.headers.join(", "));
    println!();

    let result = service.evaluate_formula(&id, Formula::Statistics, "", value_column)?;
    if let CalculationResult::Statistics { summary, .. } = result {
        println!("## {}", value_column);
        println!("  count   {}", summary.count);
        println!("  sum     {:.4}", summary.sum);
        println!("  average {:.4}", summary.average);
        println!("  median  {:.4}", summary.median);
        println!("  min     {:.4}", summary.min);
        println!("  max     {:.4}", summary.max);
        println!();
    }

    if let Some(date_column) = args.get(3) {
        println!("## Monthly totals");
        for bucket in service.aggregate_period(&id, date_column, value_column, Period::Month)? {
            println!("  {:10} {:>14.2}", bucket.period, bucket.value);
        }
    }

    Ok(())
}
