//! Calc command - evaluate a formula against a file.

use std::path::PathBuf;

use colored::Colorize;
use datavision::analysis::evaluate;
use datavision::{CalculationResult, FileDecoder, Formula};

pub fn run(
    file: PathBuf,
    formula: String,
    column_x: String,
    column_y: String,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = FileDecoder::new().decode_path(&file)?;
    let formula = Formula::from_name(&formula);
    if verbose {
        eprintln!(
            "Evaluating {} over {} rows of {}",
            formula,
            table.row_count(),
            file.display()
        );
    }

    let result = evaluate(&table.rows, formula, &column_x, &column_y);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        formula.to_string().cyan().bold(),
        "of".dimmed(),
        column_y.white().bold()
    );
    print_result(&result);

    Ok(())
}

fn print_result(result: &CalculationResult) {
    match result {
        CalculationResult::Single(value) => println!("  {}", value.to_string().green().bold()),
        CalculationResult::Grouped(groups) => {
            for group in groups {
                println!("  {:<24} {}", group.name, group.value);
            }
        }
        CalculationResult::Trend(points) => {
            for point in points {
                println!("  {:<24} {}", point.x.to_string(), point.y);
            }
        }
        CalculationResult::Compare(entries) => {
            for entry in entries {
                println!("  {:<24} {}", entry.category.to_string(), entry.value);
            }
        }
        CalculationResult::Distribution(slices) => {
            for slice in slices {
                println!("  {:<24} {:>12} {:>6.2}%", slice.label, slice.value, slice.percent);
            }
        }
        CalculationResult::Statistics { data, summary } => {
            println!("  Count:   {}", summary.count);
            println!("  Sum:     {}", summary.sum);
            println!("  Average: {}", summary.average);
            println!("  Median:  {}", summary.median);
            println!("  Min:     {}", summary.min);
            println!("  Max:     {}", summary.max);
            println!("  {}", format!("({} points)", data.len()).dimmed());
        }
        CalculationResult::Raw(rows) => {
            println!(
                "  {} unknown formula, {} rows passed through",
                "Note:".yellow(),
                rows.len()
            );
        }
    }
}
