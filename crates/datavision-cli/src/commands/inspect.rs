//! Inspect command - show what a file decodes to.

use std::path::PathBuf;

use colored::Colorize;
use datavision::{CellValue, FileDecoder};

/// Number of sample rows printed in human-readable mode.
const SAMPLE_ROWS: usize = 5;

pub fn run(file: PathBuf, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let table = FileDecoder::new().decode_path(&file)?;

    if json_output {
        let report = serde_json::json!({
            "file": file.display().to_string(),
            "headers": table.headers,
            "rowCount": table.row_count(),
            "source": table.source,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Inspecting".cyan().bold(), file.display().to_string().white());
    println!();

    if let Some(source) = &table.source {
        println!("  Format: {}", source.format);
        println!("  Size:   {} bytes", source.size_bytes);
        println!("  Hash:   {}", source.hash.dimmed());
    }
    println!("  Rows:   {}", table.row_count().to_string().white().bold());
    println!("  Columns: {}", table.column_count());
    println!();

    println!("{}", "Columns:".yellow().bold());
    for header in &table.headers {
        let numeric = table
            .rows
            .iter()
            .filter(|row| matches!(row.get(header), Some(CellValue::Number(_))))
            .count();
        let present = table
            .rows
            .iter()
            .filter(|row| row.get(header).is_some_and(|c| !c.is_absent()))
            .count();
        println!(
            "  {} {}",
            header.white(),
            format!("({}/{} numeric)", numeric, present).dimmed()
        );
    }

    if verbose && !table.rows.is_empty() {
        println!();
        println!("{}", "Sample rows:".yellow().bold());
        for row in table.rows.iter().take(SAMPLE_ROWS) {
            let cells: Vec<String> = row.values().map(|c| c.to_string()).collect();
            println!("  {}", cells.join(" | "));
        }
    }

    Ok(())
}
