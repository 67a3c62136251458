//! Serve command - run the HTTP API server.

use std::sync::Arc;

use colored::Colorize;
use datavision::{DataVision, DataVisionConfig, PeriodConfig};

use crate::cli::WeekStartChoice;
use crate::server::{app, state::AppState};

pub fn run(
    host: String,
    port: u16,
    no_open: bool,
    week_start: WeekStartChoice,
    max_upload_mb: usize,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = DataVisionConfig {
        period: PeriodConfig {
            week_start: week_start.0,
            ..PeriodConfig::default()
        },
        ..DataVisionConfig::default()
    };
    let state = AppState::new(Arc::new(DataVision::with_config(config)))
        .with_upload_limit(max_upload_mb.saturating_mul(1024 * 1024));

    let url = format!("http://{}:{}", host, port);
    println!();
    println!(
        "{} {}",
        "Starting Data Vision API server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    if verbose {
        println!("  Week start:   {}", week_start);
        println!("  Upload limit: {} MiB", max_upload_mb);
        println!();
    }
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    if !no_open {
        if let Err(e) = open::that(&url) {
            eprintln!("{} Could not open browser: {}", "Warning:".yellow(), e);
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            std::process::exit(0);
        });

        app::run_server(state, &host, port).await
    })?;

    Ok(())
}
