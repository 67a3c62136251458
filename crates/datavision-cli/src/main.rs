//! Data Vision CLI - dataset upload and analytical query server.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            no_open,
            week_start,
            max_upload_mb,
        } => commands::serve::run(host, port, no_open, week_start, max_upload_mb, cli.verbose),

        Commands::Inspect { file, json } => commands::inspect::run(file, json, cli.verbose),

        Commands::Calc {
            file,
            formula,
            column_x,
            column_y,
            json,
        } => commands::calc::run(file, formula, column_x, column_y, json, cli.verbose),

        Commands::Aggregate {
            file,
            date,
            value,
            period,
            week_start,
            json,
        } => commands::aggregate::run(file, date, value, period, week_start, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
