//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Data Vision: upload tables and query them over HTTP
#[derive(Parser)]
#[command(name = "datavision")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for web server
        #[arg(short, long, default_value = "3456")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,

        /// First day of week buckets (sunday, monday, ...)
        #[arg(long, default_value = "sunday")]
        week_start: WeekStartChoice,

        /// Maximum upload size in MiB
        #[arg(long, default_value = "50")]
        max_upload_mb: usize,
    },

    /// Show headers, row count and source details of a file
    Inspect {
        /// Path to the data file (CSV/TSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a formula against a file
    Calc {
        /// Path to the data file (CSV/TSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Formula (sum, average, max, min, groupSum, groupAvg, trend, compare, distribution, statistics)
        #[arg(short, long)]
        formula: String,

        /// Label/group column
        #[arg(short = 'x', long, default_value = "")]
        column_x: String,

        /// Value column
        #[arg(short = 'y', long)]
        column_y: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sum a value column into day/week/month/year buckets
    Aggregate {
        /// Path to the data file (CSV/TSV/XLSX)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Date column
        #[arg(short, long)]
        date: String,

        /// Value column
        #[arg(short, long)]
        value: String,

        /// Bucket width (day, week, month, year)
        #[arg(short, long, default_value = "month")]
        period: String,

        /// First day of week buckets (sunday, monday, ...)
        #[arg(long, default_value = "sunday")]
        week_start: WeekStartChoice,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Week start day for week buckets
#[derive(Clone, Copy, Debug)]
pub struct WeekStartChoice(pub chrono::Weekday);

impl Default for WeekStartChoice {
    fn default() -> Self {
        WeekStartChoice(chrono::Weekday::Sun)
    }
}

impl std::str::FromStr for WeekStartChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<chrono::Weekday>()
            .map(WeekStartChoice)
            .map_err(|_| format!("Unknown weekday: {}. Use sunday, monday, ... or sun, mon, ...", s))
    }
}

impl std::fmt::Display for WeekStartChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
