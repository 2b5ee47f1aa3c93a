//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inflatrack - Explore consumer price inflation across countries
#[derive(Parser)]
#[command(name = "inflatrack")]
#[command(about = "Inflation analytics over World Bank CPI data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Dataset snapshot (.csv or .json); live World Bank data when omitted
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the indicator and save a snapshot
    Fetch {
        /// Snapshot file to write (.csv or .json)
        #[arg(short, long)]
        output: PathBuf,

        /// First year to request (defaults to config)
        #[arg(long)]
        from: Option<i32>,

        /// Last year to request (defaults to config)
        #[arg(long)]
        to: Option<i32>,
    },

    /// Show map rows (color band and elevation) for one year
    Map {
        /// Year to show (defaults to the latest year with data)
        #[arg(short, long)]
        year: Option<i32>,

        /// Region filter (comma-separated or repeated)
        #[arg(short, long, value_delimiter = ',')]
        region: Vec<String>,
    },

    /// Generate insight statements for a selection
    Insights {
        #[arg(short, long)]
        year: Option<i32>,

        /// Region filter (comma-separated or repeated)
        #[arg(short, long, value_delimiter = ',')]
        region: Vec<String>,

        /// Country for the trend statement
        #[arg(short, long)]
        country: Option<String>,
    },

    /// Inflation-adjusted value of an amount over a year range
    Adjust {
        #[arg(short, long)]
        country: String,

        #[arg(long)]
        from: i32,

        #[arg(long)]
        to: i32,

        /// Initial amount
        #[arg(short, long, default_value = "1000")]
        amount: f64,
    },

    /// Group countries by the shape of their inflation history
    Cluster {
        /// Number of clusters (defaults to config)
        #[arg(short, long)]
        k: Option<usize>,

        /// Region filter (comma-separated or repeated)
        #[arg(short, long, value_delimiter = ',')]
        region: Vec<String>,
    },

    /// Countries with the most similar inflation trajectory
    Similar {
        #[arg(short, long)]
        country: String,

        /// Number of matches (defaults to config)
        #[arg(short, long)]
        top: Option<usize>,

        /// Only rank against these regions (comma-separated or repeated)
        #[arg(short, long, value_delimiter = ',')]
        region: Vec<String>,
    },

    /// Compare several countries side by side
    Compare {
        /// Countries to compare (comma-separated or repeated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        country: Vec<String>,

        #[arg(long)]
        from: Option<i32>,

        #[arg(long)]
        to: Option<i32>,

        /// Rebase each series to 100 at its first value
        #[arg(long)]
        normalize: bool,

        /// Add a centered 3-year rolling mean
        #[arg(long)]
        rolling: bool,
    },

    /// Summary statistics for one country
    Stats {
        #[arg(short, long)]
        country: String,

        /// Year for the current value (defaults to the latest year with data)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Export filtered records to CSV
    Export {
        /// CSV file to write
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long)]
        from: Option<i32>,

        #[arg(long)]
        to: Option<i32>,

        /// Region filter (comma-separated or repeated)
        #[arg(short, long, value_delimiter = ',')]
        region: Vec<String>,

        /// Also write an analysis summary next to the CSV
        #[arg(long)]
        summary: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing the dashboard bundle to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}
