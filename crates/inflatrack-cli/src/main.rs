//! Inflatrack CLI - Consumer price inflation explorer
//!
//! Usage:
//!   inflatrack fetch --output data.csv           Save a World Bank snapshot
//!   inflatrack --data data.csv map --year 2022   Map rows for one year
//!   inflatrack --data data.csv insights          Insight statements
//!   inflatrack adjust --country Germany --from 2015 --to 2022
//!   inflatrack serve --port 3000                 Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let data = cli.data.as_deref();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Fetch { output, from, to } => {
            commands::cmd_fetch(config, &output, from, to).await
        }
        Commands::Map { year, region } => {
            let session = commands::load_session(data, config).await?;
            commands::cmd_map(&session, year, &region)
        }
        Commands::Insights {
            year,
            region,
            country,
        } => {
            let session = commands::load_session(data, config).await?;
            commands::cmd_insights(&session, year, &region, country.as_deref())
        }
        Commands::Adjust {
            country,
            from,
            to,
            amount,
        } => {
            let session = commands::load_session(data, config).await?;
            commands::cmd_adjust(&session, &country, from, to, amount)
        }
        Commands::Cluster { k, region } => {
            let session = commands::load_session(data, config).await?;
            commands::cmd_cluster(&session, k, &region)
        }
        Commands::Similar {
            country,
            top,
            region,
        } => {
            let session = commands::load_session(data, config).await?;
            commands::cmd_similar(&session, &country, top, &region)
        }
        Commands::Compare {
            country,
            from,
            to,
            normalize,
            rolling,
        } => {
            let session = commands::load_session(data, config).await?;
            commands::cmd_compare(&session, &country, from, to, normalize, rolling)
        }
        Commands::Stats { country, year } => {
            let session = commands::load_session(data, config).await?;
            commands::cmd_stats(&session, &country, year)
        }
        Commands::Export {
            output,
            from,
            to,
            region,
            summary,
        } => {
            let session = commands::load_session(data, config).await?;
            commands::cmd_export(&session, &output, from, to, &region, summary)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(data, config, &host, port, static_dir.as_deref()).await,
    }
}
