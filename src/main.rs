use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use weatherwise::models::{Coordinate, parse_date};
use weatherwise::{Activity, AppState, WeatherWiseConfig, logging, web};

/// Extreme-weather probabilities for a place and date
#[derive(Parser, Debug)]
#[command(name = "weatherwise", version)]
#[command(about = "Estimate the chance of very hot, cold, windy, wet or uncomfortable weather", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probabilities, risk and current conditions for a coordinate and date
    Estimate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// hiking, beach, fishing, picnic, sightseeing, camping or sports
        #[arg(short, long)]
        activity: Option<Activity>,
    },
    /// Current conditions for a coordinate
    Current {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Look up a place by name
    Geocode {
        query: String,
    },
    /// Serve the HTTP API
    Serve {
        /// Overrides `server.port` from the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WeatherWiseConfig::load_from_path(cli.config)?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging);
    debug!(archive = %config.sources.historical_base_url, "Configuration loaded");

    let state = AppState::from_config(&config).context("Failed to set up weather sources")?;

    match cli.command {
        Command::Estimate {
            lat,
            lon,
            date,
            activity,
        } => {
            let coordinate = Coordinate::new(lat, lon)?;
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => Utc::now().date_naive(),
            };
            print_json(&state.report(coordinate, date, activity).await)?;
        }
        Command::Current { lat, lon } => {
            let coordinate = Coordinate::new(lat, lon)?;
            print_json(&state.current.current(coordinate).await)?;
        }
        Command::Geocode { query } => {
            print_json(&state.geocoder.geocode(&query).await?)?;
        }
        Command::Serve { port } => {
            web::run(state, port.unwrap_or(config.server.port)).await?;
        }
    }

    Ok(())
}
