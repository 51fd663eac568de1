//! Wayline CLI
//!
//! Offline polyline and route tools, plus a thin client for a running server.

#![allow(clippy::print_stdout)]

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use application::ports::{ModeFilter, TIME_NOW, TripRequest};
use clap::{Parser, Subcommand};
use domain::{Coordinate, Precision, Route};
use infrastructure::{LogFormat, init_logging};
use serde::Deserialize;

/// Wayline CLI
#[derive(Debug, Parser)]
#[command(name = "wayline-cli")]
#[command(author, version, about = "Wayline trip planning CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode an encoded polyline into coordinates (JSON)
    Decode {
        /// Encoded polyline
        #[arg(allow_hyphen_values = true)]
        polyline: String,

        /// Decimal digits: 5 for the trip backend, 6 for Valhalla
        #[arg(short, long, default_value = "5", value_parser = commands::parse_precision)]
        precision: Precision,
    },

    /// Encode LAT,LON points into a polyline
    Encode {
        /// Points as LAT,LON
        #[arg(required = true, allow_hyphen_values = true, value_parser = commands::parse_coordinate)]
        points: Vec<Coordinate>,

        /// Decimal digits
        #[arg(short, long, default_value = "5", value_parser = commands::parse_precision)]
        precision: Precision,
    },

    /// Normalize a saved trip backend response into routes
    Normalize {
        /// JSON file with the backend response
        file: PathBuf,

        /// Sort routes by duration, shortest first
        #[arg(long)]
        sort: bool,

        /// Decimal digits of the step geometry
        #[arg(short, long, default_value = "5", value_parser = commands::parse_precision)]
        precision: Precision,

        /// Print a one-line summary per route instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Plan a trip through a running server
    Plan {
        /// Origin as LAT,LON
        #[arg(long, allow_hyphen_values = true, value_parser = commands::parse_coordinate)]
        from: Coordinate,

        /// Destination as LAT,LON
        #[arg(long, allow_hyphen_values = true, value_parser = commands::parse_coordinate)]
        to: Coordinate,

        /// Travel date (YYYY-MM-DD), today if omitted
        #[arg(long)]
        date: Option<String>,

        /// Departure time (HH:MM:SS) or "timenow"
        #[arg(long, default_value = TIME_NOW)]
        time: String,

        /// Transport mode or "all"
        #[arg(long, default_value = "all")]
        mode: ModeFilter,

        /// Retry with later departures when nothing is found
        #[arg(long)]
        fallback: bool,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,

        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// Check server health and readiness
    Status {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Body of `/api/plan-trip`
#[derive(Debug, Deserialize)]
struct PlanTripResponse {
    routes: Vec<Route>,
}

fn plan_body(request: &TripRequest, fallback: bool) -> anyhow::Result<serde_json::Value> {
    let mut body = serde_json::to_value(request)?;
    if let Some(object) = body.as_object_mut() {
        object.insert("fallback".to_string(), serde_json::Value::Bool(fallback));
    }
    Ok(body)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LogFormat::Text, log_filter_from_verbosity(cli.verbose))?;

    match cli.command {
        Commands::Decode {
            polyline,
            precision,
        } => {
            println!("{}", commands::decode_polyline(&polyline, precision)?);
        },

        Commands::Encode { points, precision } => {
            println!("{}", commands::encode_points(&points, precision));
        },

        Commands::Normalize {
            file,
            sort,
            precision,
            summary,
        } => {
            let routes = commands::normalize_file(&file, precision, sort)?;
            if summary {
                println!("{}", commands::summarize(&routes));
            } else {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            }
        },

        Commands::Plan {
            from,
            to,
            date,
            time,
            mode,
            fallback,
            json,
            url,
        } => {
            let date =
                date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
            let request = TripRequest::new(from, to, date)
                .with_time(time)
                .with_mode(mode);

            let resp = reqwest::Client::new()
                .post(endpoint_url(&url, "/api/plan-trip"))
                .json(&plan_body(&request, fallback)?)
                .send()
                .await
                .context("failed to reach the server")?;

            let status = resp.status();
            let body = resp.json::<serde_json::Value>().await?;
            if !status.is_success() {
                anyhow::bail!("server answered {status}: {body}");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                let PlanTripResponse { routes } = serde_json::from_value(body)?;
                if routes.is_empty() {
                    println!("No routes found");
                } else {
                    println!("{}", commands::summarize(&routes));
                }
            }
        },

        Commands::Status { url } => {
            let client = reqwest::Client::new();
            for path in ["/health", "/ready"] {
                let resp = client.get(endpoint_url(&url, path)).send().await?;
                let status = resp.status();
                let body = resp.json::<serde_json::Value>().await?;
                println!("{path} ({status}):");
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
        },
    }

    Ok(())
}
