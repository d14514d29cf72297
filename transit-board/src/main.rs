use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use transit_board::domain::TimeOfDay;
use transit_board::engine::ScheduleEngine;
use transit_board::feed::FeedTables;

/// Query a timetable feed from the command line.
#[derive(Parser)]
struct Args {
    /// Directory containing the feed CSV files.
    #[clap(long)]
    data_dir: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Departure board for a station.
    Board {
        /// Exact station display name, e.g. "Selva, Piazza Nives".
        #[clap(long)]
        station: String,
        /// Date to query, e.g. 2024-06-01.
        #[clap(long)]
        date: NaiveDate,
        /// Only departures at or after this time.
        #[clap(long, default_value = "00:00:00")]
        after: TimeOfDay,
    },
    /// Direct connections between two stations.
    Connections {
        #[clap(long)]
        from: String,
        #[clap(long)]
        to: String,
        #[clap(long)]
        date: NaiveDate,
        #[clap(long, default_value = "00:00:00")]
        after: TimeOfDay,
    },
    /// All stops served by a route.
    RouteStops {
        /// Route short name, e.g. "350".
        #[clap(long)]
        route: String,
    },
    /// All routes serving a place.
    Routes {
        /// Place label, matched case-insensitively, e.g. "St. Ulrich".
        #[clap(long)]
        place: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let tables = FeedTables::load_from_dir(&args.data_dir)
        .with_context(|| format!("failed to load feed from {}", args.data_dir.display()))?;

    let engine = ScheduleEngine::new();
    engine.publish(tables);
    let snapshot = engine.snapshot()?;

    match args.command {
        Command::Board {
            station,
            date,
            after,
        } => {
            let board = snapshot.departures_from(&station, date, after);
            if board.is_empty() {
                println!("No departures from {station} after {after} on {date}");
            } else {
                println!("{} departures from {station} on {date}:", board.len());
                for departure in &board {
                    println!(
                        "  {}  {:<6} {}",
                        departure.time, departure.route, departure.destination
                    );
                }
            }
        }
        Command::Connections {
            from,
            to,
            date,
            after,
        } => {
            let connections = snapshot.direct_connections(&from, &to, date, after);
            if connections.is_empty() {
                println!("No direct connections from {from} to {to} after {after} on {date}");
            } else {
                println!(
                    "{} direct connections from {from} to {to} on {date}:",
                    connections.len()
                );
                for connection in &connections {
                    println!(
                        "  {} -> {}  route {:<6} {}",
                        connection.departure,
                        connection.arrival,
                        connection.route,
                        connection.destination
                    );
                }
            }
        }
        Command::RouteStops { route } => match snapshot.stops_of_route(&route) {
            Some(result) => {
                println!(
                    "Route {} {} ({}), {} stops:",
                    result.route.short_name,
                    result.route.long_name,
                    result.route.mode,
                    result.stops.len()
                );
                for stop in &result.stops {
                    println!("  {} ({})", stop.name, stop.place);
                }
            }
            None => println!("No route named {route}"),
        },
        Command::Routes { place } => {
            let routes = snapshot.routes_serving(&place);
            if routes.is_empty() {
                println!("No routes serving {place}");
            } else {
                println!("{} routes serving {place}:", routes.len());
                for route in &routes {
                    println!("  {:<6} {} ({})", route.short_name, route.long_name, route.mode);
                }
            }
        }
    }

    Ok(())
}
