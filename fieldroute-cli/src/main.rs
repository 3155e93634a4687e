//! Fieldroute CLI.
//!
//! This binary provides a command-line interface to the fieldroute
//! library: resolving a day's route chain, inspecting quota usage and
//! computing one-off geometric distances.

mod commands;
mod error;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "fieldroute", version, about = "Route distances for field-service schedules")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the route chain for a day's schedule
    Resolve(commands::resolve::ResolveArgs),
    /// Show today's directions-quota usage
    Quota,
    /// Compute the geometric distance between two coordinates
    Distance(commands::distance::DistanceArgs),
}

#[tokio::main]
async fn main() {
    fieldroute::telemetry::init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Resolve(args) => commands::resolve::run(args).await,
        Command::Quota => commands::quota::run().await,
        Command::Distance(args) => commands::distance::run(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
