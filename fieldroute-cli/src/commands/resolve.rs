//! Day-chain resolution command.

use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use serde::Deserialize;

use fieldroute::chain::{Appointment, ChainBuilder};
use fieldroute::geo::Coordinate;
use fieldroute::resolver::DistanceResult;

use crate::commands::common;
use crate::error::CliError;

/// Arguments for `fieldroute resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Path to the day's schedule JSON
    #[arg(long)]
    pub schedule: PathBuf,
    /// Ignore cached results and ask the directions service again
    #[arg(long)]
    pub force_refresh: bool,
}

/// On-disk schedule format.
///
/// The base location may be embedded in the file; otherwise the one from
/// the config file's `[base]` section is used.
#[derive(Debug, Deserialize)]
struct ScheduleFile {
    #[serde(default)]
    base: Option<Coordinate>,
    appointments: Vec<Appointment>,
}

/// Resolves and prints every leg of the scheduled day.
pub async fn run(args: ResolveArgs) -> Result<(), CliError> {
    let schedule = load_schedule(&args.schedule)?;
    let (engine, config) = common::start_engine().await?;

    let Some(base) = schedule.base.or(config.base) else {
        println!("No base location configured; nothing to resolve.");
        return Ok(());
    };

    let resolver = engine.resolver();
    for (id, leg) in ChainBuilder::day_legs(base, &schedule.appointments) {
        let result = resolver
            .resolve(leg.origin, leg.destination, args.force_refresh)
            .await;
        println!("{}", format_leg(&id, leg.first_of_day, &result));
    }

    let usage = engine.quota_usage().await;
    println!();
    println!("Quota: {} of {} used today", usage.used, usage.max);
    Ok(())
}

fn load_schedule(path: &PathBuf) -> Result<ScheduleFile, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Schedule {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&contents).map_err(|e| CliError::Schedule {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn format_leg(id: &str, first_of_day: bool, result: &DistanceResult) -> String {
    let origin = if first_of_day { "base" } else { "previous stop" };
    let mut line = format!(
        "{id}: {:.1} km from {origin} [{}]",
        result.distance_km,
        result.efficiency().label()
    );

    match result.duration_min() {
        Some(min) => line.push_str(&format!("  ~{:.0} min with traffic", min)),
        None => line.push_str("  straight-line estimate"),
    }
    if result.from_cache {
        line.push_str("  (cache)");
    }
    line.push_str(&format!(
        "  calculated at {}",
        result.computed_at.with_timezone(&Local).format("%H:%M")
    ));
    line
}
