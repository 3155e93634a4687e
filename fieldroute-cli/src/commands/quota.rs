//! Quota inspection command.

use crate::commands::common;
use crate::error::CliError;

/// Prints today's directions-quota usage.
pub async fn run() -> Result<(), CliError> {
    let (engine, _config) = common::start_engine().await?;
    let usage = engine.quota_usage().await;

    println!(
        "Directions quota: {} of {} used today ({} remaining)",
        usage.used, usage.max, usage.remaining
    );
    Ok(())
}
