//! Shared command helpers.

use fieldroute::app::RouteEngine;
use fieldroute::config::ConfigFile;

use crate::error::CliError;

/// Loads user configuration and starts the engine.
pub async fn start_engine() -> Result<(RouteEngine, ConfigFile), CliError> {
    let config = ConfigFile::load_or_default()?;
    let engine = RouteEngine::start(config.to_engine_config()).await?;
    Ok((engine, config))
}
