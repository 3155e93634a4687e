//! CLI error type.

use thiserror::Error;

use fieldroute::app::EngineError;
use fieldroute::config::ConfigError;
use fieldroute::geo::ParseCoordinateError;

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("cannot read schedule file {path}: {reason}")]
    Schedule { path: String, reason: String },

    #[error("invalid coordinate {0:?}: {1}")]
    Coordinate(String, ParseCoordinateError),
}
