//! Engine assembly.
//!
//! `RouteEngine` wires storage, cache, quota, provider and resolver into
//! one object the surrounding application (or the CLI) can hold, and
//! consumes the external schedule/profile contracts.

mod bootstrap;
mod config;
mod error;

pub use bootstrap::RouteEngine;
pub use config::{
    EngineConfig, DEFAULT_CACHE_TTL_MINUTES, DEFAULT_DAILY_QUOTA, DEFAULT_KEY_PRECISION,
    DEFAULT_PROVIDER_TIMEOUT_SECS,
};
pub use error::EngineError;
