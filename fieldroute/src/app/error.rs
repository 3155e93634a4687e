//! Engine assembly errors.
//!
//! Only assembly and configuration can fail; once the engine is running,
//! every leg terminates in a geometric estimate at worst.

use thiserror::Error;

use crate::provider::ProviderError;

/// Errors that can occur while starting the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No directions API key configured.
    #[error("no directions API key configured")]
    MissingApiKey,

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[from] ProviderError),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}
