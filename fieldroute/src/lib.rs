//! Fieldroute - Sequential route-distance resolution for technician schedules
//!
//! This library computes travel distance and duration between a technician's
//! consecutive daily appointments (base → stop 1 → stop 2 → …). Live traffic
//! data comes from a rate-limited remote directions provider; a persisted
//! cache and a strict daily call quota keep provider costs bounded, and a
//! great-circle fallback guarantees that every leg always resolves to a
//! usable estimate, even offline or over quota.

pub mod app;
pub mod cache;
pub mod chain;
pub mod clock;
pub mod config;
pub mod geo;
pub mod provider;
pub mod quota;
pub mod resolver;
pub mod store;
pub mod telemetry;
