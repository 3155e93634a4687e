//! CLI command implementations.

pub mod common;
pub mod distance;
pub mod quota;
pub mod resolve;
