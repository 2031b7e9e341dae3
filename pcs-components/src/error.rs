//! Error types for simulation configuration

use thiserror::Error;

/// Rejected configurations. Every variant is fatal and is reported before
/// any simulated time advances.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("rate `{name}` must be positive and finite (got {value})")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("ratio `{name}` must lie in [0, 1] (got {value})")]
    RatioOutOfRange { name: &'static str, value: f64 },

    #[error("a run must generate at least one call")]
    NoCalls,
}
