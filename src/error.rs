//! Crate-level error types.

use thiserror::Error;

/// Configuration misuse, rejected eagerly at construction instead of
/// silently computing garbage.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid resolution must be nonzero")]
    ZeroResolution,

    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f32),

    #[error("{name} must be finite and >= 0, got {value}")]
    InvalidRate { name: &'static str, value: f32 },
}
