//! Error types for meter setup

use thiserror::Error;

/// Errors raised while configuring or starting a meter
#[derive(Debug, Error)]
pub enum MeterError {
    #[error("Spring factor must be in (0, 1], got {0}")]
    InvalidSpringFactor(f32),
    #[error("Peak decay must be a finite, non-negative dB step, got {0}")]
    InvalidDecayRate(f32),
    #[error("{0} interval must be non-zero")]
    ZeroInterval(&'static str),
    #[error("Failed to start meter thread: {0}")]
    Spawn(#[from] std::io::Error),
}
