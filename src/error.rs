//! Error types for BetterRest

use thiserror::Error;

/// Errors surfaced by the bedtime estimator.
///
/// Callers only learn that a problem occurred; the cause is logged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EstimationError {
    #[error("Sorry, there was a problem calculating your bedtime.")]
    PredictionFailed,
}

/// Errors raised while loading or evaluating a regression model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid coefficient `{name}`: {value}")]
    InvalidCoefficient { name: &'static str, value: f64 },

    #[error("Invalid model input: {0}")]
    InvalidInput(String),

    #[error("Model unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while loading estimator configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid default wake time {hour:02}:{minute:02}")]
    InvalidWakeTime { hour: u32, minute: u32 },
}
