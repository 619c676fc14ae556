//! BetterRest - On-device bedtime estimation
//!
//! BetterRest takes the time you want to wake up, how long you want to sleep and
//! how much coffee you drink, asks a regression model how much sleep you
//! actually need, and subtracts that from the wake-up time.
//!
//! ## Modules
//!
//! - **Estimator**: the pure bedtime computation and the alert shown for it
//! - **Model**: the regression model capability and the built-in linear model
//! - **Form**: input defaults, stepper ranges, labels, and recompute triggers

pub mod config;
pub mod error;
pub mod estimator;
pub mod form;
pub mod model;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::EstimatorConfig;
pub use error::{ConfigError, EstimationError, ModelError};
pub use estimator::{estimate_bedtime, BedtimeAlert, BedtimeEstimator};
pub use form::{BedtimeForm, TriggerMode};
pub use model::{LinearSleepModel, SleepModel};
pub use types::{Bedtime, ClockFormat, CoffeeRange, SleepInputs};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "BetterRest";
