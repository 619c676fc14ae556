//! Sleep regression model
//!
//! The estimator only needs one capability from a model: given the wake time
//! (seconds since midnight), the desired sleep (hours) and the coffee intake
//! (cups), predict the sleep actually needed in seconds. `LinearSleepModel` is
//! the fixed-coefficient implementation shipped with the crate.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper bound (exclusive) for the wake input, one day in seconds
pub const MAX_WAKE_SECONDS: f64 = 86_400.0;

/// Regression model that predicts required sleep
pub trait SleepModel: Send + Sync {
    /// Predict actual sleep needed (seconds)
    fn predict(&self, wake: f64, estimated_sleep: f64, coffee: f64) -> Result<f64, ModelError>;
}

impl<M: SleepModel + ?Sized> SleepModel for &M {
    fn predict(&self, wake: f64, estimated_sleep: f64, coffee: f64) -> Result<f64, ModelError> {
        (**self).predict(wake, estimated_sleep, coffee)
    }
}

impl<M: SleepModel + ?Sized> SleepModel for Box<M> {
    fn predict(&self, wake: f64, estimated_sleep: f64, coffee: f64) -> Result<f64, ModelError> {
        (**self).predict(wake, estimated_sleep, coffee)
    }
}

/// Linear regression over the three inputs.
///
/// `actual_sleep = intercept + wake * w + estimated_sleep * s + coffee * c`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearSleepModel {
    pub intercept: f64,
    /// Seconds per second-since-midnight of wake time
    pub wake: f64,
    /// Seconds per desired hour
    pub estimated_sleep: f64,
    /// Seconds per cup
    pub coffee: f64,
}

impl Default for LinearSleepModel {
    fn default() -> Self {
        Self {
            intercept: 0.0,
            wake: 0.0,
            estimated_sleep: 3600.0,
            coffee: 300.0, // 5 min per cup
        }
    }
}

impl LinearSleepModel {
    /// Parse and validate a model artifact
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: LinearSleepModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model artifact from disk
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every coefficient must be finite
    pub fn validate(&self) -> Result<(), ModelError> {
        let coefficients = [
            ("intercept", self.intercept),
            ("wake", self.wake),
            ("estimated_sleep", self.estimated_sleep),
            ("coffee", self.coffee),
        ];

        for (name, value) in coefficients {
            if !value.is_finite() {
                return Err(ModelError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }
}

impl SleepModel for LinearSleepModel {
    fn predict(&self, wake: f64, estimated_sleep: f64, coffee: f64) -> Result<f64, ModelError> {
        if !(0.0..MAX_WAKE_SECONDS).contains(&wake) {
            return Err(ModelError::InvalidInput(format!(
                "wake must be within [0, {MAX_WAKE_SECONDS}), got {wake}"
            )));
        }
        if !estimated_sleep.is_finite() || !coffee.is_finite() {
            return Err(ModelError::InvalidInput(
                "estimated_sleep and coffee must be finite".to_string(),
            ));
        }

        Ok(self.intercept
            + self.wake * wake
            + self.estimated_sleep * estimated_sleep
            + self.coffee * coffee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_model_prediction() {
        let model = LinearSleepModel::default();
        let actual = model.predict(25_200.0, 8.0, 1.0).unwrap();

        // 8h + 5min
        assert_eq!(actual, 29_100.0);
    }

    #[test]
    fn test_more_coffee_needs_more_sleep() {
        let model = LinearSleepModel::default();
        let one = model.predict(25_200.0, 8.0, 1.0).unwrap();
        let four = model.predict(25_200.0, 8.0, 4.0).unwrap();

        assert!(four > one);
    }

    #[test]
    fn test_from_json() {
        let model = LinearSleepModel::from_json(
            r#"{"intercept": 60.0, "wake": 0.001, "estimated_sleep": 3500.0, "coffee": 420.0}"#,
        )
        .unwrap();

        assert_eq!(model.intercept, 60.0);
        assert_eq!(model.coffee, 420.0);
    }

    #[test]
    fn test_json_roundtrip_preserves_default() {
        let json = LinearSleepModel::default().to_json().unwrap();
        let model = LinearSleepModel::from_json(&json).unwrap();

        assert_eq!(model, LinearSleepModel::default());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result = LinearSleepModel::from_json(
            r#"{"intercept": 0.0, "wake": 0.0, "estimated_sleep": 3600.0, "coffee": 300.0, "tea": 1.0}"#,
        );

        assert!(matches!(result, Err(ModelError::Json(_))));
    }

    #[test]
    fn test_rejects_missing_coefficient() {
        let result = LinearSleepModel::from_json(r#"{"intercept": 0.0}"#);
        assert!(matches!(result, Err(ModelError::Json(_))));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let model = LinearSleepModel {
            coffee: f64::NAN,
            ..LinearSleepModel::default()
        };

        match model.validate() {
            Err(ModelError::InvalidCoefficient { name, .. }) => assert_eq!(name, "coffee"),
            other => panic!("expected InvalidCoefficient, got {other:?}"),
        }
    }

    #[test]
    fn test_predict_rejects_out_of_day_wake() {
        let model = LinearSleepModel::default();

        assert!(model.predict(-1.0, 8.0, 1.0).is_err());
        assert!(model.predict(MAX_WAKE_SECONDS, 8.0, 1.0).is_err());
        assert!(model.predict(f64::NAN, 8.0, 1.0).is_err());
    }

    #[test]
    fn test_predict_rejects_non_finite_inputs() {
        let model = LinearSleepModel::default();
        assert!(model.predict(0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = LinearSleepModel::load(Path::new("/nonexistent/sleep-model.json"));
        assert!(matches!(result, Err(ModelError::Io(_))));
    }

    #[test]
    fn test_boxed_model_forwards() {
        let model: Box<dyn SleepModel> = Box::new(LinearSleepModel::default());
        assert_eq!(model.predict(0.0, 1.0, 0.0).unwrap(), 3600.0);
    }
}
