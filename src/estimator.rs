//! Bedtime estimation
//!
//! Feeds the wake time, sleep goal and coffee intake to a sleep model and
//! subtracts the predicted sleep from the wake-up moment. The subtraction is
//! date-time arithmetic, so a bedtime before midnight lands on the previous day.

use crate::config::EstimatorConfig;
use crate::error::EstimationError;
use crate::model::SleepModel;
use crate::types::{Bedtime, SleepInputs};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Predictions longer than this are rejected (seconds)
pub const MAX_PREDICTED_SLEEP_SECONDS: f64 = 48.0 * 3600.0;

/// Alert title shown with a computed bedtime
pub const SUCCESS_TITLE: &str = "Your ideal bedtime is…";

/// Alert title shown when estimation fails
pub const ERROR_TITLE: &str = "Error";

/// Alert message shown when estimation fails
pub const ERROR_MESSAGE: &str = "Sorry, there was a problem calculating your bedtime.";

/// Estimate the ideal bedtime for `inputs` using `model`.
///
/// Any model failure is reported as [`EstimationError::PredictionFailed`].
pub fn estimate_bedtime<M: SleepModel + ?Sized>(
    inputs: &SleepInputs,
    model: &M,
) -> Result<Bedtime, EstimationError> {
    let wake = inputs.wake_seconds();
    let coffee = f64::from(inputs.coffee_amount);

    let actual_sleep = model
        .predict(wake, inputs.sleep_amount, coffee)
        .map_err(|e| {
            warn!(error = %e, "sleep model prediction failed");
            EstimationError::PredictionFailed
        })?;

    if !actual_sleep.is_finite() || !(0.0..=MAX_PREDICTED_SLEEP_SECONDS).contains(&actual_sleep) {
        warn!(actual_sleep, "sleep model returned an unusable prediction");
        return Err(EstimationError::PredictionFailed);
    }

    let sleep = Duration::milliseconds((actual_sleep * 1000.0).round() as i64);
    let at = inputs.wake_up.checked_sub_signed(sleep).ok_or_else(|| {
        warn!(wake_up = %inputs.wake_up, actual_sleep, "bedtime out of range");
        EstimationError::PredictionFailed
    })?;

    debug!(
        wake,
        sleep_amount = inputs.sleep_amount,
        coffee,
        actual_sleep,
        bedtime = %at,
        "estimated bedtime"
    );

    Ok(Bedtime {
        wake_up: inputs.wake_up,
        at,
        actual_sleep_seconds: actual_sleep,
    })
}

/// Title and message presented to the user after a calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedtimeAlert {
    pub title: String,
    pub message: String,
}

impl BedtimeAlert {
    pub fn bedtime(formatted: String) -> Self {
        Self {
            title: SUCCESS_TITLE.to_string(),
            message: formatted,
        }
    }

    pub fn error() -> Self {
        Self {
            title: ERROR_TITLE.to_string(),
            message: ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.title == ERROR_TITLE
    }
}

/// A sleep model paired with display configuration
pub struct BedtimeEstimator<M> {
    model: M,
    config: EstimatorConfig,
}

impl<M: SleepModel> BedtimeEstimator<M> {
    pub fn new(model: M) -> Self {
        Self::with_config(model, EstimatorConfig::default())
    }

    pub fn with_config(model: M, config: EstimatorConfig) -> Self {
        Self { model, config }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn estimate(&self, inputs: &SleepInputs) -> Result<Bedtime, EstimationError> {
        estimate_bedtime(inputs, &self.model)
    }

    /// Bedtime as a short time-of-day string in the configured clock format
    pub fn format(&self, bedtime: &Bedtime) -> String {
        bedtime.format(self.config.clock_format)
    }

    /// Estimate and turn the outcome into an alert. Never fails.
    pub fn calculate(&self, inputs: &SleepInputs) -> BedtimeAlert {
        match self.estimate(inputs) {
            Ok(bedtime) => BedtimeAlert::bedtime(self.format(&bedtime)),
            Err(EstimationError::PredictionFailed) => BedtimeAlert::error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::model::LinearSleepModel;
    use crate::types::ClockFormat;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn wake(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 16)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    /// Always predicts the same duration
    struct FixedModel(f64);

    impl SleepModel for FixedModel {
        fn predict(&self, _: f64, _: f64, _: f64) -> Result<f64, ModelError> {
            Ok(self.0)
        }
    }

    struct FailingModel;

    impl SleepModel for FailingModel {
        fn predict(&self, _: f64, _: f64, _: f64) -> Result<f64, ModelError> {
            Err(ModelError::Unavailable("not loaded".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingModel {
        calls: Mutex<Vec<(f64, f64, f64)>>,
    }

    impl SleepModel for RecordingModel {
        fn predict(&self, wake: f64, estimated_sleep: f64, coffee: f64) -> Result<f64, ModelError> {
            self.calls.lock().unwrap().push((wake, estimated_sleep, coffee));
            Ok(3600.0)
        }
    }

    #[test]
    fn test_example_scenario() {
        let inputs = SleepInputs::new(wake(7, 0), 8.0, 1);
        let bedtime = estimate_bedtime(&inputs, &FixedModel(8.0 * 3600.0 + 5.0 * 60.0)).unwrap();

        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(22, 55, 0)
            .unwrap();
        assert_eq!(bedtime.at, expected);
        assert!(bedtime.is_previous_day());
        assert_eq!(bedtime.format(ClockFormat::TwentyFourHour), "22:55");
    }

    #[test]
    fn test_rollover_nine_hours() {
        let inputs = SleepInputs::new(wake(7, 0), 9.0, 0);
        let bedtime = estimate_bedtime(&inputs, &FixedModel(9.0 * 3600.0)).unwrap();

        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        assert_eq!(bedtime.at, expected);
    }

    #[test]
    fn test_rollover_across_month_boundary() {
        let wake_up = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(6, 30, 0)
            .unwrap();
        let inputs = SleepInputs::new(wake_up, 8.0, 0);
        let bedtime = estimate_bedtime(&inputs, &FixedModel(8.0 * 3600.0)).unwrap();

        // 2024 is a leap year
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(22, 30, 0)
            .unwrap();
        assert_eq!(bedtime.at, expected);
    }

    #[test]
    fn test_same_day_bedtime() {
        let inputs = SleepInputs::new(wake(14, 0), 6.0, 0);
        let bedtime = estimate_bedtime(&inputs, &FixedModel(6.0 * 3600.0)).unwrap();

        assert_eq!(bedtime.at, wake(8, 0));
        assert!(!bedtime.is_previous_day());
    }

    #[test]
    fn test_inputs_forwarded_unchanged() {
        let model = RecordingModel::default();
        let inputs = SleepInputs::new(wake(6, 45), 7.5, 3);

        estimate_bedtime(&inputs, &model).unwrap();

        let calls = model.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[(24_300.0, 7.5, 3.0)]);
    }

    #[test]
    fn test_failing_model_yields_prediction_failed() {
        let inputs = SleepInputs::new(wake(7, 0), 8.0, 1);
        let result = estimate_bedtime(&inputs, &FailingModel);

        assert_eq!(result, Err(EstimationError::PredictionFailed));
    }

    #[test]
    fn test_unusable_predictions_rejected() {
        let inputs = SleepInputs::new(wake(7, 0), 8.0, 1);

        for bad in [f64::NAN, f64::INFINITY, -1.0, MAX_PREDICTED_SLEEP_SECONDS + 1.0] {
            assert_eq!(
                estimate_bedtime(&inputs, &FixedModel(bad)),
                Err(EstimationError::PredictionFailed),
                "prediction {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_all_in_range_inputs_succeed() {
        let model = LinearSleepModel::default();

        for half_hours in 2..=40 {
            let sleep_amount = f64::from(half_hours) * 0.5;
            for coffee in 0..=20 {
                let inputs = SleepInputs::new(wake(7, 0), sleep_amount, coffee);
                assert!(
                    estimate_bedtime(&inputs, &model).is_ok(),
                    "failed for sleep={sleep_amount} coffee={coffee}"
                );
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let model = LinearSleepModel::default();
        let inputs = SleepInputs::new(wake(7, 15), 8.5, 2);

        let first = estimate_bedtime(&inputs, &model);
        let second = estimate_bedtime(&inputs, &model);

        assert_eq!(first, second);
    }

    #[test]
    fn test_more_sleep_or_coffee_means_earlier_bedtime() {
        let model = LinearSleepModel::default();
        let base = estimate_bedtime(&SleepInputs::new(wake(7, 0), 8.0, 1), &model).unwrap();
        let more_sleep = estimate_bedtime(&SleepInputs::new(wake(7, 0), 9.0, 1), &model).unwrap();
        let more_coffee = estimate_bedtime(&SleepInputs::new(wake(7, 0), 8.0, 5), &model).unwrap();

        assert!(more_sleep.at < base.at);
        assert!(more_coffee.at < base.at);
    }

    #[test]
    fn test_calculate_success_alert() {
        let estimator = BedtimeEstimator::new(LinearSleepModel::default());
        let alert = estimator.calculate(&SleepInputs::new(wake(7, 0), 8.0, 1));

        assert_eq!(
            alert,
            BedtimeAlert {
                title: "Your ideal bedtime is…".to_string(),
                message: "10:55 PM".to_string(),
            }
        );
        assert!(!alert.is_error());
    }

    #[test]
    fn test_calculate_uses_configured_clock() {
        let config = EstimatorConfig {
            clock_format: ClockFormat::TwentyFourHour,
            ..EstimatorConfig::default()
        };
        let estimator = BedtimeEstimator::with_config(LinearSleepModel::default(), config);
        let alert = estimator.calculate(&SleepInputs::new(wake(7, 0), 8.0, 1));

        assert_eq!(alert.message, "22:55");
    }

    #[test]
    fn test_calculate_error_alert() {
        let estimator = BedtimeEstimator::new(FailingModel);
        let alert = estimator.calculate(&SleepInputs::new(wake(7, 0), 8.0, 1));

        assert!(alert.is_error());
        assert_eq!(alert.title, "Error");
        assert_eq!(
            alert.message,
            "Sorry, there was a problem calculating your bedtime."
        );
    }

    #[test]
    fn test_estimator_over_boxed_model() {
        let model: Box<dyn SleepModel> = Box::new(FixedModel(3600.0));
        let estimator = BedtimeEstimator::new(model);
        let bedtime = estimator.estimate(&SleepInputs::new(wake(7, 0), 1.0, 0)).unwrap();

        assert_eq!(bedtime.at, wake(6, 0));
    }
}
