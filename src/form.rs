//! Form state
//!
//! Holds the three live inputs a front end binds to, keeps them inside their
//! stepper ranges, and recomputes the bedtime either on an explicit calculate
//! or whenever an input changes.

use crate::config::EstimatorConfig;
use crate::error::{ConfigError, EstimationError};
use crate::estimator::{BedtimeAlert, BedtimeEstimator};
use crate::model::SleepModel;
use crate::types::{Bedtime, SleepInputs};
use chrono::{NaiveDate, NaiveDateTime};
use std::ops::RangeInclusive;

/// Allowed desired sleep (hours)
pub const SLEEP_RANGE: RangeInclusive<f64> = 1.0..=20.0;

/// Stepper increment for desired sleep (hours)
pub const SLEEP_STEP: f64 = 0.5;

/// Default desired sleep (hours)
pub const DEFAULT_SLEEP_AMOUNT: f64 = 8.0;

/// Default coffee intake (cups)
pub const DEFAULT_COFFEE_AMOUNT: u32 = 1;

/// When the bedtime is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerMode {
    /// Only when `calculate` is called
    #[default]
    OnCalculate,
    /// After every input change
    Reactive,
}

/// Clamp into [`SLEEP_RANGE`] and snap to the [`SLEEP_STEP`] grid
pub fn snap_sleep_amount(hours: f64) -> f64 {
    if hours.is_nan() {
        return DEFAULT_SLEEP_AMOUNT;
    }
    let clamped = hours.clamp(*SLEEP_RANGE.start(), *SLEEP_RANGE.end());
    (clamped / SLEEP_STEP).round() * SLEEP_STEP
}

/// `8 hours`, `8.5 hours`
pub fn sleep_label(hours: f64) -> String {
    format!("{hours} hours")
}

/// `1 cup`, `0 cups`, `3 cups`
pub fn coffee_label(cups: u32) -> String {
    if cups == 1 {
        "1 cup".to_string()
    } else {
        format!("{cups} cups")
    }
}

pub struct BedtimeForm<M> {
    estimator: BedtimeEstimator<M>,
    mode: TriggerMode,
    wake_up: NaiveDateTime,
    sleep_amount: f64,
    coffee_amount: u32,
    /// Inputs and outcome of the last computation
    last: Option<(SleepInputs, Result<Bedtime, EstimationError>)>,
}

impl<M: SleepModel> BedtimeForm<M> {
    /// A form with default inputs, waking at the configured time on `today`
    pub fn new(
        estimator: BedtimeEstimator<M>,
        mode: TriggerMode,
        today: NaiveDate,
    ) -> Result<Self, ConfigError> {
        let config = *estimator.config();
        let wake_up = config.default_wake_time(today)?;

        let mut form = Self {
            estimator,
            mode,
            wake_up,
            sleep_amount: DEFAULT_SLEEP_AMOUNT,
            coffee_amount: config.coffee_range.clamp(DEFAULT_COFFEE_AMOUNT),
            last: None,
        };
        form.on_input_changed();
        Ok(form)
    }

    pub fn config(&self) -> &EstimatorConfig {
        self.estimator.config()
    }

    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    pub fn inputs(&self) -> SleepInputs {
        SleepInputs::new(self.wake_up, self.sleep_amount, self.coffee_amount)
    }

    pub fn wake_up(&self) -> NaiveDateTime {
        self.wake_up
    }

    pub fn sleep_amount(&self) -> f64 {
        self.sleep_amount
    }

    pub fn coffee_amount(&self) -> u32 {
        self.coffee_amount
    }

    pub fn set_wake_up(&mut self, wake_up: NaiveDateTime) {
        self.wake_up = wake_up;
        self.on_input_changed();
    }

    pub fn set_sleep_amount(&mut self, hours: f64) {
        self.sleep_amount = snap_sleep_amount(hours);
        self.on_input_changed();
    }

    pub fn increment_sleep(&mut self) {
        self.set_sleep_amount(self.sleep_amount + SLEEP_STEP);
    }

    pub fn decrement_sleep(&mut self) {
        self.set_sleep_amount(self.sleep_amount - SLEEP_STEP);
    }

    pub fn set_coffee_amount(&mut self, cups: u32) {
        self.coffee_amount = self.config().coffee_range.clamp(cups);
        self.on_input_changed();
    }

    pub fn increment_coffee(&mut self) {
        self.set_coffee_amount(self.coffee_amount.saturating_add(1));
    }

    pub fn decrement_coffee(&mut self) {
        self.set_coffee_amount(self.coffee_amount.saturating_sub(1));
    }

    pub fn sleep_label(&self) -> String {
        sleep_label(self.sleep_amount)
    }

    pub fn coffee_label(&self) -> String {
        coffee_label(self.coffee_amount)
    }

    /// Explicit trigger: compute now and produce the alert to show
    pub fn calculate(&mut self) -> BedtimeAlert {
        match self.refresh() {
            Ok(bedtime) => BedtimeAlert::bedtime(self.estimator.format(&bedtime)),
            Err(EstimationError::PredictionFailed) => BedtimeAlert::error(),
        }
    }

    /// Latest bedtime text in reactive mode; `None` until computed
    pub fn bedtime_text(&self) -> Option<String> {
        self.last.as_ref().map(|(_, outcome)| match outcome {
            Ok(bedtime) => self.estimator.format(bedtime),
            Err(e) => e.to_string(),
        })
    }

    pub fn last_result(&self) -> Option<Result<Bedtime, EstimationError>> {
        self.last.as_ref().map(|(_, outcome)| *outcome)
    }

    fn on_input_changed(&mut self) {
        if self.mode == TriggerMode::Reactive {
            let _ = self.refresh();
        }
    }

    /// Recompute unless the inputs are unchanged since the last computation
    fn refresh(&mut self) -> Result<Bedtime, EstimationError> {
        let inputs = self.inputs();
        if let Some((previous, outcome)) = &self.last {
            if *previous == inputs {
                return *outcome;
            }
        }

        let outcome = self.estimator.estimate(&inputs);
        self.last = Some((inputs, outcome));
        outcome
    }
}
