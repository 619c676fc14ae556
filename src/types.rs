//! Core types for BetterRest
//!
//! This module defines the values that flow through an estimation: the three
//! user inputs, the computed bedtime, and the display choices that shape how a
//! bedtime is rendered.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Seconds in one hour
pub const SECONDS_PER_HOUR: u32 = 60 * 60;

/// Seconds in one minute
pub const SECONDS_PER_MINUTE: u32 = 60;

/// The three inputs to a bedtime estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepInputs {
    /// Desired wake-up moment (local). Only hour and minute feed the model,
    /// but the date anchors the bedtime subtraction.
    pub wake_up: NaiveDateTime,
    /// Desired amount of sleep (hours)
    pub sleep_amount: f64,
    /// Daily coffee intake (cups)
    pub coffee_amount: u32,
}

impl SleepInputs {
    pub fn new(wake_up: NaiveDateTime, sleep_amount: f64, coffee_amount: u32) -> Self {
        Self {
            wake_up,
            sleep_amount,
            coffee_amount,
        }
    }

    /// Wake time as seconds since midnight, from hour and minute only
    pub fn wake_seconds(&self) -> f64 {
        let hour = self.wake_up.hour() * SECONDS_PER_HOUR;
        let minute = self.wake_up.minute() * SECONDS_PER_MINUTE;
        f64::from(hour + minute)
    }
}

/// A computed bedtime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bedtime {
    /// Wake-up moment the bedtime was derived from
    pub wake_up: NaiveDateTime,
    /// When to go to bed
    pub at: NaiveDateTime,
    /// Sleep the model says is actually needed (seconds)
    pub actual_sleep_seconds: f64,
}

impl Bedtime {
    /// Time-of-day component of the bedtime
    pub fn time(&self) -> NaiveTime {
        self.at.time()
    }

    /// True when the bedtime falls on an earlier calendar day than the wake-up
    pub fn is_previous_day(&self) -> bool {
        self.at.date() < self.wake_up.date()
    }

    /// Short time-of-day string (hour and minute, no date)
    pub fn format(&self, clock: ClockFormat) -> String {
        self.at.format(clock.pattern()).to_string()
    }
}

/// How a bedtime is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockFormat {
    /// `10:55 PM`
    #[default]
    TwelveHour,
    /// `22:55`
    TwentyFourHour,
}

impl ClockFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            ClockFormat::TwelveHour => "%-I:%M %p",
            ClockFormat::TwentyFourHour => "%H:%M",
        }
    }
}

/// Allowed coffee intake, which differs between input widgets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoffeeRange {
    /// Stepper input, 0 to 20 cups
    #[default]
    Stepper,
    /// Picker input, 1 to 10 cups
    Picker,
}

impl CoffeeRange {
    pub fn bounds(&self) -> RangeInclusive<u32> {
        match self {
            CoffeeRange::Stepper => 0..=20,
            CoffeeRange::Picker => 1..=10,
        }
    }

    pub fn clamp(&self, cups: u32) -> u32 {
        let bounds = self.bounds();
        cups.clamp(*bounds.start(), *bounds.end())
    }
}
