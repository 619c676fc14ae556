//! FFI bindings for BetterRest
//!
//! This module provides C-compatible functions for calling the estimator from a
//! mobile host. Strings are null-terminated; returned strings are allocated here
//! and must be freed by the caller using `betterrest_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::NaiveDate;

use crate::config::default_wake_time;
use crate::estimator::{BedtimeAlert, BedtimeEstimator};
use crate::model::LinearSleepModel;
use crate::types::SleepInputs;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn alert_to_cstr(alert: &BedtimeAlert) -> *mut c_char {
    match serde_json::to_string(alert) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Estimation
// ============================================================================

/// Estimate a bedtime and return the alert to display as JSON
/// (`{"title": ..., "message": ...}`).
///
/// The wake time is taken on an arbitrary fixed day; only the time of day of
/// the result is meaningful to the caller.
///
/// # Safety
/// - `model_json` must be NULL (use the built-in model) or a valid
///   null-terminated C string holding a model artifact.
/// - Returns a newly allocated string that must be freed with `betterrest_free_string`.
/// - Returns NULL when the wake time is invalid; call `betterrest_last_error`
///   for details. A model that fails to load still yields the error alert.
#[no_mangle]
pub unsafe extern "C" fn betterrest_estimate(
    wake_hour: u32,
    wake_minute: u32,
    sleep_amount: f64,
    coffee_amount: u32,
    model_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let wake_up = match NaiveDate::from_ymd_opt(2000, 1, 2)
        .and_then(|day| day.and_hms_opt(wake_hour, wake_minute, 0))
    {
        Some(wake_up) => wake_up,
        None => {
            set_last_error(&format!(
                "Invalid wake time {wake_hour:02}:{wake_minute:02}"
            ));
            return ptr::null_mut();
        }
    };

    let model = if model_json.is_null() {
        Ok(LinearSleepModel::default())
    } else {
        match cstr_to_string(model_json) {
            Some(json) => LinearSleepModel::from_json(&json),
            None => {
                set_last_error("Invalid model string pointer");
                return ptr::null_mut();
            }
        }
    };

    let inputs = SleepInputs::new(wake_up, sleep_amount, coffee_amount);
    let alert = match model {
        Ok(model) => BedtimeEstimator::new(model).calculate(&inputs),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load sleep model");
            BedtimeAlert::error()
        }
    };

    alert_to_cstr(&alert)
}

/// Default wake-up time of day as `HH:MM`.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `betterrest_free_string`.
#[no_mangle]
pub unsafe extern "C" fn betterrest_default_wake_time() -> *mut c_char {
    clear_last_error();

    match NaiveDate::from_ymd_opt(2000, 1, 2) {
        Some(day) => string_to_cstr(&default_wake_time(day).format("%H:%M").to_string()),
        None => ptr::null_mut(),
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by BetterRest functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a BetterRest function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn betterrest_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next BetterRest call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn betterrest_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn betterrest_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
