//! FFI bindings for the zone engine
//!
//! This module provides C-compatible functions for embedding the engine in
//! mobile apps. Snapshots cross the boundary as JSON strings; all returned
//! strings are allocated here and must be freed by the caller with
//! `zone2_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::{DateTime, TimeZone, Utc};

use crate::adapters::ble::parse_heart_rate_measurement;
use crate::session::ZoneSession;
use crate::settings::UserSettings;
use crate::types::AlertEvent;
use crate::ENGINE_VERSION;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
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

/// Helper to convert milliseconds since the Unix epoch to a UTC instant
fn instant_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Opaque handle to a ZoneSession
pub struct ZoneSessionHandle {
    session: ZoneSession,
}

// ============================================================================
// Session lifecycle
// ============================================================================

/// Create a new session from settings JSON
/// (`{"age":40,"low":0,"high":0,"use_custom_range":false}`).
///
/// # Safety
/// - `settings_json` must be a valid null-terminated C string, or NULL for
///   default settings.
/// - Returns a pointer that must be freed with `zone2_session_free`.
/// - Returns NULL on error; call `zone2_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn zone2_session_new(settings_json: *const c_char) -> *mut ZoneSessionHandle {
    clear_last_error();

    let settings = if settings_json.is_null() {
        UserSettings::default()
    } else {
        let json = match cstr_to_string(settings_json) {
            Some(s) => s,
            None => {
                set_last_error("Invalid settings string pointer");
                return ptr::null_mut();
            }
        };
        match UserSettings::from_json(&json) {
            Ok(settings) => settings,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    let handle = Box::new(ZoneSessionHandle {
        session: ZoneSession::new(settings),
    });
    Box::into_raw(handle)
}

/// Free a session.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `zone2_session_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn zone2_session_free(handle: *mut ZoneSessionHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Replace the session settings from JSON.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `zone2_session_new`.
/// - `settings_json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
#[no_mangle]
pub unsafe extern "C" fn zone2_session_set_settings(
    handle: *mut ZoneSessionHandle,
    settings_json: *const c_char,
) -> i32 {
    clear_last_error();

    if handle.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }

    let json = match cstr_to_string(settings_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid settings string pointer");
            return -1;
        }
    };

    match UserSettings::from_json(&json) {
        Ok(settings) => {
            (*handle).session.set_settings(settings);
            0
        }
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Start a new workout on an existing session (counters and alerts cleared,
/// settings kept).
///
/// # Safety
/// - `handle` must be a valid pointer returned by `zone2_session_new`.
#[no_mangle]
pub unsafe extern "C" fn zone2_session_reset(handle: *mut ZoneSessionHandle) {
    if !handle.is_null() {
        (*handle).session.reset();
    }
}

// ============================================================================
// Sample and tick entry points
// ============================================================================

/// Feed one decoded sample (`timestamp_ms` / `now_ms` are Unix epoch
/// milliseconds).
///
/// Returns 0 for no alert, 1 for left-zone-below, 2 for left-zone-above,
/// and -1 on error.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `zone2_session_new`.
#[no_mangle]
pub unsafe extern "C" fn zone2_session_on_sample(
    handle: *mut ZoneSessionHandle,
    bpm: u16,
    timestamp_ms: i64,
    now_ms: i64,
) -> i32 {
    clear_last_error();

    if handle.is_null() {
        set_last_error("Null session pointer");
        return -1;
    }

    let (Some(timestamp), Some(now)) = (
        instant_from_millis(timestamp_ms),
        instant_from_millis(now_ms),
    ) else {
        set_last_error("Timestamp out of range");
        return -1;
    };

    match (*handle).session.on_sample(bpm, timestamp, now) {
        Ok(None) => 0,
        Ok(Some(AlertEvent::LeftZoneBelow)) => 1,
        Ok(Some(AlertEvent::LeftZoneAbove)) => 2,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Advance the session and return the snapshot as JSON.
///
/// # Safety
/// - `handle` must be a valid pointer returned by `zone2_session_new`.
/// - Returns a newly allocated string that must be freed with
///   `zone2_free_string`.
/// - Returns NULL on error; call `zone2_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn zone2_session_tick(
    handle: *mut ZoneSessionHandle,
    now_ms: i64,
) -> *mut c_char {
    clear_last_error();

    if handle.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let Some(now) = instant_from_millis(now_ms) else {
        set_last_error("Timestamp out of range");
        return ptr::null_mut();
    };

    let snapshot = match (*handle).session.tick(now) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match serde_json::to_string(&snapshot) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Decode a Heart Rate Measurement characteristic payload to bpm.
///
/// Returns 0 for empty or truncated payloads (invalid; do not feed to the
/// session).
///
/// # Safety
/// - `data` must point to `len` readable bytes, or be NULL with `len` 0.
#[no_mangle]
pub unsafe extern "C" fn zone2_parse_hr_measurement(data: *const u8, len: usize) -> u16 {
    if data.is_null() || len == 0 {
        return 0;
    }
    let bytes = std::slice::from_raw_parts(data, len);
    parse_heart_rate_measurement(bytes)
}

// ============================================================================
// Diagnostics and memory management
// ============================================================================

/// Get the last error message, or NULL if none.
///
/// # Safety
/// - The returned pointer is owned by thread-local storage: do not free it,
///   and do not use it after the next engine call on this thread.
#[no_mangle]
pub unsafe extern "C" fn zone2_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(msg) => msg.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the engine version string.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with
///   `zone2_free_string`.
#[no_mangle]
pub unsafe extern "C" fn zone2_version() -> *mut c_char {
    string_to_cstr(ENGINE_VERSION)
}

/// Free a string returned by engine functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by an engine function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn zone2_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
