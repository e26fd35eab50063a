//! FFI bindings for Synheart Stress
//!
//! This module provides C-compatible functions for calling the screening
//! pipeline from other languages. All functions use C strings
//! (null-terminated) and return allocated memory that must be freed by the
//! caller using `stress_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::model::ThresholdModel;
use crate::pipeline::{screen_intake_json, StressProcessor};

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

// ============================================================================
// Stateless API
// ============================================================================

/// Screen one intake JSON object and return the report JSON.
///
/// # Safety
/// - `intake_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_screen_json(intake_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(intake_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid intake string pointer");
            return ptr::null_mut();
        }
    };

    match screen_intake_json(&json_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a StressProcessor
pub struct StressProcessorHandle {
    processor: StressProcessor,
}

/// Create a new StressProcessor with the built-in model and default tables.
///
/// # Safety
/// - Returns a pointer to a newly allocated StressProcessor.
/// - Must be freed with `stress_processor_free`.
#[no_mangle]
pub unsafe extern "C" fn stress_processor_new() -> *mut StressProcessorHandle {
    clear_last_error();

    let processor = StressProcessor::new();
    let handle = Box::new(StressProcessorHandle { processor });
    Box::into_raw(handle)
}

/// Free a StressProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `stress_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn stress_processor_free(processor: *mut StressProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Replace the processor's model with a threshold model definition.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `stress_processor_new`.
/// - `model_json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
/// - On error, call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_processor_load_model(
    processor: *mut StressProcessorHandle,
    model_json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(model_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid model string pointer");
            return -1;
        }
    };

    match ThresholdModel::from_json(&json_str) {
        Ok(model) => {
            let current = std::mem::take(&mut handle.processor);
            handle.processor = current.with_model(Box::new(model));
            0
        }
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Screen one intake JSON object with a stateful processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `stress_processor_new`.
/// - `intake_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_processor_screen(
    processor: *mut StressProcessorHandle,
    intake_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(intake_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid intake string pointer");
            return ptr::null_mut();
        }
    };

    match handle.processor.screen_json(&json_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Export the processor's session history as CSV.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `stress_processor_new`.
/// - Returns a newly allocated string that must be freed with `stress_free_string`.
/// - Returns NULL on error; call `stress_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn stress_processor_history_csv(
    processor: *mut StressProcessorHandle,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    match handle.processor.export_history_csv() {
        Ok(csv_text) => string_to_cstr(&csv_text),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Drop all records from the processor's session history.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `stress_processor_new`.
/// - Returns 0 on success, non-zero on error.
#[no_mangle]
pub unsafe extern "C" fn stress_processor_clear_history(
    processor: *mut StressProcessorHandle,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;
    handle.processor.clear_history();
    0
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by screening functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a screening function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn stress_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next screening function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn stress_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        match &*e.borrow() {
            Some(cstr) => cstr.as_ptr(),
            None => ptr::null(),
        }
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
pub unsafe extern "C" fn stress_version() -> *const c_char {
    // Use a static CString to avoid allocation
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_intake_json() -> CString {
        CString::new(
            r#"{
            "age": 22,
            "marital_status": "yes",
            "gender": "male",
            "bmi": 25.0,
            "snoring_rate": "",
            "respiration_rate": 15.0,
            "body_temperature": 90.0,
            "limb_movement": "",
            "blood_oxygen": 80.0,
            "eye_movement": "",
            "sleeping_hours": 8.0,
            "heart_rate": 70.0
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_screen_json() {
        let json = sample_intake_json();

        unsafe {
            let result = stress_screen_json(json.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.starts_with('{'));
            assert!(result_str.contains("report_version"));
            assert!(result_str.contains("No Stress"));

            stress_free_string(result);
        }
    }

    #[test]
    fn test_ffi_processor_lifecycle() {
        unsafe {
            // Create processor
            let processor = stress_processor_new();
            assert!(!processor.is_null());

            // Screen twice
            let json = sample_intake_json();
            let first = stress_processor_screen(processor, json.as_ptr());
            assert!(!first.is_null());
            stress_free_string(first);
            let second = stress_processor_screen(processor, json.as_ptr());
            assert!(!second.is_null());
            stress_free_string(second);

            // Export history: header plus two records
            let csv_ptr = stress_processor_history_csv(processor);
            assert!(!csv_ptr.is_null());
            let csv_text = CStr::from_ptr(csv_ptr).to_str().unwrap();
            assert_eq!(csv_text.lines().count(), 3);
            assert!(csv_text.starts_with("recorded_at,"));
            stress_free_string(csv_ptr);

            // Clear history: header only
            assert_eq!(stress_processor_clear_history(processor), 0);
            let cleared = stress_processor_history_csv(processor);
            let cleared_text = CStr::from_ptr(cleared).to_str().unwrap();
            assert_eq!(cleared_text.lines().count(), 1);
            stress_free_string(cleared);

            stress_processor_free(processor);
        }
    }

    #[test]
    fn test_ffi_load_model() {
        unsafe {
            let processor = stress_processor_new();

            let model = CString::new(
                r#"{
                "name": "flat",
                "rules": [],
                "default_class": 3
            }"#,
            )
            .unwrap();
            assert_eq!(stress_processor_load_model(processor, model.as_ptr()), 0);

            let json = sample_intake_json();
            let result = stress_processor_screen(processor, json.as_ptr());
            assert!(!result.is_null());
            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("High Stress"));
            stress_free_string(result);

            let bad_model = CString::new("not json").unwrap();
            assert_eq!(stress_processor_load_model(processor, bad_model.as_ptr()), -1);

            stress_processor_free(processor);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let invalid_json = CString::new("not json").unwrap();
            let result = stress_screen_json(invalid_json.as_ptr());
            assert!(result.is_null());

            let error = stress_last_error();
            assert!(!error.is_null());
            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(!error_str.is_empty());

            // Out-of-range values surface the first violation
            let rejected = CString::new(
                r#"{
                "age": 17,
                "marital_status": "no",
                "gender": "female",
                "bmi": 22.0,
                "snoring_rate": "5",
                "respiration_rate": 15.0,
                "body_temperature": 98.0,
                "limb_movement": "3",
                "blood_oxygen": 95.0,
                "eye_movement": "10",
                "sleeping_hours": 7.0,
                "heart_rate": 60.0
            }"#,
            )
            .unwrap();
            let result = stress_screen_json(rejected.as_ptr());
            assert!(result.is_null());
            let error_str = CStr::from_ptr(stress_last_error()).to_str().unwrap();
            assert!(error_str.contains("`age` must be between 18 and 80"));
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = stress_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
