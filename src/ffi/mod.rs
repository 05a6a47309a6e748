#![allow(dead_code)]
//! Foreign Function Interface (FFI) bootstrap module.
//! The mobile shells (Swift/Kotlin) embed this core over a stable C ABI.
//! This file defines the shared version identifiers, error codes, and helper
//! functions the bindings rely on; the data-carrying surface is JSON-in/
//! JSON-out and lives with the host glue.

use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::OnceLock;

/// Semantic version of the Rust core (mirrors `Cargo.toml`).
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Semantic version of the FFI surface. Bumps when ABI/contract changes.
pub const FFI_VERSION: &str = "0.1.0";

/// Error categories surfaced across the FFI boundary.
#[repr(i32)]
#[derive(Debug, Clone, Copy)]
pub enum FfiErrorCategory {
    Ok = 0,
    Validation = 1,
    Persistence = 2,
    Sync = 3,
    Capture = 4,
    Internal = 5,
}

impl From<FfiErrorCategory> for i32 {
    fn from(value: FfiErrorCategory) -> Self {
        value as i32
    }
}

/// Returns the core (Rust) semantic version as a C string.
#[no_mangle]
pub extern "C" fn ffi_core_version() -> *const c_char {
    static CORE: OnceLock<CString> = OnceLock::new();
    CORE.get_or_init(|| CString::new(CORE_VERSION).expect("static core version"))
        .as_ptr()
}

/// Returns the FFI interface semantic version as a C string.
#[no_mangle]
pub extern "C" fn ffi_version() -> *const c_char {
    static FFI: OnceLock<CString> = OnceLock::new();
    FFI.get_or_init(|| CString::new(FFI_VERSION).expect("static ffi version"))
        .as_ptr()
}

/// Maps core error values into ABI-stable categories.
pub fn classify_error(err: &crate::errors::CoreError) -> FfiErrorCategory {
    use crate::errors::CoreError;
    match err {
        CoreError::InvalidInput(_) | CoreError::InvalidReference(_) => FfiErrorCategory::Validation,
        CoreError::RecordNotFound(_) => FfiErrorCategory::Validation,
        CoreError::StorageError(_) | CoreError::ConfigError(_) => FfiErrorCategory::Persistence,
        CoreError::SyncError(_) => FfiErrorCategory::Sync,
        CoreError::CaptureError(_) => FfiErrorCategory::Capture,
    }
}
