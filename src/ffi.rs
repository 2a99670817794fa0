//! FFI (Foreign Function Interface) layer for C hosts
//!
//! This module exposes the converter to C code: a static site generator, a
//! web server filter or any other host that renders HTML and wants emoji
//! substituted before the page is written out.
//!
//! # FFI Boundary Contract
//!
//! ## String Representation
//!
//! **All strings use UTF-8 bytes + length (NOT NUL-terminated C strings)**
//!
//! - Pointer field: `*const u8` for input, `*mut u8` for output
//! - Length field: `usize` with `_len` suffix (byte count, no terminator)
//! - A zero length means "empty" for inputs and "unset" for options; the
//!   pointer may then be NULL
//!
//! ```c
//! // CORRECT: Use length field
//! fwrite(result.output, 1, result.output_len, out);
//!
//! // WRONG: Do NOT use strlen()
//! size_t len = strlen((char*)result.output);  // INCORRECT!
//! ```
//!
//! ## Memory Management
//!
//! - Rust allocates all output memory using `Box<[u8]>`
//! - C must call `emoji_result_free()` exactly once per filled result
//! - C must call `emoji_converter_free()` exactly once per handle
//! - Freeing is idempotent: freed fields are reset to NULL / 0
//!
//! ```rust
//! use emoji_converter::ffi::{EmojiResult, emoji_result_free};
//! use std::ptr;
//!
//! let output = String::from("<p>&#x1f609;</p>");
//! let output_len = output.len();
//! let output_ptr = Box::into_raw(output.into_bytes().into_boxed_slice()) as *mut u8;
//!
//! let mut result = EmojiResult {
//!     output: output_ptr,
//!     output_len,
//!     error_code: 0,
//!     error_message: ptr::null_mut(),
//!     error_len: 0,
//! };
//!
//! unsafe { emoji_result_free(&mut result) };
//! assert!(result.output.is_null());
//! assert_eq!(result.output_len, 0);
//! ```
//!
//! ## Error Handling Contract
//!
//! **Success:** `error_code = 0`, `error_message = NULL`, `output` holds the
//! converted HTML (NULL when the output is empty).
//!
//! **Error:** `error_code != 0` (see the `ERROR_*` constants), `error_message`
//! holds a UTF-8 description, `output` is NULL. No partial output is ever
//! returned.
//!
//! **Panic Safety:** every entry point runs inside `catch_unwind`; a panic is
//! reported as [`ERROR_INTERNAL`] and never unwinds into C.
//!
//! ## Thread Safety
//!
//! - `EmojiConverterHandle` is NOT thread-safe
//! - `emoji_convert()` temporarily reconfigures the handle, so concurrent
//!   calls on the same handle are unsafe
//! - Use one handle per worker thread

use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::slice;

use crate::config::{ConfigOverrides, SiteConfig};
use crate::converter::Converter;
use crate::error::EmojiError;

// ============================================================================
// Error Code Constants
// ============================================================================

/// Success - no error occurred
pub const ERROR_SUCCESS: u32 = 0;

/// Unknown output format name
pub const ERROR_UNSUPPORTED_FORMAT: u32 = 1;

/// Embedded SVG asset could not be retrieved
pub const ERROR_ASSET_UNAVAILABLE: u32 = 2;

/// Embedded SVG asset is not a usable SVG document
pub const ERROR_INVALID_ASSET: u32 = 3;

/// Reference data is malformed
pub const ERROR_REFERENCE_DATA: u32 = 4;

/// Site configuration is malformed
pub const ERROR_CONFIG: u32 = 5;

/// Document nesting exceeds the traversal limit
pub const ERROR_NESTING_TOO_DEEP: u32 = 6;

/// Invalid input data (NULL pointers, invalid UTF-8, bad option values)
pub const ERROR_INVALID_INPUT: u32 = 7;

/// Token pattern failed to compile
pub const ERROR_PATTERN: u32 = 8;

/// Serialization failed
pub const ERROR_SERIALIZE: u32 = 9;

/// Internal error (panic caught)
pub const ERROR_INTERNAL: u32 = 99;

/// Tri-state option value: keep the converter's baseline setting
pub const OPTION_UNSET: i8 = -1;

// ============================================================================
// FFI Data Structures
// ============================================================================

/// Per-call overrides passed from C to Rust
///
/// Every field is optional; unset fields keep the baseline established when
/// the handle was created, and the handle returns to that baseline after
/// the call.
///
/// - `format` / `format_len`: output format name (`html`, `unicode`,
///   `emojione-png`, `emojione-svg`, `emojione-svg-embed`); length 0 = unset
/// - `ascii`: -1 = unset, 0 = off, 1 = on
/// - `shortname`: -1 = unset, 0 = off, 1 = on
///
/// ```c
/// const char *format = "unicode";
/// emoji_options_t options = {
///     .format = (const uint8_t*)format,
///     .format_len = strlen(format),
///     .ascii = 1,
///     .shortname = -1
/// };
/// ```
#[repr(C)]
pub struct EmojiOptions {
    /// Output format name (UTF-8 bytes, can be NULL)
    pub format: *const u8,
    /// Length of format in bytes (0 = unset)
    pub format_len: usize,
    /// ASCII glyph matching: -1 unset, 0 off, 1 on
    pub ascii: i8,
    /// Shortname matching: -1 unset, 0 off, 1 on
    pub shortname: i8,
}

/// Conversion result returned from Rust to C
///
/// # Memory Ownership
///
/// Rust owns `output` and `error_message`. C must release them with
/// `emoji_result_free()` and must NOT call `free()` on them.
///
/// # State Invariants
///
/// - Success: `error_code == 0`, `error_message == NULL`, `error_len == 0`
/// - Error: `error_code != 0`, `output == NULL`, `output_len == 0`
#[repr(C)]
pub struct EmojiResult {
    /// Converted HTML (UTF-8 bytes, NOT NUL-terminated)
    pub output: *mut u8,
    /// Byte length of output
    pub output_len: usize,
    /// Error code (0 = success)
    pub error_code: u32,
    /// Error description (UTF-8 bytes, NOT NUL-terminated)
    pub error_message: *mut u8,
    /// Byte length of error_message
    pub error_len: usize,
}

/// Opaque converter handle
///
/// Created by `emoji_converter_new()`, released by `emoji_converter_free()`.
pub struct EmojiConverterHandle {
    converter: Converter,
}

fn reset_result(result: &mut EmojiResult) {
    result.output = ptr::null_mut();
    result.output_len = 0;
    result.error_code = ERROR_SUCCESS;
    result.error_message = ptr::null_mut();
    result.error_len = 0;
}

fn set_error_result(result: &mut EmojiResult, error_code: u32, error_message: String) {
    let error_bytes = error_message.into_bytes().into_boxed_slice();
    result.error_code = error_code;
    result.error_len = error_bytes.len();
    result.error_message = Box::into_raw(error_bytes) as *mut u8;
}

fn set_success_result(result: &mut EmojiResult, output: String) {
    result.error_code = ERROR_SUCCESS;
    result.error_message = ptr::null_mut();
    result.error_len = 0;

    if output.is_empty() {
        return;
    }

    let output_bytes = output.into_bytes().into_boxed_slice();
    result.output_len = output_bytes.len();
    result.output = Box::into_raw(output_bytes) as *mut u8;
}

fn required_bytes<'a>(ptr: *const u8, len: usize, name: &str) -> Result<&'a [u8], EmojiError> {
    if len == 0 {
        return Ok(&[]);
    }

    if ptr.is_null() {
        return Err(EmojiError::InvalidInput(format!(
            "{name}_len > 0 with NULL {name} pointer"
        )));
    }

    // SAFETY: Pointer was validated as non-NULL above; caller guarantees `len`
    // bytes are valid and readable for the duration of this call.
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

fn required_utf8<'a>(ptr: *const u8, len: usize, name: &str) -> Result<&'a str, EmojiError> {
    let bytes = required_bytes(ptr, len, name)?;
    std::str::from_utf8(bytes)
        .map_err(|e| EmojiError::InvalidInput(format!("{name} is not valid UTF-8: {e}")))
}

fn optional_utf8<'a>(ptr: *const u8, len: usize, name: &str) -> Result<Option<&'a str>, EmojiError> {
    if len == 0 {
        return Ok(None);
    }
    required_utf8(ptr, len, name).map(Some)
}

fn tri_state(value: i8, name: &str) -> Result<Option<bool>, EmojiError> {
    match value {
        OPTION_UNSET => Ok(None),
        0 => Ok(Some(false)),
        1 => Ok(Some(true)),
        other => Err(EmojiError::InvalidInput(format!(
            "{name} must be -1, 0 or 1, got {other}"
        ))),
    }
}

fn overrides_from(options: &EmojiOptions) -> Result<ConfigOverrides, EmojiError> {
    Ok(ConfigOverrides {
        format: optional_utf8(options.format, options.format_len, "format")?.map(str::to_string),
        ascii: tri_state(options.ascii, "ascii")?,
        shortname: tri_state(options.shortname, "shortname")?,
        src: None,
    })
}

fn new_inner(data: &str, site_yaml: &str) -> Result<EmojiConverterHandle, EmojiError> {
    let site = SiteConfig::from_yaml(site_yaml)?;
    let converter = Converter::from_reference_json(data, &site.overrides())?;
    Ok(EmojiConverterHandle { converter })
}

fn convert_inner(
    handle: &mut EmojiConverterHandle,
    input: &[u8],
    options: Option<&EmojiOptions>,
) -> Result<String, EmojiError> {
    let input = std::str::from_utf8(input)
        .map_err(|e| EmojiError::InvalidInput(format!("input is not valid UTF-8: {e}")))?;

    match options {
        Some(options) => {
            let overrides = overrides_from(options)?;
            handle
                .converter
                .with_overrides(&overrides, |converter| converter.convert(input))
        }
        None => handle.converter.convert(input),
    }
}

fn free_buffer(ptr_field: &mut *mut u8, len_field: &mut usize) {
    if (*ptr_field).is_null() {
        return;
    }

    let raw = ptr::slice_from_raw_parts_mut(*ptr_field, *len_field);
    // SAFETY: `raw` was allocated by `Box<[u8]>` via `Box::into_raw`.
    let _ = unsafe { Box::from_raw(raw) };
    *ptr_field = ptr::null_mut();
    *len_field = 0;
}

// ============================================================================
// FFI Functions
// ============================================================================

/// Create a converter from emoji reference JSON and a site configuration
///
/// `site_yaml` may be empty (defaults: `html`, ascii off, shortname on).
/// Returns NULL when the data or configuration is unusable; the reason is
/// logged through `tracing`.
///
/// # Safety
///
/// `data` must point to `data_len` readable bytes and `site_yaml` to
/// `site_yaml_len` readable bytes (either may be NULL when its length is 0).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn emoji_converter_new(
    data: *const u8,
    data_len: usize,
    site_yaml: *const u8,
    site_yaml_len: usize,
) -> *mut EmojiConverterHandle {
    let result = panic::catch_unwind(|| -> Result<EmojiConverterHandle, EmojiError> {
        let data = required_utf8(data, data_len, "data")?;
        let site_yaml = required_utf8(site_yaml, site_yaml_len, "site_yaml")?;
        new_inner(data, site_yaml)
    });

    match result {
        Ok(Ok(handle)) => Box::into_raw(Box::new(handle)),
        Ok(Err(e)) => {
            tracing::warn!(code = e.code(), error = %e, "Failed to create emoji converter");
            ptr::null_mut()
        }
        Err(_) => {
            tracing::warn!("Panic while creating emoji converter");
            ptr::null_mut()
        }
    }
}

/// Convert one HTML document
///
/// `options` may be NULL to convert with the handle's baseline settings.
///
/// # Safety
///
/// - `handle` must come from `emoji_converter_new()` and not be freed
/// - `input` must point to `input_len` readable bytes (NULL allowed if 0)
/// - `options`, if non-NULL, must point to a valid `EmojiOptions`
/// - `result` must point to a writable `EmojiResult`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn emoji_convert(
    handle: *mut EmojiConverterHandle,
    input: *const u8,
    input_len: usize,
    options: *const EmojiOptions,
    result: *mut EmojiResult,
) {
    if result.is_null() {
        // Cannot report error if result pointer is NULL.
        return;
    }

    // SAFETY: `result` was validated as non-NULL above.
    let result_ref = unsafe { &mut *result };
    reset_result(result_ref);

    let panic_result = panic::catch_unwind(AssertUnwindSafe(|| -> Result<String, EmojiError> {
        if handle.is_null() {
            return Err(EmojiError::InvalidInput(
                "Converter handle pointer is NULL".to_string(),
            ));
        }
        // SAFETY: `handle` is non-NULL and was created by `emoji_converter_new`;
        // the caller guarantees exclusive access for the duration of the call.
        let handle_ref = unsafe { &mut *handle };
        // SAFETY: Caller guarantees a non-NULL `options` points to a valid value.
        let options_ref = unsafe { options.as_ref() };
        let input_slice = required_bytes(input, input_len, "input")?;
        convert_inner(handle_ref, input_slice, options_ref)
    }));

    match panic_result {
        Ok(Ok(output)) => set_success_result(result_ref, output),
        Ok(Err(e)) => set_error_result(result_ref, e.code(), e.to_string()),
        Err(_) => set_error_result(
            result_ref,
            ERROR_INTERNAL,
            "Internal panic during conversion".to_string(),
        ),
    }
}

/// Release the buffers of a result filled by `emoji_convert()`
///
/// # Safety
///
/// `result` must be NULL or point to an `EmojiResult` whose buffers were
/// allocated by this library.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn emoji_result_free(result: *mut EmojiResult) {
    if result.is_null() {
        return;
    }

    // SAFETY: `result` was validated as non-NULL above.
    let result_ref = unsafe { &mut *result };
    free_buffer(&mut result_ref.output, &mut result_ref.output_len);
    free_buffer(&mut result_ref.error_message, &mut result_ref.error_len);
    result_ref.error_code = ERROR_SUCCESS;
}

/// Release a converter handle
///
/// # Safety
///
/// `handle` must be NULL or come from `emoji_converter_new()` and not have
/// been freed already.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn emoji_converter_free(handle: *mut EmojiConverterHandle) {
    if handle.is_null() {
        return;
    }

    // SAFETY: `handle` was validated as non-NULL above and was originally
    // created by `Box::into_raw` in `emoji_converter_new`.
    unsafe { drop(Box::from_raw(handle)) };
}
