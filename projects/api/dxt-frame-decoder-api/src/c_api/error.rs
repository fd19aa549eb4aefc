//! C API error handling for frame decoder operations.

use crate::error::FrameDecoderError;
use core::ffi::c_char;

/// C-compatible error codes for frame decoder operations.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfdErrorCode {
    /// Operation succeeded
    Success = 0,
    /// The low nibble of the type id names no known texture format
    UnknownFormat = 1,
    /// There is no software RGBA32 conversion for the texture format
    UnsupportedConversion = 2,
    /// The frame does not match the decoder's buffer sizes
    SizeMismatch = 3,
    /// The bitstream decoder failed to decode the frame
    BitstreamDecodeFailed = 4,
    /// The bitstream decoder produced a different texture format than expected
    FormatMismatch = 5,
    /// The calling thread already holds the buffer lock
    WouldDeadlock = 6,
    /// Unlock was called on a buffer that is not locked
    NotLocked = 7,
    /// Null pointer provided for decoder parameter
    NullDecoderPointer = 8,
    /// Null pointer provided for input parameter
    NullInputPointer = 9,
    /// Null pointer provided for an output parameter
    NullOutputPointer = 10,
    /// The frame dimensions are too large for its buffers to be allocated
    FrameTooLarge = 11,
}

/// C-compatible Result type for frame decoder operations.
#[repr(C)]
pub struct DfdResult {
    /// Error code (0 = success, non-zero = error)
    pub error_code: DfdErrorCode,
}

impl DfdResult {
    /// Create a success result
    pub const fn success() -> Self {
        Self {
            error_code: DfdErrorCode::Success,
        }
    }

    /// Create an error result from an error code
    pub const fn from_error_code(error_code: DfdErrorCode) -> Self {
        Self { error_code }
    }

    /// Check if the result is successful
    pub fn is_success(&self) -> bool {
        matches!(self.error_code, DfdErrorCode::Success)
    }
}

impl<T> From<Result<T, FrameDecoderError>> for DfdResult {
    fn from(result: Result<T, FrameDecoderError>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(e) => e.into(),
        }
    }
}

impl From<FrameDecoderError> for DfdResult {
    fn from(error: FrameDecoderError) -> Self {
        let error_code = match error {
            FrameDecoderError::UnknownFormat(_) => DfdErrorCode::UnknownFormat,
            // Unreachable from C: create sets every parameter.
            FrameDecoderError::MissingParameter(_) => DfdErrorCode::UnknownFormat,
            FrameDecoderError::UnsupportedConversion(_) => DfdErrorCode::UnsupportedConversion,
            FrameDecoderError::Convert(_) => DfdErrorCode::SizeMismatch,
            FrameDecoderError::Bitstream(_) => DfdErrorCode::BitstreamDecodeFailed,
            FrameDecoderError::FormatMismatch { .. } => DfdErrorCode::FormatMismatch,
            FrameDecoderError::FrameTooLarge { .. } => DfdErrorCode::FrameTooLarge,
            FrameDecoderError::WouldDeadlock => DfdErrorCode::WouldDeadlock,
            FrameDecoderError::NotLocked | FrameDecoderError::ForeignLock => {
                DfdErrorCode::NotLocked
            }
        };
        Self::from_error_code(error_code)
    }
}

/// Get a null-terminated string description of the error code.
///
/// The returned string is a static string literal that does not need to be freed.
///
/// # Safety
/// This function is safe to call with any error code value.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dfd_error_message(error_code: DfdErrorCode) -> *const c_char {
    match error_code {
        DfdErrorCode::Success => c"Success".as_ptr(),
        DfdErrorCode::UnknownFormat => {
            c"Unknown texture format: the low nibble of the type id names no known format".as_ptr()
        }
        DfdErrorCode::UnsupportedConversion => {
            c"No software RGBA32 conversion exists for the texture format".as_ptr()
        }
        DfdErrorCode::SizeMismatch => c"Frame size does not match the decoder buffers".as_ptr(),
        DfdErrorCode::BitstreamDecodeFailed => c"Bitstream decode failed".as_ptr(),
        DfdErrorCode::FormatMismatch => {
            c"Bitstream produced a different texture format than the decoder was created for"
                .as_ptr()
        }
        DfdErrorCode::WouldDeadlock => c"The calling thread already holds the buffer lock".as_ptr(),
        DfdErrorCode::NotLocked => c"The buffer is not locked".as_ptr(),
        DfdErrorCode::NullDecoderPointer => c"Null pointer provided for decoder parameter".as_ptr(),
        DfdErrorCode::NullInputPointer => c"Null pointer provided for input parameter".as_ptr(),
        DfdErrorCode::NullOutputPointer => c"Null pointer provided for output parameter".as_ptr(),
        DfdErrorCode::FrameTooLarge => c"The frame dimensions are too large to buffer".as_ptr(),
    }
}
