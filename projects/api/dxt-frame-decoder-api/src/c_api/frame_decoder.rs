//! Opaque frame decoder handle for the C API.
//!
//! The handle decodes frames that are already raw DXT block data (see [`RawBlockSource`]).

use core::{ptr, slice};

use super::error::{DfdErrorCode, DfdResult};
use crate::bitstream::RawBlockSource;
use crate::frame_decoder::FrameDecoder;
use crate::frame_decoder_builder::FrameDecoderBuilder;
use dxt_frame_decoder_common::capability::ConversionPolicy;
use dxt_frame_decoder_common::texture_format::TextureFormat;

/// Opaque frame decoder type.
///
/// This handle must be:
///
/// - Created with [`dfd_frame_decoder_create()`]
/// - Freed with [`dfd_frame_decoder_free()`] when no longer needed
///
/// A handle may be shared between threads: one thread decoding frames while another locks
/// the buffer is the intended use.
#[repr(C)]
pub struct DfdFrameDecoder {
    // Private field to ensure it's opaque
    _private: [u8; 0],
}

/// Whether decoded frames are converted to RGBA32.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfdConversionPolicy {
    /// Convert on iOS and Android, pass frames through elsewhere
    Detect = 0,
    /// Always pass frames through as raw blocks
    Native = 1,
    /// Always convert frames to RGBA32
    SoftwareRgba32 = 2,
}

impl From<DfdConversionPolicy> for ConversionPolicy {
    fn from(policy: DfdConversionPolicy) -> Self {
        match policy {
            DfdConversionPolicy::Detect => ConversionPolicy::detect(),
            DfdConversionPolicy::Native => ConversionPolicy::Native,
            DfdConversionPolicy::SoftwareRgba32 => ConversionPolicy::SoftwareRgba32,
        }
    }
}

type Inner = FrameDecoder<RawBlockSource>;

/// Get the decoder behind a handle.
///
/// # Safety
/// - `decoder` must be a valid pointer returned by [`dfd_frame_decoder_create()`]
unsafe fn get_decoder<'a>(decoder: *const DfdFrameDecoder) -> &'a Inner {
    debug_assert!(!decoder.is_null());
    unsafe { &*(decoder as *const Inner) }
}

/// Create a frame decoder for raw block frames.
///
/// # Parameters
/// - `width`, `height`: Frame size in pixels
/// - `type_id`: Stream type id; its low nibble selects the texture format
/// - `policy`: Whether to convert frames to RGBA32
/// - `out_decoder`: Receives the new decoder on success
///
/// # Returns
/// A [`DfdResult`] indicating success or containing an error.
///
/// # Safety
/// - `out_decoder` must be valid for writes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dfd_frame_decoder_create(
    width: usize,
    height: usize,
    type_id: u32,
    policy: DfdConversionPolicy,
    out_decoder: *mut *mut DfdFrameDecoder,
) -> DfdResult {
    if out_decoder.is_null() {
        return DfdResult::from_error_code(DfdErrorCode::NullOutputPointer);
    }

    let format = match TextureFormat::from_type_id(type_id) {
        Ok(format) => format,
        Err(e) => return crate::FrameDecoderError::from(e).into(),
    };

    let result = FrameDecoderBuilder::new()
        .width(width)
        .height(height)
        .type_id(type_id)
        .policy(policy.into())
        .build(RawBlockSource::new(format));

    match result {
        Ok(decoder) => {
            let raw = Box::into_raw(Box::new(decoder)) as *mut DfdFrameDecoder;
            unsafe { out_decoder.write(raw) };
            DfdResult::success()
        }
        Err(e) => e.into(),
    }
}

/// Free a frame decoder.
///
/// # Safety
/// - `decoder` must be a valid pointer returned by [`dfd_frame_decoder_create()`], or null
/// - `decoder` must not have been freed already, and no other thread may be using it
/// - After calling this function, `decoder` becomes invalid
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dfd_frame_decoder_free(decoder: *mut DfdFrameDecoder) {
    if !decoder.is_null() {
        unsafe {
            drop(Box::from_raw(decoder as *mut Inner));
        }
    }
}

/// Decode one frame of raw blocks into the decoder's buffer.
///
/// Blocks while the buffer is locked by another thread.
///
/// # Safety
/// - `decoder` must be a valid pointer to a [`DfdFrameDecoder`]
/// - `input` must be valid for reads of `input_len` bytes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dfd_frame_decoder_decode_frame(
    decoder: *const DfdFrameDecoder,
    input: *const u8,
    input_len: usize,
) -> DfdResult {
    if decoder.is_null() {
        return DfdResult::from_error_code(DfdErrorCode::NullDecoderPointer);
    }
    if input.is_null() {
        return DfdResult::from_error_code(DfdErrorCode::NullInputPointer);
    }

    let input = unsafe { slice::from_raw_parts(input, input_len) };
    let decoder = unsafe { get_decoder(decoder) };
    decoder.decode_frame(input).into()
}

/// Lock the decoder's buffer for reading.
///
/// The buffer stays locked until [`dfd_frame_decoder_unlock_buffer()`] is called; until then
/// every decode blocks.
///
/// # Safety
/// - `decoder` must be a valid pointer to a [`DfdFrameDecoder`]
/// - `out_data` and `out_len` must be valid for writes
/// - The data pointer must not be read after the matching unlock
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dfd_frame_decoder_lock_buffer(
    decoder: *const DfdFrameDecoder,
    out_data: *mut *const u8,
    out_len: *mut usize,
) -> DfdResult {
    if decoder.is_null() {
        return DfdResult::from_error_code(DfdErrorCode::NullDecoderPointer);
    }
    if out_data.is_null() || out_len.is_null() {
        return DfdResult::from_error_code(DfdErrorCode::NullOutputPointer);
    }

    let decoder = unsafe { get_decoder(decoder) };
    match decoder.lock_buffer() {
        Ok(buffer) => {
            unsafe {
                out_data.write(buffer.as_ptr());
                out_len.write(buffer.len());
            }
            // Dropping the handle keeps the lock; `dfd_frame_decoder_unlock_buffer` releases it.
            DfdResult::success()
        }
        Err(e) => {
            unsafe {
                out_data.write(ptr::null());
                out_len.write(0);
            }
            e.into()
        }
    }
}

/// Unlock a buffer locked with [`dfd_frame_decoder_lock_buffer()`].
///
/// May be called from a different thread than the one that locked the buffer.
///
/// # Safety
/// - `decoder` must be a valid pointer to a [`DfdFrameDecoder`]
/// - The data pointer returned by the matching lock must not be read afterwards
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dfd_frame_decoder_unlock_buffer(
    decoder: *const DfdFrameDecoder,
) -> DfdResult {
    if decoder.is_null() {
        return DfdResult::from_error_code(DfdErrorCode::NullDecoderPointer);
    }

    let decoder = unsafe { get_decoder(decoder) };
    unsafe { decoder.unlock_buffer_unchecked() }.into()
}

/// Get the size in bytes of the decoder's buffer.
///
/// Returns 0 for a null decoder.
///
/// # Safety
/// - `decoder` must be a valid pointer to a [`DfdFrameDecoder`], or null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dfd_frame_decoder_buffer_size(decoder: *const DfdFrameDecoder) -> usize {
    if decoder.is_null() {
        return 0;
    }
    unsafe { get_decoder(decoder) }.buffer_size()
}

/// Get the size in bytes of one input frame of raw blocks.
///
/// Returns 0 for a null decoder.
///
/// # Safety
/// - `decoder` must be a valid pointer to a [`DfdFrameDecoder`], or null
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dfd_frame_decoder_frame_size(decoder: *const DfdFrameDecoder) -> usize {
    if decoder.is_null() {
        return 0;
    }
    unsafe { get_decoder(decoder) }.compressed_frame_size()
}
