#![doc = include_str!("../README.MD")]
#![warn(missing_docs)]

//! Safe, high-level frame decoding for DXT1/DXT5 video frames.
//!
//! A [`FrameDecoder`] owns one output buffer per video stream. Each
//! [`FrameDecoder::decode_frame`] call runs a [`BitstreamDecoder`] over a compressed frame and,
//! on platforms whose GPU cannot sample DXT textures, converts the blocks to RGBA32. Consumers
//! read the buffer through [`FrameDecoder::lock_buffer`] / [`FrameDecoder::unlock_buffer`].
//!
//! # Examples
//!
//! ```
//! use dxt_frame_decoder_api::{FrameDecoder, RawBlockSource, rgba32_buffer_size};
//! use dxt_frame_decoder_common::texture_format::TextureFormat;
//!
//! let decoder = FrameDecoder::new(64, 32, 0xe, RawBlockSource::new(TextureFormat::Dxt5))?;
//! decoder.decode_frame(&vec![0u8; decoder.compressed_frame_size()])?;
//!
//! let size = decoder.with_buffer(|pixels| pixels.len())?;
//! assert_eq!(size, decoder.buffer_size());
//! assert_eq!(rgba32_buffer_size(64, 32), 64 * 32 * 4);
//! # Ok::<(), dxt_frame_decoder_api::FrameDecoderError>(())
//! ```

pub mod bitstream;
pub mod dispatch;
pub mod error;
pub mod frame_decoder;
pub mod frame_decoder_builder;
mod lock;

#[cfg(feature = "c-exports")]
pub mod c_api;

// Re-export main functionality at crate root
pub use bitstream::{BitstreamDecoder, RawBlockSource, RawBlockSourceError};
pub use dispatch::{SequentialDispatcher, WorkDispatcher};
pub use dxt_frame_decoder_bc3::Dxt5DecodeOrder;
pub use dxt_frame_decoder_common::capability::{ConversionPolicy, UploadFormat};
pub use dxt_frame_decoder_common::texture_format::{CodecType, TextureFormat};
pub use error::{FrameDecoderError, FrameDecoderResult};
pub use frame_decoder::{FrameDecoder, LockedBuffer, has_converter};
pub use frame_decoder_builder::FrameDecoderBuilder;

/// Size in bytes of the RGBA32 output of a `width` x `height` frame: `width * height * 4`.
#[inline]
pub const fn rgba32_buffer_size(width: usize, height: usize) -> usize {
    ConversionPolicy::rgba32_buffer_size(width, height)
}
