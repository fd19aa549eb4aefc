//! Error types for frame decoding.

use dxt_frame_decoder_bc1::ConvertError;
use dxt_frame_decoder_common::texture_format::{TextureFormat, UnknownTypeIdError};
use thiserror::Error;

/// Result type for frame decoder operations.
pub type FrameDecoderResult<T> = Result<T, FrameDecoderError>;

/// Errors that can occur while building or driving a [`FrameDecoder`].
///
/// [`FrameDecoder`]: crate::FrameDecoder
#[derive(Debug, Error)]
pub enum FrameDecoderError {
    /// The `type_id` nibble did not name a known texture format.
    #[error(transparent)]
    UnknownFormat(#[from] UnknownTypeIdError),

    /// The frame is too large for its buffers to be addressed.
    #[error("A {width}x{height} frame does not fit in memory.")]
    FrameTooLarge {
        /// Frame width in pixels
        width: usize,
        /// Frame height in pixels
        height: usize,
    },

    /// A required builder parameter was never set.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The decoder converts to RGBA32, but there is no software decoder for this format.
    #[error("No software conversion to RGBA32 exists for {0:?} frames.")]
    UnsupportedConversion(TextureFormat),

    /// The scratch or output buffer does not match the frame size.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The bitstream decoder reported a failure.
    #[error("Bitstream decode failed: {0}")]
    Bitstream(#[source] Box<dyn core::error::Error + Send + Sync + 'static>),

    /// The bitstream decoder produced frames of a different block layout than the decoder was
    /// created for.
    #[error("Bitstream produced {detected:?} frames, expected {expected:?}.")]
    FormatMismatch {
        /// The format the decoder was created for
        expected: TextureFormat,
        /// The format reported by the bitstream decoder
        detected: TextureFormat,
    },

    /// The calling thread already holds the buffer lock; waiting for it would never return.
    #[error("The calling thread already holds the buffer lock.")]
    WouldDeadlock,

    /// Unlock was called without a matching lock.
    #[error("The buffer is not locked.")]
    NotLocked,

    /// The [`LockedBuffer`] handed to unlock was locked on a different decoder.
    ///
    /// [`LockedBuffer`]: crate::LockedBuffer
    #[error("The locked buffer belongs to a different decoder.")]
    ForeignLock,
}
