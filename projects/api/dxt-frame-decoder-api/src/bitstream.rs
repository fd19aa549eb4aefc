//! The bitstream decoder seam.
//!
//! A [`BitstreamDecoder`] turns one compressed video frame into raw block data (DXT1, DXT5,
//! ...). The [`FrameDecoder`] owns the buffers and the locking; the bitstream decoder only
//! ever sees a destination slice and a [`WorkDispatcher`].
//!
//! [`FrameDecoder`]: crate::FrameDecoder

use crate::dispatch::WorkDispatcher;
use dxt_frame_decoder_common::texture_format::TextureFormat;
use thiserror::Error;

/// Decodes one compressed video frame into raw texture blocks.
pub trait BitstreamDecoder {
    /// Error reported when a frame cannot be decoded.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Decodes `input` into `output`.
    ///
    /// # Parameters
    ///
    /// - `input`: One compressed frame
    /// - `output`: Destination for the raw blocks; its length is the maximum output length
    /// - `dispatcher`: Runs the independent pieces of work the frame is split into
    ///
    /// # Returns
    ///
    /// The texture format of the blocks written to `output`.
    fn decode(
        &self,
        input: &[u8],
        output: &mut [u8],
        dispatcher: &dyn WorkDispatcher,
    ) -> Result<TextureFormat, Self::Error>;
}

impl<T: BitstreamDecoder + ?Sized> BitstreamDecoder for &T {
    type Error = T::Error;

    #[inline]
    fn decode(
        &self,
        input: &[u8],
        output: &mut [u8],
        dispatcher: &dyn WorkDispatcher,
    ) -> Result<TextureFormat, Self::Error> {
        (**self).decode(input, output, dispatcher)
    }
}

/// Errors raised by [`RawBlockSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RawBlockSourceError {
    /// The frame is not exactly one frame worth of blocks.
    #[error("Frame length mismatch: expected {expected} bytes of block data, got {actual} bytes.")]
    LengthMismatch {
        /// The frame size in bytes
        expected: usize,
        /// The size of the input in bytes
        actual: usize,
    },
}

/// Default number of bytes copied per work item by [`RawBlockSource`].
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// A [`BitstreamDecoder`] for frames that are already raw block data.
///
/// Useful for frame dumps and tests: every input is copied to the output as is, split into
/// chunks that are handed to the dispatcher one work item each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlockSource {
    format: TextureFormat,
    chunk_size: usize,
}

impl RawBlockSource {
    /// Creates a source that reports every frame as `format`.
    pub const fn new(format: TextureFormat) -> Self {
        Self {
            format,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sets the number of bytes copied per work item. A chunk size of 0 is treated as 1.
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size == 0 { 1 } else { chunk_size };
        self
    }

    /// The format every frame is reported as.
    pub const fn format(&self) -> TextureFormat {
        self.format
    }

    /// Number of bytes copied per work item.
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl BitstreamDecoder for RawBlockSource {
    type Error = RawBlockSourceError;

    fn decode(
        &self,
        input: &[u8],
        output: &mut [u8],
        dispatcher: &dyn WorkDispatcher,
    ) -> Result<TextureFormat, Self::Error> {
        if input.len() != output.len() {
            return Err(RawBlockSourceError::LengthMismatch {
                expected: output.len(),
                actual: input.len(),
            });
        }

        let chunk_size = self.chunk_size;
        let count = input.len().div_ceil(chunk_size);
        dispatcher.dispatch(
            &mut |index| {
                let start = index * chunk_size;
                let end = (start + chunk_size).min(input.len());
                output[start..end].copy_from_slice(&input[start..end]);
            },
            count,
        );

        Ok(self.format)
    }
}
