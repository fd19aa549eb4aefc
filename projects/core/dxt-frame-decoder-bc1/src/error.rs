//! Error types for frame conversion.

use thiserror::Error;

/// Errors raised while converting a frame of compressed blocks to RGBA32.
///
/// Block decoding itself cannot fail; these are the size checks done before the
/// first block is touched. Nothing is written to the destination when they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The compressed source does not hold a block for every cell of the block grid.
    #[error("Source too small: need {required} bytes, but only {actual} bytes available.")]
    SourceTooSmall {
        /// The required size in bytes
        required: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// The RGBA32 destination cannot hold `width * height` pixels.
    #[error("Destination too small: need {required} bytes, but only {actual} bytes available.")]
    DestinationTooSmall {
        /// The required size in bytes
        required: usize,
        /// The actual size in bytes
        actual: usize,
    },
}
