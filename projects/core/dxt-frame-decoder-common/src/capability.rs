//! Capability gate: does this platform need software DXT to RGBA32 conversion?
//!
//! Desktop GPUs sample DXT1/DXT5 textures directly, so frames can be uploaded in
//! their compressed form. Mobile GPUs (iOS, Android) generally cannot, and frames
//! are converted to RGBA32 on the CPU before upload.
//!
//! The decision is a value, resolved once (usually via [`ConversionPolicy::detect`])
//! and handed to each decoder at construction. It is never re-queried per frame.

use crate::block_grid::BlockGrid;
use crate::texture_format::TextureFormat;
use derive_enum_all_values::AllValues;

/// Whether decoded frames are handed out in their compressed form or as RGBA32.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
pub enum ConversionPolicy {
    /// The GPU samples the compressed format; frames are passed through untouched.
    Native,
    /// Frames are decompressed to RGBA32 in software before being handed out.
    SoftwareRgba32,
}

impl ConversionPolicy {
    /// Resolves the policy for the compile target.
    ///
    /// iOS and Android targets convert; every other target passes frames through.
    #[inline]
    pub const fn detect() -> Self {
        if cfg!(any(target_os = "ios", target_os = "android")) {
            Self::SoftwareRgba32
        } else {
            Self::Native
        }
    }

    /// Returns `true` if frames must be converted to RGBA32.
    #[inline]
    pub const fn should_convert(self) -> bool {
        matches!(self, Self::SoftwareRgba32)
    }

    /// Size in bytes of an RGBA32 buffer of `width` x `height` pixels.
    ///
    /// Always `width * height * 4`, independent of block alignment.
    #[inline]
    pub const fn rgba32_buffer_size(width: usize, height: usize) -> usize {
        BlockGrid::new(width, height).rgba32_len()
    }

    /// The pixel format the consumer should upload frames of `format` as.
    #[inline]
    pub const fn upload_format(self, format: TextureFormat) -> UploadFormat {
        match self {
            Self::SoftwareRgba32 => UploadFormat::Rgba32,
            Self::Native => UploadFormat::Compressed(format),
        }
    }
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self::detect()
    }
}

/// The layout of the buffer a decoder hands to its consumer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UploadFormat {
    /// Uncompressed 8-bit RGBA, row-major, `width * 4` bytes per row.
    Rgba32,
    /// Raw compressed blocks in the given format.
    Compressed(TextureFormat),
}
