//! # Texture Formats
//!
//! Video streams describe the texture format of their frames with a `type_id` whose low
//! nibble selects the block compressed format. This module maps that nibble to a
//! [`TextureFormat`], which knows its bits per pixel and 4x4 block size.
//!
//! | nibble | format           | bpp | block bytes |
//! |--------|------------------|-----|-------------|
//! | `0xb`  | DXT1 (BC1)       | 4   | 8           |
//! | `0xe`  | DXT5 (BC3)       | 8   | 16          |
//! | `0xf`  | DXT5 YCoCg (BC3) | 8   | 16          |
//! | `0xc`  | BC7              | 8   | 16          |
//! | `0x1`  | BC4              | 4   | 8           |

use derive_enum_all_values::AllValues;
use thiserror::Error;

/// A block compressed texture format recognised in a stream `type_id`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
pub enum TextureFormat {
    /// DXT1 / BC1: one 8-byte colour block per 4x4 pixels.
    Dxt1,
    /// DXT5 / BC3: an 8-byte alpha block followed by an 8-byte colour block.
    Dxt5,
    /// DXT5 storing scaled YCoCg colour. Same block layout as [`TextureFormat::Dxt5`].
    Dxt5YCoCg,
    /// BC7. Only usable where the GPU consumes it natively.
    Bc7,
    /// BC4 (single channel). Only usable where the GPU consumes it natively.
    Bc4,
}

/// The `type_id` nibble did not name any known texture format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unrecognised texture format nibble 0x{nibble:x} in type id 0x{type_id:x}")]
pub struct UnknownTypeIdError {
    /// The full type id that was supplied.
    pub type_id: u32,
    /// The low nibble of `type_id`.
    pub nibble: u8,
}

impl TextureFormat {
    /// Resolves the format from the low nibble of a stream `type_id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dxt_frame_decoder_common::texture_format::TextureFormat;
    ///
    /// assert_eq!(TextureFormat::from_type_id(0xab), Ok(TextureFormat::Dxt1));
    /// assert!(TextureFormat::from_type_id(0x0).is_err());
    /// ```
    pub const fn from_type_id(type_id: u32) -> Result<Self, UnknownTypeIdError> {
        let nibble = (type_id & 0xf) as u8;
        match nibble {
            0xb => Ok(Self::Dxt1),
            0xe => Ok(Self::Dxt5),
            0xf => Ok(Self::Dxt5YCoCg),
            0xc => Ok(Self::Bc7),
            0x1 => Ok(Self::Bc4),
            _ => Err(UnknownTypeIdError { type_id, nibble }),
        }
    }

    /// The low nibble this format is encoded as.
    pub const fn nibble(self) -> u8 {
        match self {
            Self::Dxt1 => 0xb,
            Self::Dxt5 => 0xe,
            Self::Dxt5YCoCg => 0xf,
            Self::Bc7 => 0xc,
            Self::Bc4 => 0x1,
        }
    }

    /// Bits per pixel of the compressed representation.
    pub const fn bits_per_pixel(self) -> usize {
        match self {
            Self::Dxt1 | Self::Bc4 => 4,
            Self::Dxt5 | Self::Dxt5YCoCg | Self::Bc7 => 8,
        }
    }

    /// Bytes per 4x4 block of the compressed representation.
    pub const fn block_size(self) -> usize {
        self.bits_per_pixel() * 16 / 8
    }

    /// Whether two formats share the same block layout, i.e. decode the same way.
    pub const fn same_layout(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Dxt1, Self::Dxt1)
                | (Self::Bc4, Self::Bc4)
                | (Self::Bc7, Self::Bc7)
                | (Self::Dxt5 | Self::Dxt5YCoCg, Self::Dxt5 | Self::Dxt5YCoCg)
        )
    }

    /// The codec a stream of this format was encoded with.
    pub const fn codec(self) -> CodecType {
        match self {
            Self::Dxt1 => CodecType::Hap,
            Self::Dxt5 => CodecType::HapAlpha,
            Self::Dxt5YCoCg => CodecType::HapQ,
            Self::Bc7 | Self::Bc4 => CodecType::Unsupported,
        }
    }
}

/// The codec family of a video stream, as presented to players.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
pub enum CodecType {
    /// Not a codec this library can play back.
    Unsupported,
    /// Opaque colour frames (DXT1).
    Hap,
    /// Higher quality colour frames (DXT5 with YCoCg colour).
    HapQ,
    /// Colour frames with an alpha channel (DXT5).
    HapAlpha,
}

impl CodecType {
    /// Classifies a stream `type_id`; unknown nibbles map to [`CodecType::Unsupported`].
    pub const fn from_type_id(type_id: u32) -> Self {
        match TextureFormat::from_type_id(type_id) {
            Ok(format) => format.codec(),
            Err(_) => Self::Unsupported,
        }
    }
}
