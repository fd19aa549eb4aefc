//! Whole-frame DXT5 to RGBA32 conversion.

use crate::util::{decode_dxt5_block, Dxt5DecodeOrder, DXT5_BLOCK_SIZE};
use dxt_frame_decoder_bc1::{convert_blocks, ConvertError};

/// Converts a frame of DXT5 blocks into an RGBA32 image.
///
/// Each 16-byte block is decoded with [`Dxt5DecodeOrder::default`]. The result is the same for
/// every order; see [`convert_dxt5_to_rgba32_with_order`].
///
/// # Parameters
///
/// - `src`: DXT5 block data, at least `ceil(width / 4) * ceil(height / 4) * 16` bytes
/// - `dst`: RGBA32 destination, at least `width * height * 4` bytes
/// - `width`, `height`: Logical size of the frame in pixels
///
/// # Errors
///
/// [`ConvertError`] if either buffer is too small. Nothing is written in that case.
#[inline]
pub fn convert_dxt5_to_rgba32(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
) -> Result<(), ConvertError> {
    convert_dxt5_to_rgba32_with_order(src, dst, width, height, Dxt5DecodeOrder::default())
}

/// Converts a frame of DXT5 blocks into an RGBA32 image, decoding the two halves of each
/// block in the given order.
///
/// # Errors
///
/// [`ConvertError`] if either buffer is too small. Nothing is written in that case.
pub fn convert_dxt5_to_rgba32_with_order(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    order: Dxt5DecodeOrder,
) -> Result<(), ConvertError> {
    convert_blocks::<DXT5_BLOCK_SIZE, _>(src, dst, width, height, |block, output, stride| {
        decode_dxt5_block(block, output, stride, order)
    })
}
