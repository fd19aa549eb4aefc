//! Whole-frame conversion from compressed blocks to RGBA32.
//!
//! Blocks are stored row-major: block `(bx, by)` starts at byte `(by * blocks_x + bx) * block_size`
//! of the source, and its top left pixel lands at byte `(by * 4 * width + bx * 4) * 4` of the
//! destination, which has a stride of `width * 4` bytes.

use crate::error::ConvertError;
use crate::util::{decode_color_block, COLOR_BLOCK_SIZE};
use dxt_frame_decoder_common::block_grid::{BlockGrid, BLOCK_DIM, RGBA32_BYTES_PER_PIXEL};

// Bytes in one row of a 4x4 RGBA32 block.
const BLOCK_ROW_BYTES: usize = BLOCK_DIM * RGBA32_BYTES_PER_PIXEL;

/// Checks that `src` and `dst` are large enough to convert a `width` x `height` frame
/// made of `block_size` byte blocks.
///
/// # Returns
///
/// The block grid of the frame, or a [`ConvertError`] naming the undersized buffer.
pub fn validate_buffers(
    src_len: usize,
    dst_len: usize,
    width: usize,
    height: usize,
    block_size: usize,
) -> Result<BlockGrid, ConvertError> {
    let grid = BlockGrid::new(width, height);

    let required = grid.compressed_len(block_size);
    if src_len < required {
        return Err(ConvertError::SourceTooSmall {
            required,
            actual: src_len,
        });
    }

    let required = grid.rgba32_len();
    if dst_len < required {
        return Err(ConvertError::DestinationTooSmall {
            required,
            actual: dst_len,
        });
    }

    Ok(grid)
}

/// Walks the block grid of a frame and decodes every block into `dst`.
///
/// `decode_block` receives one block, a destination starting at the block's top left pixel and
/// the destination stride in bytes. It must write within the 4x4 region it is given.
///
/// Blocks that overhang the right or bottom edge of the image are decoded in full into a
/// scratch block, and only the pixels inside the image are copied out. Pixels of an image row
/// are therefore never overwritten by the overhang of a neighbouring block.
///
/// # Errors
///
/// [`ConvertError`] if either buffer is too small, see [`validate_buffers`].
pub fn convert_blocks<const BLOCK_SIZE: usize, F>(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    mut decode_block: F,
) -> Result<(), ConvertError>
where
    F: FnMut(&[u8; BLOCK_SIZE], &mut [u8], usize),
{
    let grid = validate_buffers(src.len(), dst.len(), width, height, BLOCK_SIZE)?;
    let stride = grid.rgba32_stride();

    let blocks = src[..grid.compressed_len(BLOCK_SIZE)]
        .chunks_exact(BLOCK_SIZE)
        .filter_map(|chunk| <&[u8; BLOCK_SIZE]>::try_from(chunk).ok());

    let coords = (0..grid.blocks_y).flat_map(|by| (0..grid.blocks_x).map(move |bx| (bx, by)));
    for ((bx, by), block) in coords.zip(blocks) {
        let offset = grid.rgba32_block_offset(bx, by);
        let (cols, rows) = grid.visible_extent(bx, by);

        if cols == BLOCK_DIM && rows == BLOCK_DIM {
            decode_block(block, &mut dst[offset..], stride);
            continue;
        }

        // Edge block: decode the full 4x4 extent aside, keep the visible part.
        let mut scratch = [0u8; BLOCK_ROW_BYTES * BLOCK_DIM];
        decode_block(block, &mut scratch, BLOCK_ROW_BYTES);

        let visible_bytes = cols * RGBA32_BYTES_PER_PIXEL;
        for y in 0..rows {
            let row = &scratch[y * BLOCK_ROW_BYTES..][..visible_bytes];
            dst[offset + y * stride..][..visible_bytes].copy_from_slice(row);
        }
    }

    Ok(())
}

/// Converts a frame of DXT1 blocks into an RGBA32 image.
///
/// # Parameters
///
/// - `src`: DXT1 block data, at least `ceil(width / 4) * ceil(height / 4) * 8` bytes
/// - `dst`: RGBA32 destination, at least `width * height * 4` bytes
/// - `width`, `height`: Logical size of the frame in pixels
///
/// # Errors
///
/// [`ConvertError`] if either buffer is too small. Nothing is written in that case.
///
/// # Example
///
/// ```
/// use dxt_frame_decoder_bc1::convert_dxt1_to_rgba32;
///
/// let blocks = [0x00, 0xF8, 0x1F, 0x00, 0x00, 0x00, 0x00, 0x00]; // one red 4x4 block
/// let mut rgba = vec![0u8; 4 * 4 * 4];
///
/// convert_dxt1_to_rgba32(&blocks, &mut rgba, 4, 4).unwrap();
/// assert!(rgba.chunks_exact(4).all(|p| p == [248, 0, 0, 255]));
/// ```
pub fn convert_dxt1_to_rgba32(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
) -> Result<(), ConvertError> {
    convert_blocks::<COLOR_BLOCK_SIZE, _>(src, dst, width, height, decode_color_block)
}
