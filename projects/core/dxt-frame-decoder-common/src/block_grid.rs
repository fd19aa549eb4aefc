//! The grid of 4x4 blocks covering an image.
//!
//! Images whose dimensions are not multiples of 4 are covered by a grid rounded up
//! to whole blocks; the blocks on the right and bottom edges then extend past the
//! logical image.

use crate::texture_format::TextureFormat;

/// Width and height of a compressed block, in pixels.
pub const BLOCK_DIM: usize = 4;

/// Bytes per pixel of an RGBA32 image.
pub const RGBA32_BYTES_PER_PIXEL: usize = 4;

/// The block grid for an image of `width` x `height` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGrid {
    /// Logical image width in pixels.
    pub width: usize,
    /// Logical image height in pixels.
    pub height: usize,
    /// Number of block columns, `ceil(width / 4)`.
    pub blocks_x: usize,
    /// Number of block rows, `ceil(height / 4)`.
    pub blocks_y: usize,
}

impl BlockGrid {
    /// Computes the grid covering an image of the given size.
    ///
    /// # Examples
    ///
    /// ```
    /// use dxt_frame_decoder_common::block_grid::BlockGrid;
    ///
    /// let grid = BlockGrid::new(6, 9);
    /// assert_eq!((grid.blocks_x, grid.blocks_y), (2, 3));
    /// ```
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            blocks_x: width.div_ceil(BLOCK_DIM),
            blocks_y: height.div_ceil(BLOCK_DIM),
        }
    }

    /// Total number of blocks in the grid.
    #[inline]
    pub const fn block_count(&self) -> usize {
        self.blocks_x * self.blocks_y
    }

    /// Bytes of compressed data needed for every block of the grid, given the size of one block.
    #[inline]
    pub const fn compressed_len(&self, block_size: usize) -> usize {
        self.block_count() * block_size
    }

    /// Bytes of compressed data for this grid in the given format.
    ///
    /// Equals `width * height * bpp / 8` when both dimensions are multiples of 4.
    #[inline]
    pub const fn compressed_len_for(&self, format: TextureFormat) -> usize {
        self.compressed_len(format.block_size())
    }

    /// Bytes per row of the RGBA32 image.
    #[inline]
    pub const fn rgba32_stride(&self) -> usize {
        self.width * RGBA32_BYTES_PER_PIXEL
    }

    /// Bytes of the whole RGBA32 image.
    #[inline]
    pub const fn rgba32_len(&self) -> usize {
        self.width * self.height * RGBA32_BYTES_PER_PIXEL
    }

    /// [`BlockGrid::rgba32_len`], or [`None`] if it overflows `usize`.
    #[inline]
    pub const fn checked_rgba32_len(&self) -> Option<usize> {
        match self.width.checked_mul(self.height) {
            Some(pixels) => pixels.checked_mul(RGBA32_BYTES_PER_PIXEL),
            None => None,
        }
    }

    /// [`BlockGrid::compressed_len`], or [`None`] if it overflows `usize`.
    #[inline]
    pub const fn checked_compressed_len(&self, block_size: usize) -> Option<usize> {
        match self.blocks_x.checked_mul(self.blocks_y) {
            Some(blocks) => blocks.checked_mul(block_size),
            None => None,
        }
    }

    /// Byte offset of the top left pixel of block `(bx, by)` in the RGBA32 image.
    #[inline]
    pub const fn rgba32_block_offset(&self, bx: usize, by: usize) -> usize {
        (by * BLOCK_DIM * self.width + bx * BLOCK_DIM) * RGBA32_BYTES_PER_PIXEL
    }

    /// Number of pixel columns and rows of block `(bx, by)` that fall inside the image.
    ///
    /// Both values are 4 except on the right and bottom edges of unaligned images.
    #[inline]
    pub fn visible_extent(&self, bx: usize, by: usize) -> (usize, usize) {
        let cols = self.width.saturating_sub(bx * BLOCK_DIM).min(BLOCK_DIM);
        let rows = self.height.saturating_sub(by * BLOCK_DIM).min(BLOCK_DIM);
        (cols, rows)
    }
}
