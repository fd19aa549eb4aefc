//! DXT1 (BC1) colour block decoding.
//! <https://learn.microsoft.com/en-us/windows/win32/direct3d9/opaque-and-1-bit-alpha-textures>
//!
//! Endpoints are expanded by shifting rather than bit replication, and the interpolated
//! entries truncate. Output therefore differs slightly from a D3D10+ reference decoder.

use dxt_frame_decoder_common::bytes::ReadLittleEndian;
use dxt_frame_decoder_common::color_565::Color565;
use dxt_frame_decoder_common::color_8888::Color8888;

/// Size of a DXT1 colour block in bytes.
pub const COLOR_BLOCK_SIZE: usize = 8;

/// Bytes the destination of a single block decode must hold past its start,
/// given a row stride: three full rows plus the 4 pixels of the last row.
#[inline]
pub const fn block_footprint(stride: usize) -> usize {
    3 * stride + 16
}

/// A parsed 8-byte DXT1 colour block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlock {
    /// First endpoint.
    pub color0: Color565,
    /// Second endpoint.
    pub color1: Color565,
    /// Sixteen 2-bit palette indices; pixel `(x, y)` sits at bit `(y * 4 + x) * 2`.
    pub indices: u32,
}

impl ColorBlock {
    /// Parses a colour block from its 8 bytes.
    #[inline]
    pub const fn from_bytes(block: &[u8; COLOR_BLOCK_SIZE]) -> Self {
        let [c0_lo, c0_hi, c1_lo, c1_hi, i0, i1, i2, i3] = *block;
        Self {
            color0: Color565::from_raw(u16::from_le_bytes([c0_lo, c0_hi])),
            color1: Color565::from_raw(u16::from_le_bytes([c1_lo, c1_hi])),
            indices: u32::from_le_bytes([i0, i1, i2, i3]),
        }
    }

    /// Parses a colour block from the start of a slice.
    ///
    /// # Returns
    ///
    /// The block, else [`None`] if the slice is shorter than 8 bytes.
    #[inline]
    pub fn from_slice(src: &[u8]) -> Option<Self> {
        Some(Self {
            color0: Color565::from_raw(src.read_u16_le_at(0)?),
            color1: Color565::from_raw(src.read_u16_le_at(2)?),
            indices: src.read_u32_le_at(4)?,
        })
    }

    /// Builds the 4 entry palette for this block.
    ///
    /// If `color0 > color1` (packed comparison) entries 2 and 3 sit at 1/3 and 2/3 between the
    /// endpoints. Otherwise entry 2 is their average and entry 3 is transparent black.
    #[inline]
    pub fn palette(&self) -> [Color8888; 4] {
        let c0 = self.color0.to_color_8888();
        let c1 = self.color1.to_color_8888();

        if self.color0.greater_than(&self.color1) {
            [
                c0,
                c1,
                Color8888::new(third(c0.r, c1.r), third(c0.g, c1.g), third(c0.b, c1.b), 255),
                Color8888::new(third(c1.r, c0.r), third(c1.g, c0.g), third(c1.b, c0.b), 255),
            ]
        } else {
            [
                c0,
                c1,
                Color8888::new(half(c0.r, c1.r), half(c0.g, c1.g), half(c0.b, c1.b), 255),
                Color8888::TRANSPARENT_BLACK,
            ]
        }
    }

    /// Palette index of pixel `(x, y)`.
    #[inline(always)]
    pub const fn index_at(&self, x: usize, y: usize) -> usize {
        ((self.indices >> ((y * 4 + x) * 2)) & 0b11) as usize
    }

    /// Writes the 16 pixels of this block.
    ///
    /// With `WRITE_ALPHA` the full RGBA pixel is written, otherwise only the R, G and B bytes
    /// are touched and whatever alpha is already in `output` is preserved.
    #[inline(always)]
    fn write_pixels<const WRITE_ALPHA: bool>(&self, output: &mut [u8], stride: usize) {
        let palette = self.palette();
        let channels = if WRITE_ALPHA { 4 } else { 3 };

        for y in 0..4 {
            let row = &mut output[y * stride..y * stride + 16];
            for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                let colour = palette[self.index_at(x, y)].to_bytes();
                pixel[..channels].copy_from_slice(&colour[..channels]);
            }
        }
    }
}

// (2 * a + b) / 3, truncated.
#[inline(always)]
fn third(a: u8, b: u8) -> u8 {
    ((2 * a as u32 + b as u32) / 3) as u8
}

// (a + b) / 2, truncated.
#[inline(always)]
fn half(a: u8, b: u8) -> u8 {
    ((a as u32 + b as u32) / 2) as u8
}

/// Decodes a DXT1 colour block into RGBA8 pixels
///
/// Pixel `(x, y)` of the block is written as R, G, B, A at `output[y * stride + x * 4..][..4]`.
///
/// # Parameters
///
/// - `block`: The source DXT1 block (8 bytes)
/// - `output`: Destination starting at the top left pixel of the block
/// - `stride`: Number of bytes in a row of the destination image
///
/// # Panics
///
/// If `output` is shorter than [`block_footprint`]`(stride)` bytes.
///
/// # Example
///
/// ```
/// use dxt_frame_decoder_bc1::util::decode_color_block;
///
/// // Pure red and pure blue endpoints, every pixel using index 0.
/// let block = [0x00, 0xF8, 0x1F, 0x00, 0x00, 0x00, 0x00, 0x00];
/// let mut pixels = [0u8; 64]; // 4x4 block of RGBA pixels
///
/// decode_color_block(&block, &mut pixels, 16);
/// assert_eq!(&pixels[..4], &[248, 0, 0, 255]);
/// ```
#[inline]
pub fn decode_color_block(block: &[u8; COLOR_BLOCK_SIZE], output: &mut [u8], stride: usize) {
    ColorBlock::from_bytes(block).write_pixels::<true>(output, stride);
}

/// Decodes a DXT1 colour block, writing only the R, G and B bytes of each pixel.
///
/// Used for the colour half of DXT5 blocks, where alpha comes from the alpha block. Because the
/// two writes touch disjoint bytes, the colour and alpha halves can be decoded in either order.
///
/// # Panics
///
/// If `output` is shorter than [`block_footprint`]`(stride)` bytes.
#[inline]
pub fn decode_color_block_rgb(block: &[u8; COLOR_BLOCK_SIZE], output: &mut [u8], stride: usize) {
    ColorBlock::from_bytes(block).write_pixels::<false>(output, stride);
}

/// Safely wraps [`decode_color_block`] for use with unchecked slices
///
/// # Returns
///
/// `Some(())` once the block is decoded, else [`None`] if `src` is shorter than 8 bytes or
/// `output` cannot hold the block at the given stride. Nothing is written on failure.
#[inline]
pub fn decode_color_block_from_slice(src: &[u8], output: &mut [u8], stride: usize) -> Option<()> {
    let block = ColorBlock::from_slice(src)?;
    if stride < 16 || output.len() < block_footprint(stride) {
        return None;
    }
    block.write_pixels::<true>(output, stride);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn block_bytes(c0: u16, c1: u16, indices: u32) -> [u8; 8] {
        let mut block = [0u8; 8];
        block[0..2].copy_from_slice(&c0.to_le_bytes());
        block[2..4].copy_from_slice(&c1.to_le_bytes());
        block[4..8].copy_from_slice(&indices.to_le_bytes());
        block
    }

    fn decode(block: &[u8; 8]) -> [[u8; 4]; 16] {
        let mut pixels = [0u8; 64];
        decode_color_block(block, &mut pixels, 16);
        core::array::from_fn(|i| pixels[i * 4..i * 4 + 4].try_into().unwrap())
    }

    #[test]
    fn red_block_with_zero_indices_is_all_red() {
        // c0 = pure red, c1 = pure blue, all pixels use index 0.
        // Red saturates at 31 << 3 = 248 with shift expansion.
        let block = block_bytes(0xF800, 0x001F, 0);
        for pixel in decode(&block) {
            assert_eq!(pixel, [248, 0, 0, 255]);
        }
    }

    #[test]
    fn four_colour_ramp_truncates() {
        // c0 = (248, 252, 248), c1 = (0, 4, 8); c0 > c1.
        let block = ColorBlock::from_bytes(&block_bytes(0xFFFF, 0x0021, 0));
        let palette = block.palette();
        assert_eq!(palette[0], Color8888::new(248, 252, 248, 255));
        assert_eq!(palette[1], Color8888::new(0, 4, 8, 255));
        assert_eq!(palette[2], Color8888::new(165, 169, 168, 255));
        assert_eq!(palette[3], Color8888::new(82, 86, 88, 255));
    }

    #[test]
    fn three_colour_ramp_has_transparent_black() {
        // Equal endpoints select the three colour palette.
        let block = ColorBlock::from_bytes(&block_bytes(0x8410, 0x8410, 0));
        let palette = block.palette();
        assert_eq!(palette[2], Color8888::new(128, 128, 128, 255));
        assert_eq!(palette[3], Color8888::new(0, 0, 0, 0));

        // c0 < c1 as well.
        let block = ColorBlock::from_bytes(&block_bytes(0x001F, 0xF800, 0));
        let palette = block.palette();
        assert_eq!(palette[2], Color8888::new(124, 0, 124, 255));
        assert_eq!(palette[3], Color8888::TRANSPARENT_BLACK);
    }

    #[test]
    fn ramps_match_formulas_for_many_endpoints() {
        for c0 in (0..=u16::MAX).step_by(997) {
            for c1 in (0..=u16::MAX).step_by(1013) {
                let block = ColorBlock::from_bytes(&block_bytes(c0, c1, 0));
                let p = block.palette();
                let (a, b) = (p[0], p[1]);
                if c0 > c1 {
                    assert_eq!(p[2].r as u32, (2 * a.r as u32 + b.r as u32) / 3);
                    assert_eq!(p[2].g as u32, (2 * a.g as u32 + b.g as u32) / 3);
                    assert_eq!(p[3].b as u32, (a.b as u32 + 2 * b.b as u32) / 3);
                    assert_eq!(p[3].a, 255);
                } else {
                    assert_eq!(p[2].r as u32, (a.r as u32 + b.r as u32) / 2);
                    assert_eq!(p[3], Color8888::new(0, 0, 0, 0));
                }
            }
        }
    }

    #[rstest]
    #[case(0b00, [248, 0, 0, 255])]
    #[case(0b01, [0, 0, 248, 255])]
    #[case(0b10, [165, 0, 82, 255])]
    #[case(0b11, [82, 0, 165, 255])]
    fn indices_select_palette_entries(#[case] index: u32, #[case] expected: [u8; 4]) {
        // Same index replicated across all 16 pixels.
        let indices = (0..16).fold(0u32, |acc, i| acc | (index << (i * 2)));
        let block = block_bytes(0xF800, 0x001F, indices);
        for pixel in decode(&block) {
            assert_eq!(pixel, expected);
        }
    }

    #[test]
    fn index_bits_are_raster_order() {
        // Only pixel (1, 2) uses index 1.
        let indices = 1u32 << ((2 * 4 + 1) * 2);
        let pixels = decode(&block_bytes(0xF800, 0x001F, indices));
        for (i, pixel) in pixels.iter().enumerate() {
            if i == 9 {
                assert_eq!(*pixel, [0, 0, 248, 255]);
            } else {
                assert_eq!(*pixel, [248, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn respects_stride_and_leaves_gaps_untouched() {
        let block = block_bytes(0xF800, 0x001F, 0);
        let stride = 32;
        let mut output = [0xAAu8; 3 * 32 + 16];
        decode_color_block(&block, &mut output, stride);
        for y in 0..4 {
            assert_eq!(&output[y * stride..y * stride + 4], &[248, 0, 0, 255]);
            if y < 3 {
                assert!(output[y * stride + 16..(y + 1) * stride]
                    .iter()
                    .all(|&b| b == 0xAA));
            }
        }
    }

    #[test]
    fn rgb_decode_preserves_alpha() {
        let block = block_bytes(0x001F, 0xF800, 0xFFFF_FFFF); // every pixel is transparent black
        let mut output = [0x42u8; 64];
        decode_color_block_rgb(&block, &mut output, 16);
        for pixel in output.chunks_exact(4) {
            assert_eq!(pixel, &[0, 0, 0, 0x42]);
        }
    }

    #[test]
    fn decoding_is_deterministic() {
        let block = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        assert_eq!(decode(&block), decode(&block));
    }

    #[test]
    fn from_slice_rejects_short_input() {
        let mut output = [0u8; 64];
        assert!(decode_color_block_from_slice(&[0u8; 7], &mut output, 16).is_none());
        assert!(decode_color_block_from_slice(&[0u8; 8], &mut output[..63], 16).is_none());
        assert!(decode_color_block_from_slice(&[0u8; 8], &mut output, 16).is_some());
    }
}
