//! DXT5 (BC3) block decoding; MSDN
//! <https://learn.microsoft.com/en-us/windows/win32/direct3d10/d3d10-graphics-programming-guide-resources-block-compression#bc3>
//!
//! A DXT5 block is an 8-byte alpha block followed by an 8-byte DXT1 style colour block.
//! The alpha half only ever writes the alpha byte of a pixel and the colour half only ever
//! writes the R, G and B bytes, so either half can be decoded first.

use derive_enum_all_values::AllValues;
use dxt_frame_decoder_bc1::util::{block_footprint, decode_color_block_rgb, COLOR_BLOCK_SIZE};
use dxt_frame_decoder_common::bytes::ReadLittleEndian;

/// Size of a DXT5 alpha block in bytes.
pub const ALPHA_BLOCK_SIZE: usize = 8;

/// Size of a full DXT5 block (alpha + colour) in bytes.
pub const DXT5_BLOCK_SIZE: usize = ALPHA_BLOCK_SIZE + COLOR_BLOCK_SIZE;

/// A parsed 8-byte DXT5 alpha block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaBlock {
    /// First alpha endpoint.
    pub alpha0: u8,
    /// Second alpha endpoint.
    pub alpha1: u8,
    /// Sixteen 3-bit palette indices in the low 48 bits.
    ///
    /// Pixel `(x, y)` sits at bit `(y * 4 + x) * 3`.
    pub indices: u64,
}

impl AlphaBlock {
    /// Parses an alpha block from its 8 bytes.
    #[inline]
    pub const fn from_bytes(block: &[u8; ALPHA_BLOCK_SIZE]) -> Self {
        let [alpha0, alpha1, i0, i1, i2, i3, i4, i5] = *block;
        Self {
            alpha0,
            alpha1,
            indices: u64::from_le_bytes([i0, i1, i2, i3, i4, i5, 0, 0]),
        }
    }

    /// Parses an alpha block from the start of a slice.
    ///
    /// # Returns
    ///
    /// The block, else [`None`] if the slice is shorter than 8 bytes.
    #[inline]
    pub fn from_slice(src: &[u8]) -> Option<Self> {
        Some(Self {
            alpha0: *src.first()?,
            alpha1: *src.get(1)?,
            indices: src.read_u48_le_at(2)?,
        })
    }

    /// Builds the 8 entry alpha palette for this block.
    ///
    /// If `alpha0 > alpha1`, entries 2 to 7 are six evenly spaced steps between the endpoints.
    /// Otherwise entries 2 to 5 are four steps between them, and entries 6 and 7 are fixed
    /// at 0 and 255.
    #[inline]
    pub const fn palette(&self) -> [u8; 8] {
        let a0 = self.alpha0 as u32;
        let a1 = self.alpha1 as u32;

        let mut palette = [self.alpha0, self.alpha1, 0, 0, 0, 0, 0, 0];
        if self.alpha0 > self.alpha1 {
            let mut i = 2;
            while i < 8 {
                palette[i] = (((8 - i as u32) * a0 + (i as u32 - 1) * a1) / 7) as u8;
                i += 1;
            }
        } else {
            let mut i = 2;
            while i < 6 {
                palette[i] = (((6 - i as u32) * a0 + (i as u32 - 1) * a1) / 5) as u8;
                i += 1;
            }
            palette[6] = 0;
            palette[7] = 255;
        }
        palette
    }

    /// Palette index of pixel `(x, y)`.
    #[inline(always)]
    pub const fn index_at(&self, x: usize, y: usize) -> usize {
        ((self.indices >> ((y * 4 + x) * 3)) & 0b111) as usize
    }

    #[inline(always)]
    fn write_alpha(&self, output: &mut [u8], stride: usize) {
        let palette = self.palette();
        for y in 0..4 {
            let row = &mut output[y * stride..y * stride + 16];
            for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                pixel[3] = palette[self.index_at(x, y)];
            }
        }
    }
}

/// Decodes a DXT5 alpha block, writing only the alpha byte of each pixel
///
/// The alpha of pixel `(x, y)` is written to `output[y * stride + x * 4 + 3]`. The R, G and B
/// bytes of the destination are left untouched.
///
/// # Parameters
///
/// - `block`: The source alpha block (8 bytes)
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
/// use dxt_frame_decoder_bc3::util::decode_alpha_block;
///
/// // alpha0 = 255, alpha1 = 0, every pixel using index 1.
/// let block = [255, 0, 0b0100_1001, 0b1001_0010, 0b0010_0100, 0b0100_1001, 0b1001_0010, 0b0010_0100];
/// let mut pixels = [0xAAu8; 64];
///
/// decode_alpha_block(&block, &mut pixels, 16);
/// assert_eq!(&pixels[..4], &[0xAA, 0xAA, 0xAA, 0]);
/// ```
#[inline]
pub fn decode_alpha_block(block: &[u8; ALPHA_BLOCK_SIZE], output: &mut [u8], stride: usize) {
    AlphaBlock::from_bytes(block).write_alpha(output, stride);
}

/// Safely wraps [`decode_alpha_block`] for use with unchecked slices
///
/// # Returns
///
/// `Some(())` once the block is decoded, else [`None`] if `src` is shorter than 8 bytes or
/// `output` cannot hold the block at the given stride. Nothing is written on failure.
#[inline]
pub fn decode_alpha_block_from_slice(src: &[u8], output: &mut [u8], stride: usize) -> Option<()> {
    let block = AlphaBlock::from_slice(src)?;
    if stride < 16 || output.len() < block_footprint(stride) {
        return None;
    }
    block.write_alpha(output, stride);
    Some(())
}

/// Which half of a DXT5 block is decoded first.
///
/// Both orders produce identical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, AllValues)]
pub enum Dxt5DecodeOrder {
    /// Colour block, then alpha block.
    #[default]
    ColorFirst,
    /// Alpha block, then colour block.
    AlphaFirst,
}

/// Decodes a full 16-byte DXT5 block into RGBA8 pixels.
///
/// Bytes 0 to 7 of `block` are the alpha block and bytes 8 to 15 the colour block. The colour
/// block is decoded with the DXT1 palette rules, but only its R, G and B values are written.
///
/// # Panics
///
/// If `output` is shorter than [`block_footprint`]`(stride)` bytes.
///
/// # Example
///
/// ```
/// use dxt_frame_decoder_bc3::util::{decode_dxt5_block, Dxt5DecodeOrder};
///
/// let mut block = [0u8; 16];
/// block[0] = 128; // alpha0, all alpha indices 0
/// block[9] = 0xF8; // color0 = pure red, all colour indices 0
/// let mut pixels = [0u8; 64];
///
/// decode_dxt5_block(&block, &mut pixels, 16, Dxt5DecodeOrder::ColorFirst);
/// assert_eq!(&pixels[..4], &[248, 0, 0, 128]);
/// ```
#[inline]
pub fn decode_dxt5_block(
    block: &[u8; DXT5_BLOCK_SIZE],
    output: &mut [u8],
    stride: usize,
    order: Dxt5DecodeOrder,
) {
    let alpha: [u8; ALPHA_BLOCK_SIZE] = core::array::from_fn(|i| block[i]);
    let colour: [u8; COLOR_BLOCK_SIZE] = core::array::from_fn(|i| block[ALPHA_BLOCK_SIZE + i]);

    match order {
        Dxt5DecodeOrder::ColorFirst => {
            decode_color_block_rgb(&colour, output, stride);
            decode_alpha_block(&alpha, output, stride);
        }
        Dxt5DecodeOrder::AlphaFirst => {
            decode_alpha_block(&alpha, output, stride);
            decode_color_block_rgb(&colour, output, stride);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Packs 16 3-bit indices and two endpoints into an alpha block.
    fn alpha_block_bytes(alpha0: u8, alpha1: u8, indices: [u8; 16]) -> [u8; 8] {
        let mut packed = 0u64;
        for (i, &index) in indices.iter().enumerate() {
            packed |= (index as u64 & 0b111) << (i * 3);
        }
        let [b0, b1, b2, b3, b4, b5, ..] = packed.to_le_bytes();
        [alpha0, alpha1, b0, b1, b2, b3, b4, b5]
    }

    fn decode_alphas(block: &[u8; 8]) -> [u8; 16] {
        let mut pixels = [0x55u8; 64];
        decode_alpha_block(block, &mut pixels, 16);
        core::array::from_fn(|i| pixels[i * 4 + 3])
    }

    #[test]
    fn index_one_selects_second_endpoint() {
        let block = alpha_block_bytes(255, 0, [1; 16]);
        assert_eq!(decode_alphas(&block), [0; 16]);
    }

    #[test]
    fn only_alpha_bytes_are_written() {
        let block = alpha_block_bytes(200, 10, [3; 16]);
        let mut pixels = [0x55u8; 64];
        decode_alpha_block(&block, &mut pixels, 16);

        for pixel in pixels.chunks_exact(4) {
            assert_eq!(&pixel[..3], &[0x55, 0x55, 0x55]);
        }
    }

    #[rstest]
    #[case(2, 218)] // (6 * 255) / 7
    #[case(3, 182)] // (5 * 255) / 7
    #[case(4, 145)] // (4 * 255) / 7
    #[case(5, 109)] // (3 * 255) / 7
    #[case(6, 72)] // (2 * 255) / 7
    #[case(7, 36)] // 255 / 7
    fn six_step_ramp_when_alpha0_greater(#[case] index: u8, #[case] expected: u8) {
        let block = alpha_block_bytes(255, 0, [index; 16]);
        assert_eq!(decode_alphas(&block), [expected; 16]);
    }

    #[rstest]
    #[case(2, 51)] // 255 / 5
    #[case(3, 102)] // (2 * 255) / 5
    #[case(4, 153)] // (3 * 255) / 5
    #[case(5, 204)] // (4 * 255) / 5
    #[case(6, 0)]
    #[case(7, 255)]
    fn four_step_ramp_with_sentinels_otherwise(#[case] index: u8, #[case] expected: u8) {
        let block = alpha_block_bytes(0, 255, [index; 16]);
        assert_eq!(decode_alphas(&block), [expected; 16]);
    }

    #[test]
    fn palette_formulas_hold_for_all_endpoint_pairs() {
        for a0 in 0..=255u32 {
            for a1 in (0..=255u32).step_by(3) {
                let block = AlphaBlock {
                    alpha0: a0 as u8,
                    alpha1: a1 as u8,
                    indices: 0,
                };
                let palette = block.palette();
                assert_eq!(palette[0], a0 as u8);
                assert_eq!(palette[1], a1 as u8);

                if a0 > a1 {
                    for i in 2..8u32 {
                        let expected = ((8 - i) * a0 + (i - 1) * a1) / 7;
                        assert_eq!(palette[i as usize] as u32, expected);
                    }
                } else {
                    for i in 2..6u32 {
                        let expected = ((6 - i) * a0 + (i - 1) * a1) / 5;
                        assert_eq!(palette[i as usize] as u32, expected);
                    }
                    assert_eq!(palette[6], 0);
                    assert_eq!(palette[7], 255);
                }
            }
        }
    }

    #[test]
    fn equal_endpoints_use_four_step_mode() {
        let block = alpha_block_bytes(100, 100, core::array::from_fn(|i| (i % 8) as u8));
        let alphas = decode_alphas(&block);
        let expected: [u8; 8] = [100, 100, 100, 100, 100, 100, 0, 255];
        assert_eq!(alphas[..8], expected);
        assert_eq!(alphas[8..], expected);
    }

    #[test]
    fn indices_are_read_in_raster_order() {
        let indices: [u8; 16] = core::array::from_fn(|i| (i % 8) as u8);
        let block = alpha_block_bytes(0, 255, indices);
        let palette = AlphaBlock::from_bytes(&block).palette();

        let alphas = decode_alphas(&block);
        for (i, &alpha) in alphas.iter().enumerate() {
            assert_eq!(alpha, palette[i % 8], "pixel {i}");
        }
    }

    #[test]
    fn from_slice_matches_from_bytes() {
        let block = alpha_block_bytes(7, 99, core::array::from_fn(|i| (i * 5 % 8) as u8));
        assert_eq!(
            AlphaBlock::from_slice(&block),
            Some(AlphaBlock::from_bytes(&block))
        );
        assert_eq!(AlphaBlock::from_slice(&block[..7]), None);
    }

    #[test]
    fn from_slice_decode_rejects_short_buffers() {
        let block = alpha_block_bytes(255, 0, [0; 16]);
        let mut output = [0u8; 63];
        assert_eq!(decode_alpha_block_from_slice(&block, &mut output, 16), None);
        assert!(output.iter().all(|&b| b == 0));

        let mut output = [0u8; 64];
        assert_eq!(
            decode_alpha_block_from_slice(&block[..4], &mut output, 16),
            None
        );
        assert_eq!(
            decode_alpha_block_from_slice(&block, &mut output, 16),
            Some(())
        );
        assert_eq!(output[3], 255);
    }

    #[test]
    fn decode_order_does_not_change_output() {
        // Cheap xorshift so the sweep covers both palette modes of both halves.
        let mut state = 0x2545_F491_4F6C_DD1Du64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        for _ in 0..4096 {
            let mut block = [0u8; 16];
            block[..8].copy_from_slice(&next().to_le_bytes());
            block[8..].copy_from_slice(&next().to_le_bytes());

            let mut colour_first = [0x33u8; 64];
            let mut alpha_first = [0x77u8; 64];
            decode_dxt5_block(&block, &mut colour_first, 16, Dxt5DecodeOrder::ColorFirst);
            decode_dxt5_block(&block, &mut alpha_first, 16, Dxt5DecodeOrder::AlphaFirst);

            assert_eq!(colour_first, alpha_first, "block {block:02X?}");
        }
    }

    #[test]
    fn transparent_colour_entry_does_not_override_alpha() {
        // c0 <= c1 with index 3 would be transparent black in DXT1; here only RGB comes from it.
        let mut block = [0u8; 16];
        block[..8].copy_from_slice(&alpha_block_bytes(200, 0, [0; 16]));
        block[8..10].copy_from_slice(&0x001Fu16.to_le_bytes());
        block[10..12].copy_from_slice(&0xF800u16.to_le_bytes());
        block[12..16].copy_from_slice(&u32::MAX.to_le_bytes());

        for &order in Dxt5DecodeOrder::all_values() {
            let mut pixels = [0u8; 64];
            decode_dxt5_block(&block, &mut pixels, 16, order);
            let expected = [0, 0, 0, 200];
            assert!(pixels.chunks_exact(4).all(|p| p == expected), "{order:?}");
        }
    }
}
