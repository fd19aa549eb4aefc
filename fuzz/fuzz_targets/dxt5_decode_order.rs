#![no_main]

// Decoding the colour and alpha halves of a DXT5 block in either order must give the same pixels.

use dxt_frame_decoder_bc1::util::decode_color_block;
use dxt_frame_decoder_bc3::util::{decode_dxt5_block, AlphaBlock, Dxt5DecodeOrder};
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Dxt5Block {
    pub bytes: [u8; 16],
    pub stride_pad: u8,
}

fuzz_target!(|block: Dxt5Block| {
    let stride = 16 + usize::from(block.stride_pad % 8) * 4;
    let mut color_first = vec![0x5Au8; 3 * stride + 16];
    let mut alpha_first = vec![0xA5u8; 3 * stride + 16];

    decode_dxt5_block(
        &block.bytes,
        &mut color_first,
        stride,
        Dxt5DecodeOrder::ColorFirst,
    );
    decode_dxt5_block(
        &block.bytes,
        &mut alpha_first,
        stride,
        Dxt5DecodeOrder::AlphaFirst,
    );

    let mut colour = [0u8; 64];
    let colour_bytes: [u8; 8] = block.bytes[8..].try_into().unwrap();
    decode_color_block(&colour_bytes, &mut colour, 16);
    let alpha_bytes: [u8; 8] = block.bytes[..8].try_into().unwrap();
    let alpha = AlphaBlock::from_bytes(&alpha_bytes);
    let palette = alpha.palette();

    for y in 0..4 {
        let row = y * stride;
        assert_eq!(
            color_first[row..row + 16],
            alpha_first[row..row + 16],
            "row {y} of {:02X?}",
            block.bytes
        );
        for x in 0..4 {
            let pixel = &color_first[row + x * 4..row + x * 4 + 4];
            assert_eq!(pixel[..3], colour[y * 16 + x * 4..y * 16 + x * 4 + 3]);
            assert_eq!(pixel[3], palette[alpha.index_at(x, y)]);
        }
    }
});
