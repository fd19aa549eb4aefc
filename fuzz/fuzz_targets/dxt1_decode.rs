#![no_main]

// Checks the block decoder against a direct per-pixel evaluation of the DXT1 palette rules.

use dxt_frame_decoder_bc1::util::decode_color_block;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Dxt1Block {
    pub bytes: [u8; 8],
}

fuzz_target!(|block: Dxt1Block| {
    let mut decoded = [0u8; 64];
    decode_color_block(&block.bytes, &mut decoded, 16);

    let c0 = u16::from_le_bytes([block.bytes[0], block.bytes[1]]);
    let c1 = u16::from_le_bytes([block.bytes[2], block.bytes[3]]);
    let indices = u32::from_le_bytes([
        block.bytes[4],
        block.bytes[5],
        block.bytes[6],
        block.bytes[7],
    ]);
    let expand = |c: u16| {
        [
            (((c >> 11) & 0x1F) << 3) as u32,
            (((c >> 5) & 0x3F) << 2) as u32,
            ((c & 0x1F) << 3) as u32,
        ]
    };
    let (a, b) = (expand(c0), expand(c1));

    for (pixel, chunk) in decoded.chunks_exact(4).enumerate() {
        let index = (indices >> (pixel * 2)) & 0b11;
        let expected: [u32; 4] = match (index, c0 > c1) {
            (0, _) => [a[0], a[1], a[2], 255],
            (1, _) => [b[0], b[1], b[2], 255],
            (2, true) => [
                (2 * a[0] + b[0]) / 3,
                (2 * a[1] + b[1]) / 3,
                (2 * a[2] + b[2]) / 3,
                255,
            ],
            (3, true) => [
                (a[0] + 2 * b[0]) / 3,
                (a[1] + 2 * b[1]) / 3,
                (a[2] + 2 * b[2]) / 3,
                255,
            ],
            (2, false) => [(a[0] + b[0]) / 2, (a[1] + b[1]) / 2, (a[2] + b[2]) / 2, 255],
            _ => [0, 0, 0, 0],
        };
        let expected = expected.map(|v| v as u8);
        assert_eq!(chunk, expected, "pixel {pixel} of {:02X?}", block.bytes);
    }
});
