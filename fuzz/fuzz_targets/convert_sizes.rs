#![no_main]

// The frame converters must reject undersized buffers instead of panicking, and must never write
// past the logical image.

use dxt_frame_decoder_bc1::{convert_dxt1_to_rgba32, ConvertError};
use dxt_frame_decoder_bc3::convert_dxt5_to_rgba32;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct ConvertInput {
    pub width: u8,
    pub height: u8,
    pub dst_slack: i8,
    pub dxt5: bool,
    pub src: Vec<u8>,
}

fuzz_target!(|input: ConvertInput| {
    let (width, height) = (usize::from(input.width), usize::from(input.height));
    let exact = width * height * 4;
    let dst_len = exact.saturating_add_signed(isize::from(input.dst_slack));
    let mut dst = vec![0xCCu8; dst_len];

    let result = if input.dxt5 {
        convert_dxt5_to_rgba32(&input.src, &mut dst, width, height)
    } else {
        convert_dxt1_to_rgba32(&input.src, &mut dst, width, height)
    };

    match result {
        Ok(()) => {
            assert!(dst_len >= exact);
            assert!(dst[exact..].iter().all(|&b| b == 0xCC));
        }
        Err(ConvertError::DestinationTooSmall { required, actual }) => {
            assert_eq!((required, actual), (exact, dst_len));
            assert!(dst.iter().all(|&b| b == 0xCC));
        }
        Err(ConvertError::SourceTooSmall { actual, .. }) => {
            assert_eq!(actual, input.src.len());
            assert!(dst.iter().all(|&b| b == 0xCC));
        }
    }
});
