#![no_main]

// Arbitrary frames and decoder parameters must produce errors, never panics.

use dxt_frame_decoder_api::{
    ConversionPolicy, Dxt5DecodeOrder, FrameDecoderBuilder, RawBlockSource, TextureFormat,
};
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct DecoderInput {
    pub width: u8,
    pub height: u8,
    pub type_id: u32,
    pub source_type_id: u32,
    pub convert: bool,
    pub alpha_first: bool,
    pub frames: Vec<Vec<u8>>,
}

fuzz_target!(|input: DecoderInput| {
    let Ok(source_format) = TextureFormat::from_type_id(input.source_type_id) else {
        return;
    };
    let policy = if input.convert {
        ConversionPolicy::SoftwareRgba32
    } else {
        ConversionPolicy::Native
    };
    let order = if input.alpha_first {
        Dxt5DecodeOrder::AlphaFirst
    } else {
        Dxt5DecodeOrder::ColorFirst
    };

    let Ok(decoder) = FrameDecoderBuilder::new()
        .width(usize::from(input.width))
        .height(usize::from(input.height))
        .type_id(input.type_id)
        .policy(policy)
        .dxt5_decode_order(order)
        .build(RawBlockSource::new(source_format))
    else {
        return;
    };

    for frame in input.frames.iter().take(8) {
        let _ = decoder.decode_frame(frame);
        let buffer = decoder.lock_buffer().unwrap();
        assert_eq!(buffer.len(), decoder.buffer_size());
        decoder.unlock_buffer(buffer).unwrap();
    }
});
