//! Builder for [`FrameDecoder`].

use crate::bitstream::BitstreamDecoder;
use crate::dispatch::{SequentialDispatcher, WorkDispatcher};
use crate::error::{FrameDecoderError, FrameDecoderResult};
use crate::frame_decoder::FrameDecoder;
use dxt_frame_decoder_bc3::Dxt5DecodeOrder;
use dxt_frame_decoder_common::block_grid::BlockGrid;
use dxt_frame_decoder_common::capability::ConversionPolicy;
use dxt_frame_decoder_common::texture_format::TextureFormat;

/// Builder for a [`FrameDecoder`].
///
/// `width`, `height` and `type_id` are required. The conversion policy defaults to
/// [`ConversionPolicy::detect`] and the DXT5 decode order to [`Dxt5DecodeOrder::ColorFirst`].
#[derive(Debug, Clone, Copy)]
pub struct FrameDecoderBuilder {
    width: Option<usize>,
    height: Option<usize>,
    type_id: Option<u32>,
    policy: Option<ConversionPolicy>,
    dxt5_decode_order: Option<Dxt5DecodeOrder>,
}

impl FrameDecoderBuilder {
    /// Create a new frame decoder builder.
    pub fn new() -> Self {
        Self {
            width: None,
            height: None,
            type_id: None,
            policy: None,
            dxt5_decode_order: None,
        }
    }

    /// Set the frame width in pixels.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the frame height in pixels.
    pub fn height(mut self, height: usize) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the stream type id. Its low nibble selects the texture format.
    pub fn type_id(mut self, type_id: u32) -> Self {
        self.type_id = Some(type_id);
        self
    }

    /// Override whether frames are converted to RGBA32.
    ///
    /// Mostly useful for tests and tools; players should keep the detected default.
    pub fn policy(mut self, policy: ConversionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set which half of each DXT5 block is decoded first. The output is the same either way.
    pub fn dxt5_decode_order(mut self, order: Dxt5DecodeOrder) -> Self {
        self.dxt5_decode_order = Some(order);
        self
    }

    /// Build a decoder that dispatches work sequentially on the calling thread.
    ///
    /// # Errors
    ///
    /// - [`FrameDecoderError::MissingParameter`] if `width`, `height` or `type_id` is unset.
    /// - [`FrameDecoderError::UnknownFormat`] if the `type_id` nibble names no format.
    /// - [`FrameDecoderError::FrameTooLarge`] if a frame buffer would not fit in `usize`.
    pub fn build<D: BitstreamDecoder>(self, bitstream: D) -> FrameDecoderResult<FrameDecoder<D>> {
        self.build_with_dispatcher(bitstream, SequentialDispatcher)
    }

    /// Build a decoder with a custom [`WorkDispatcher`].
    ///
    /// # Errors
    ///
    /// Same as [`FrameDecoderBuilder::build`].
    pub fn build_with_dispatcher<D: BitstreamDecoder, W: WorkDispatcher>(
        self,
        bitstream: D,
        dispatcher: W,
    ) -> FrameDecoderResult<FrameDecoder<D, W>> {
        let width = self
            .width
            .ok_or(FrameDecoderError::MissingParameter("width"))?;
        let height = self
            .height
            .ok_or(FrameDecoderError::MissingParameter("height"))?;
        let type_id = self
            .type_id
            .ok_or(FrameDecoderError::MissingParameter("type_id"))?;
        let format = TextureFormat::from_type_id(type_id)?;

        let grid = BlockGrid::new(width, height);
        let fits = grid.checked_rgba32_len().is_some()
            && grid.checked_compressed_len(format.block_size()).is_some();
        if !fits {
            return Err(FrameDecoderError::FrameTooLarge { width, height });
        }

        Ok(FrameDecoder::from_parts(
            grid,
            format,
            self.policy.unwrap_or_default(),
            self.dxt5_decode_order.unwrap_or_default(),
            bitstream,
            dispatcher,
        ))
    }
}

impl Default for FrameDecoderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
