//! The frame decoder: one output buffer, one lock, one bitstream decoder.

use crate::bitstream::BitstreamDecoder;
use crate::dispatch::{SequentialDispatcher, WorkDispatcher};
use crate::error::{FrameDecoderError, FrameDecoderResult};
use crate::frame_decoder_builder::FrameDecoderBuilder;
use crate::lock::BufferLock;
use core::cell::UnsafeCell;
use dxt_frame_decoder_bc1::convert_dxt1_to_rgba32;
use dxt_frame_decoder_bc3::{Dxt5DecodeOrder, convert_dxt5_to_rgba32_with_order};
use dxt_frame_decoder_common::block_grid::BlockGrid;
use dxt_frame_decoder_common::capability::{ConversionPolicy, UploadFormat};
use dxt_frame_decoder_common::texture_format::TextureFormat;
use tracing::{debug, debug_span, warn};

struct FrameBuffers {
    /// The buffer handed to consumers.
    output: Vec<u8>,
    /// Raw blocks from the bitstream decoder, present only when converting to RGBA32.
    scratch: Option<Vec<u8>>,
}

/// Decodes video frames into a single output buffer shared with a consumer.
///
/// Each call to [`FrameDecoder::decode_frame`] runs the bitstream decoder and, if the
/// [`ConversionPolicy`] requires it, converts the resulting DXT blocks to RGBA32. Consumers read
/// the result through [`FrameDecoder::lock_buffer`] / [`FrameDecoder::unlock_buffer`] or
/// [`FrameDecoder::with_buffer`]. Decoding and reading contend for the same per-decoder lock,
/// so a consumer never observes a half written frame. Separate decoders share nothing.
///
/// All calls block the calling thread; nothing is decoded in the background.
///
/// # Example
///
/// ```
/// use dxt_frame_decoder_api::{FrameDecoderBuilder, RawBlockSource};
/// use dxt_frame_decoder_common::capability::ConversionPolicy;
/// use dxt_frame_decoder_common::texture_format::TextureFormat;
///
/// let decoder = FrameDecoderBuilder::new()
///     .width(4)
///     .height(4)
///     .type_id(0xb) // DXT1
///     .policy(ConversionPolicy::SoftwareRgba32)
///     .build(RawBlockSource::new(TextureFormat::Dxt1))?;
///
/// // One red DXT1 block.
/// decoder.decode_frame(&[0x00, 0xF8, 0x1F, 0x00, 0x00, 0x00, 0x00, 0x00])?;
///
/// let buffer = decoder.lock_buffer()?;
/// assert_eq!(&buffer.as_slice()[..4], &[248, 0, 0, 255]);
/// decoder.unlock_buffer(buffer)?;
/// # Ok::<(), dxt_frame_decoder_api::FrameDecoderError>(())
/// ```
pub struct FrameDecoder<D, W = SequentialDispatcher> {
    grid: BlockGrid,
    format: TextureFormat,
    policy: ConversionPolicy,
    order: Dxt5DecodeOrder,
    bitstream: D,
    dispatcher: W,
    output_len: usize,
    lock: BufferLock,
    buffers: UnsafeCell<FrameBuffers>,
}

// SAFETY: `buffers` is only written while `lock` is held by `decode_frame`, and only read
// while `lock` is held by a reader, so no reference into it is ever shared with a writer.
unsafe impl<D: Sync, W: Sync> Sync for FrameDecoder<D, W> {}

impl<D: BitstreamDecoder> FrameDecoder<D> {
    /// Creates a decoder for `width` x `height` frames of the format named by `type_id`,
    /// using the compile target's [`ConversionPolicy`].
    ///
    /// # Errors
    ///
    /// [`FrameDecoderError::UnknownFormat`] if the low nibble of `type_id` names no format.
    pub fn new(
        width: usize,
        height: usize,
        type_id: u32,
        bitstream: D,
    ) -> FrameDecoderResult<Self> {
        FrameDecoderBuilder::new()
            .width(width)
            .height(height)
            .type_id(type_id)
            .build(bitstream)
    }
}

impl<D: BitstreamDecoder, W: WorkDispatcher> FrameDecoder<D, W> {
    pub(crate) fn from_parts(
        grid: BlockGrid,
        format: TextureFormat,
        policy: ConversionPolicy,
        order: Dxt5DecodeOrder,
        bitstream: D,
        dispatcher: W,
    ) -> Self {
        let native_len = grid.compressed_len_for(format);
        let buffers = if policy.should_convert() {
            FrameBuffers {
                output: vec![0; ConversionPolicy::rgba32_buffer_size(grid.width, grid.height)],
                scratch: Some(vec![0; native_len]),
            }
        } else {
            FrameBuffers {
                output: vec![0; native_len],
                scratch: None,
            }
        };
        let output_len = buffers.output.len();

        debug!(
            width = grid.width,
            height = grid.height,
            ?format,
            ?policy,
            output_len,
            scratch_len = buffers.scratch.as_ref().map_or(0, Vec::len),
            "created frame decoder"
        );
        if policy.should_convert() && !has_converter(format) {
            warn!(?format, "no RGBA32 converter, every decode will fail");
        }

        Self {
            grid,
            format,
            policy,
            order,
            bitstream,
            dispatcher,
            output_len,
            lock: BufferLock::new(),
            buffers: UnsafeCell::new(buffers),
        }
    }

    /// Decodes one compressed frame into the output buffer.
    ///
    /// Holds the buffer lock for the whole call, blocking until any reader has released it.
    /// The lock is released on every exit path.
    ///
    /// # Errors
    ///
    /// - [`FrameDecoderError::Bitstream`] if the bitstream decoder fails. The output buffer keeps
    ///   the previous frame, and when not converting it may hold part of the failed one.
    /// - [`FrameDecoderError::FormatMismatch`] if the bitstream reports another block layout.
    /// - [`FrameDecoderError::UnsupportedConversion`] if converting a format other than DXT1/DXT5.
    /// - [`FrameDecoderError::Convert`] if the buffers do not fit the frame.
    /// - [`FrameDecoderError::WouldDeadlock`] if this thread holds the buffer lock. An explicit
    ///   lock counts as held by the thread that called [`FrameDecoder::lock_buffer`], even after
    ///   its [`LockedBuffer`] was sent to another thread.
    pub fn decode_frame(&self, input: &[u8]) -> FrameDecoderResult<()> {
        let _guard = self.lock.lock_scoped()?;
        let span = debug_span!(
            "decode_frame",
            width = self.grid.width,
            height = self.grid.height,
            format = ?self.format,
            input_len = input.len()
        );
        let _enter = span.enter();

        // SAFETY: the lock is held, so no reader holds a reference into the buffers.
        let FrameBuffers { output, scratch } = unsafe { &mut *self.buffers.get() };
        let destination = match scratch.as_deref_mut() {
            Some(scratch) => scratch,
            None => output.as_mut_slice(),
        };

        let detected = self
            .bitstream
            .decode(input, destination, &self.dispatcher)
            .map_err(|e| {
                warn!(error = %e, "bitstream decode failed");
                FrameDecoderError::Bitstream(Box::new(e))
            })?;

        if !detected.same_layout(self.format) {
            warn!(?detected, expected = ?self.format, "format mismatch");
            return Err(FrameDecoderError::FormatMismatch {
                expected: self.format,
                detected,
            });
        }

        let Some(scratch) = scratch.as_deref() else {
            return Ok(());
        };

        let (width, height) = (self.grid.width, self.grid.height);
        let converted = match self.format {
            TextureFormat::Dxt1 => convert_dxt1_to_rgba32(scratch, output, width, height),
            TextureFormat::Dxt5 | TextureFormat::Dxt5YCoCg => {
                convert_dxt5_to_rgba32_with_order(scratch, output, width, height, self.order)
            }
            other => {
                warn!(format = ?other, "rejected conversion");
                return Err(FrameDecoderError::UnsupportedConversion(other));
            }
        };
        converted.map_err(|e| {
            warn!(error = %e, "frame conversion failed");
            FrameDecoderError::from(e)
        })
    }

    /// Locks the output buffer for reading until [`FrameDecoder::unlock_buffer`] is called.
    ///
    /// Blocks while a frame is being decoded or another reader holds the lock. There is no
    /// automatic release: dropping the returned [`LockedBuffer`] without unlocking leaves the
    /// buffer locked, and every later decode or lock on other threads waits forever.
    ///
    /// The lock belongs to the calling thread. The returned handle may be sent to another thread
    /// and unlocked there, but until then this thread cannot decode or lock again: such calls
    /// fail with [`FrameDecoderError::WouldDeadlock`] instead of waiting for the other thread.
    ///
    /// # Errors
    ///
    /// [`FrameDecoderError::WouldDeadlock`] if this thread already holds the buffer lock.
    pub fn lock_buffer(&self) -> FrameDecoderResult<LockedBuffer<'_>> {
        let generation = self.lock.lock_explicit()?;

        // SAFETY: the lock is held until `unlock_buffer` consumes the returned handle.
        let buffers = unsafe { &*self.buffers.get() };
        Ok(LockedBuffer {
            lock: &self.lock,
            data: buffers.output.as_slice(),
            generation,
        })
    }

    /// Releases a lock taken with [`FrameDecoder::lock_buffer`].
    ///
    /// # Errors
    ///
    /// - [`FrameDecoderError::ForeignLock`] if `buffer` was locked on another decoder.
    /// - [`FrameDecoderError::NotLocked`] if the lock `buffer` was taken with was already released
    ///   through [`FrameDecoder::unlock_buffer_unchecked`]. A lock taken since then is kept.
    pub fn unlock_buffer(&self, buffer: LockedBuffer<'_>) -> FrameDecoderResult<()> {
        if !core::ptr::eq(buffer.lock, &self.lock) {
            return Err(FrameDecoderError::ForeignLock);
        }
        self.lock.unlock_explicit(Some(buffer.generation))
    }

    /// Releases a lock taken with [`FrameDecoder::lock_buffer`] without its handle.
    ///
    /// # Errors
    ///
    /// [`FrameDecoderError::NotLocked`] if the buffer is not explicitly locked.
    ///
    /// # Safety
    ///
    /// No data obtained from the [`LockedBuffer`] of the released lock may be read afterwards,
    /// as the next [`FrameDecoder::decode_frame`] overwrites it.
    pub unsafe fn unlock_buffer_unchecked(&self) -> FrameDecoderResult<()> {
        self.lock.unlock_explicit(None)
    }

    /// Runs `f` with the output buffer locked, releasing the lock afterwards.
    ///
    /// # Errors
    ///
    /// [`FrameDecoderError::WouldDeadlock`] if this thread already holds the buffer lock.
    pub fn with_buffer<R>(&self, f: impl FnOnce(&[u8]) -> R) -> FrameDecoderResult<R> {
        let _guard = self.lock.lock_scoped()?;
        // SAFETY: the lock is held for the lifetime of the borrow.
        let buffers = unsafe { &*self.buffers.get() };
        Ok(f(&buffers.output))
    }

    /// Size of the output buffer in bytes.
    ///
    /// `width * height * 4` when converting. Otherwise the compressed frame size, which counts
    /// whole 4x4 blocks: `ceil(width / 4) * ceil(height / 4) * block_size`. For dimensions that
    /// are not multiples of 4 this exceeds `width * height * bits_per_pixel / 8`; a 6x5 DXT1
    /// frame takes 32 bytes, not 15.
    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.output_len
    }

    /// Size of one frame of raw blocks in bytes, the length the bitstream decoder writes.
    #[inline]
    pub fn compressed_frame_size(&self) -> usize {
        self.grid.compressed_len_for(self.format)
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height
    }

    /// The texture format of decoded frames.
    #[inline]
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Whether frames are handed out compressed or converted.
    #[inline]
    pub fn policy(&self) -> ConversionPolicy {
        self.policy
    }

    /// The layout of the output buffer.
    #[inline]
    pub fn upload_format(&self) -> UploadFormat {
        self.policy.upload_format(self.format)
    }

    /// The bitstream decoder frames are decoded with.
    #[inline]
    pub fn bitstream(&self) -> &D {
        &self.bitstream
    }
}

/// Whether there is a software RGBA32 converter for `format`.
pub const fn has_converter(format: TextureFormat) -> bool {
    matches!(
        format,
        TextureFormat::Dxt1 | TextureFormat::Dxt5 | TextureFormat::Dxt5YCoCg
    )
}

/// The output buffer of a [`FrameDecoder`], locked for reading.
///
/// Hand it back to [`FrameDecoder::unlock_buffer`] when done. Dropping it does not unlock.
#[must_use = "the buffer stays locked until passed to FrameDecoder::unlock_buffer"]
#[derive(Debug)]
pub struct LockedBuffer<'a> {
    lock: &'a BufferLock,
    data: &'a [u8],
    generation: u64,
}

impl LockedBuffer<'_> {
    /// The contents of the output buffer.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.data
    }

    /// Pointer to the start of the output buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Length of the output buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the output buffer is empty (a zero sized frame).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
