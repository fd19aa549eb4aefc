//! Cross-thread behaviour of the per-decoder buffer lock.

use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use dxt_frame_decoder_api::{
    BitstreamDecoder, ConversionPolicy, FrameDecoder, FrameDecoderBuilder, FrameDecoderError,
    RawBlockSource, TextureFormat, WorkDispatcher,
};

const RED_DXT1: [u8; 8] = [0x00, 0xF8, 0x1F, 0x00, 0x00, 0x00, 0x00, 0x00];
const BLUE_DXT1: [u8; 8] = [0x1F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

fn converting_dxt1<D: BitstreamDecoder>(bitstream: D) -> FrameDecoder<D> {
    FrameDecoderBuilder::new()
        .width(4)
        .height(4)
        .type_id(0xb)
        .policy(ConversionPolicy::SoftwareRgba32)
        .build(bitstream)
        .unwrap()
}

/// A pass-through source that parks inside `decode` until released.
struct GatedSource {
    inner: RawBlockSource,
    entered: Barrier,
    release: Barrier,
}

impl GatedSource {
    fn new() -> Self {
        Self {
            inner: RawBlockSource::new(TextureFormat::Dxt1),
            entered: Barrier::new(2),
            release: Barrier::new(2),
        }
    }
}

impl BitstreamDecoder for GatedSource {
    type Error = <RawBlockSource as BitstreamDecoder>::Error;

    fn decode(
        &self,
        input: &[u8],
        output: &mut [u8],
        dispatcher: &dyn WorkDispatcher,
    ) -> Result<TextureFormat, Self::Error> {
        self.entered.wait();
        self.release.wait();
        self.inner.decode(input, output, dispatcher)
    }
}

#[test]
fn held_lock_blocks_decode_until_unlocked() {
    let decoder = converting_dxt1(RawBlockSource::new(TextureFormat::Dxt1));
    decoder.decode_frame(&RED_DXT1).unwrap();

    let decoded = AtomicBool::new(false);
    let buffer = decoder.lock_buffer().unwrap();

    thread::scope(|s| {
        s.spawn(|| {
            decoder.decode_frame(&BLUE_DXT1).unwrap();
            decoded.store(true, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!decoded.load(Ordering::SeqCst));
        // Still the frame that was decoded before locking.
        assert_eq!(&buffer.as_slice()[..4], &[248, 0, 0, 255]);

        decoder.unlock_buffer(buffer).unwrap();
    });

    assert!(decoded.load(Ordering::SeqCst));
    decoder
        .with_buffer(|pixels| assert_eq!(&pixels[..4], &[0, 0, 248, 255]))
        .unwrap();
}

#[test]
fn in_flight_decode_blocks_lock_until_finished() {
    let decoder = converting_dxt1(GatedSource::new());
    let locked = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| decoder.decode_frame(&RED_DXT1).unwrap());
        decoder.bitstream().entered.wait();

        s.spawn(|| {
            let buffer = decoder.lock_buffer().unwrap();
            locked.store(true, Ordering::SeqCst);
            // The whole frame is visible once the lock is granted.
            let pixels = buffer.as_slice();
            assert!(pixels.chunks_exact(4).all(|p| p == [248, 0, 0, 255]));
            decoder.unlock_buffer(buffer).unwrap();
        });

        thread::sleep(Duration::from_millis(100));
        assert!(!locked.load(Ordering::SeqCst));
        decoder.bitstream().release.wait();
    });

    assert!(locked.load(Ordering::SeqCst));
}

#[test]
fn separate_decoders_do_not_block_each_other() {
    let first = converting_dxt1(GatedSource::new());
    let second = converting_dxt1(RawBlockSource::new(TextureFormat::Dxt1));

    thread::scope(|s| {
        s.spawn(|| first.decode_frame(&RED_DXT1).unwrap());
        first.bitstream().entered.wait();

        // `first` is mid-decode; `second` must still decode and lock freely.
        second.decode_frame(&BLUE_DXT1).unwrap();
        let buffer = second.lock_buffer().unwrap();
        assert_eq!(&buffer.as_slice()[..4], &[0, 0, 248, 255]);
        second.unlock_buffer(buffer).unwrap();

        first.bitstream().release.wait();
    });

    first
        .with_buffer(|pixels| assert_eq!(&pixels[..4], &[248, 0, 0, 255]))
        .unwrap();
}

#[test]
fn many_readers_and_a_writer_never_see_torn_frames() {
    let decoder = converting_dxt1(RawBlockSource::new(TextureFormat::Dxt1));
    decoder.decode_frame(&RED_DXT1).unwrap();
    let reads = AtomicUsize::new(0);

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..200 {
                let frame = if i % 2 == 0 { &BLUE_DXT1 } else { &RED_DXT1 };
                decoder.decode_frame(frame).unwrap();
            }
        });

        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..200 {
                    let buffer = decoder.lock_buffer().unwrap();
                    let first = &buffer.as_slice()[..4];
                    assert!(buffer.as_slice().chunks_exact(4).all(|p| p == first));
                    decoder.unlock_buffer(buffer).unwrap();
                    reads.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    assert_eq!(reads.load(Ordering::Relaxed), 800);
}

#[test]
fn buffer_can_be_unlocked_on_another_thread() {
    let decoder = converting_dxt1(RawBlockSource::new(TextureFormat::Dxt1));
    let buffer = decoder.lock_buffer().unwrap();

    thread::scope(|s| {
        s.spawn(|| decoder.unlock_buffer(buffer).unwrap());
    });

    decoder.decode_frame(&RED_DXT1).unwrap();
}

#[test]
fn locking_thread_cannot_decode_while_another_thread_holds_its_handle() {
    let decoder = converting_dxt1(RawBlockSource::new(TextureFormat::Dxt1));
    let buffer = decoder.lock_buffer().unwrap();
    let (send, receive) = mpsc::channel::<()>();

    thread::scope(|s| {
        let decoder = &decoder;
        let reader = s.spawn(move || {
            receive.recv().unwrap();
            decoder.unlock_buffer(buffer).unwrap();
        });

        // The lock still belongs to this thread, so waiting would never end.
        assert!(matches!(
            decoder.decode_frame(&RED_DXT1),
            Err(FrameDecoderError::WouldDeadlock)
        ));
        assert!(matches!(decoder.lock_buffer(), Err(FrameDecoderError::WouldDeadlock)));

        send.send(()).unwrap();
        reader.join().unwrap();
    });

    decoder.decode_frame(&RED_DXT1).unwrap();
}

#[test]
fn stale_handle_cannot_release_another_threads_lock() {
    let decoder = converting_dxt1(RawBlockSource::new(TextureFormat::Dxt1));
    decoder.decode_frame(&RED_DXT1).unwrap();
    let stale = decoder.lock_buffer().unwrap();
    // SAFETY: `stale` is only handed back below, its data is never read.
    unsafe { decoder.unlock_buffer_unchecked() }.unwrap();

    let decoded = AtomicBool::new(false);
    let (locked, proceed) = (Barrier::new(2), Barrier::new(2));

    thread::scope(|s| {
        s.spawn(|| {
            let buffer = decoder.lock_buffer().unwrap();
            locked.wait();
            proceed.wait();
            assert_eq!(&buffer.as_slice()[..4], &[248, 0, 0, 255]);
            decoder.unlock_buffer(buffer).unwrap();
        });

        locked.wait();
        assert!(matches!(
            decoder.unlock_buffer(stale),
            Err(FrameDecoderError::NotLocked)
        ));

        s.spawn(|| {
            decoder.decode_frame(&BLUE_DXT1).unwrap();
            decoded.store(true, Ordering::SeqCst);
        });
        thread::sleep(Duration::from_millis(100));
        // The other thread's lock is still held, so the decode is waiting.
        assert!(!decoded.load(Ordering::SeqCst));
        proceed.wait();
    });

    assert!(decoded.load(Ordering::SeqCst));
}
