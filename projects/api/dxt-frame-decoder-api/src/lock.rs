//! The per-decoder buffer lock.
//!
//! One lock guards the output buffer of a decoder. It is taken two ways:
//!
//! - scoped, by [`FrameDecoder::decode_frame`] and [`FrameDecoder::with_buffer`], released when
//!   the guard is dropped, including on error;
//! - explicitly, by [`FrameDecoder::lock_buffer`], released only by a matching unlock.
//!
//! An explicit lock that is never released blocks every later acquisition from other threads
//! for good. Acquiring the lock on a thread that already holds it fails with
//! [`FrameDecoderError::WouldDeadlock`] rather than hanging.
//!
//! Every acquisition gets a new generation number. An explicit unlock may name the generation
//! it releases, so a stale handle cannot release a later holder's lock.
//!
//! [`FrameDecoder::decode_frame`]: crate::FrameDecoder::decode_frame
//! [`FrameDecoder::with_buffer`]: crate::FrameDecoder::with_buffer
//! [`FrameDecoder::lock_buffer`]: crate::FrameDecoder::lock_buffer

use crate::error::{FrameDecoderError, FrameDecoderResult};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldKind {
    Scoped,
    Explicit,
}

#[derive(Debug, Clone, Copy)]
struct Holder {
    thread: ThreadId,
    kind: HoldKind,
    generation: u64,
}

#[derive(Debug, Default)]
struct LockState {
    holder: Option<Holder>,
    acquisitions: u64,
}

#[derive(Debug, Default)]
pub(crate) struct BufferLock {
    state: Mutex<LockState>,
    released: Condvar,
}

impl BufferLock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // The state is plain data, so a panic elsewhere cannot leave it torn.
    fn state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire(&self, kind: HoldKind) -> FrameDecoderResult<u64> {
        let current = thread::current().id();
        let mut state = self.state();
        loop {
            match state.holder {
                None => {
                    state.acquisitions = state.acquisitions.wrapping_add(1);
                    let generation = state.acquisitions;
                    state.holder = Some(Holder {
                        thread: current,
                        kind,
                        generation,
                    });
                    return Ok(generation);
                }
                Some(holder) if holder.thread == current => {
                    return Err(FrameDecoderError::WouldDeadlock);
                }
                Some(_) => {
                    state = self
                        .released
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    fn release(&self) {
        self.state().holder = None;
        self.released.notify_one();
    }

    /// Blocks until the lock is free, then holds it until the returned guard is dropped.
    pub(crate) fn lock_scoped(&self) -> FrameDecoderResult<ScopedLock<'_>> {
        self.acquire(HoldKind::Scoped)?;
        Ok(ScopedLock { lock: self })
    }

    /// Blocks until the lock is free, then holds it until [`BufferLock::unlock_explicit`].
    ///
    /// Returns the generation of the new hold.
    pub(crate) fn lock_explicit(&self) -> FrameDecoderResult<u64> {
        self.acquire(HoldKind::Explicit)
    }

    /// Releases an explicit lock. May be called from any thread.
    ///
    /// With `Some(generation)`, only the hold of that generation is released.
    pub(crate) fn unlock_explicit(&self, generation: Option<u64>) -> FrameDecoderResult<()> {
        let mut state = self.state();
        match state.holder {
            Some(Holder {
                kind: HoldKind::Explicit,
                generation: held,
                ..
            }) if generation.is_none_or(|g| g == held) => {
                state.holder = None;
                drop(state);
                self.released.notify_one();
                Ok(())
            }
            _ => Err(FrameDecoderError::NotLocked),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        self.state().holder.is_some()
    }
}

/// Holds a [`BufferLock`] until dropped.
#[must_use]
pub(crate) struct ScopedLock<'a> {
    lock: &'a BufferLock,
}

impl Drop for ScopedLock<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
