//! Work dispatch for bitstream decoders.
//!
//! A bitstream decoder splits a frame into independent pieces of work (for example the
//! compressed chunks of a frame) and hands them to a [`WorkDispatcher`] as a work function
//! plus an item count.

use tracing::trace;

/// Runs a work function once for each item index of a frame.
pub trait WorkDispatcher {
    /// Invokes `work` once for every index in `0..count`.
    ///
    /// Implementations must have run every item by the time this returns.
    fn dispatch(&self, work: &mut dyn FnMut(usize), count: usize);
}

/// Runs every item in ascending index order on the calling thread.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SequentialDispatcher;

impl WorkDispatcher for SequentialDispatcher {
    #[inline]
    fn dispatch(&self, work: &mut dyn FnMut(usize), count: usize) {
        trace!(count, "dispatching work sequentially");
        for index in 0..count {
            work(index);
        }
    }
}

impl<T: WorkDispatcher + ?Sized> WorkDispatcher for &T {
    #[inline]
    fn dispatch(&self, work: &mut dyn FnMut(usize), count: usize) {
        (**self).dispatch(work, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_every_index_in_order() {
        let mut seen = Vec::new();
        SequentialDispatcher.dispatch(&mut |i| seen.push(i), 5);
        assert_eq!(seen, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn zero_items_never_calls_work() {
        let mut calls = 0;
        SequentialDispatcher.dispatch(&mut |_| calls += 1, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn runs_on_the_calling_thread() {
        let caller = std::thread::current().id();
        SequentialDispatcher.dispatch(&mut |_| assert_eq!(std::thread::current().id(), caller), 3);
    }
}
