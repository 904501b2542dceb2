//! The [`DelayedReleaseRing`] frame-deferred drop queue.

use smallvec::SmallVec;

/// Holds objects for a fixed number of frames before dropping them.
///
/// Some CPU-side wrappers must outlive the last frame whose command
/// stream referenced them even after the cache has unlinked them (the
/// in-flight frame count bounds how long). Push such objects here when
/// unreferencing; call [`tick`](DelayedReleaseRing::tick) once per
/// frame, and each object is dropped exactly `frames` ticks after it
/// was pushed.
///
/// Buckets are inline up to four objects per frame; heavier frames
/// spill to the heap transparently.
pub struct DelayedReleaseRing<T> {
    buckets: Vec<SmallVec<[T; 4]>>,
    cursor: usize,
}

impl<T> DelayedReleaseRing<T> {
    /// Create a ring that delays drops by `frames` ticks.
    ///
    /// # Panics
    ///
    /// Panics if `frames == 0`; a zero-frame ring would drop on push.
    pub fn new(frames: usize) -> Self {
        assert!(frames >= 1, "DelayedReleaseRing needs at least 1 frame, got {frames}");
        Self {
            buckets: (0..frames).map(|_| SmallVec::new()).collect(),
            cursor: 0,
        }
    }

    /// Queue an object for release `frames` ticks from now.
    pub fn push(&mut self, object: T) {
        self.buckets[self.cursor].push(object);
    }

    /// Advance one frame, dropping every object queued `frames` ticks ago.
    pub fn tick(&mut self) {
        self.cursor = (self.cursor + 1) % self.buckets.len();
        self.buckets[self.cursor].clear();
    }

    /// Number of objects currently queued across all frames.
    pub fn pending(&self) -> usize {
        self.buckets.iter().map(SmallVec::len).sum()
    }

    /// The delay, in frames.
    pub fn frames(&self) -> usize {
        self.buckets.len()
    }
}
