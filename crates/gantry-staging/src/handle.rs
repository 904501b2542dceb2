//! Staging allocation handles.
//!
//! A [`StagingRef`] is plain data: it records where an allocation lives
//! (ring slice or pooled buffer) without borrowing the pool. The mapped
//! byte span is resolved on demand through
//! [`StagingPool::span_of`] / [`StagingPool::span_of_mut`].
//!
//! [`StagingPool::span_of`]: crate::pool::StagingPool::span_of
//! [`StagingPool::span_of_mut`]: crate::pool::StagingPool::span_of_mut

use std::fmt;

use gantry_arena::SlotId;
use gantry_core::MemoryUsage;

/// Which backing store an allocation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefBacking {
    /// A slice of the stream ring.
    Ring,
    /// A pooled buffer, named by its slot in the pool arena.
    Pooled {
        /// Arena slot of the pooled buffer.
        slot: SlotId,
    },
}

/// Handle to one staging allocation.
///
/// Valid until the allocation is recycled: for ring slices, until the
/// stamped submission tick completes and the ring laps the slice; for
/// pooled buffers, until the stamped tick completes (or, for deferred
/// buffers, until [`free_deferred`] and the following completion).
///
/// [`free_deferred`]: crate::pool::StagingPool::free_deferred
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagingRef {
    /// Where the bytes live.
    pub backing: RefBacking,
    /// Byte offset of the allocation inside its backing buffer.
    ///
    /// Always zero for pooled buffers, which are used whole.
    pub offset: usize,
    /// Requested length in bytes.
    ///
    /// A pooled buffer's real capacity is the bucket's power-of-two
    /// ceiling; `len` is what the caller asked for and what the span
    /// accessors expose.
    pub len: usize,
    /// Usage class of the request.
    pub usage: MemoryUsage,
}

impl StagingRef {
    /// Whether this allocation came from the stream ring.
    pub fn is_ring(&self) -> bool {
        matches!(self.backing, RefBacking::Ring)
    }
}

impl fmt::Display for StagingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.backing {
            RefBacking::Ring => {
                write!(f, "StagingRef(ring, off={}, len={})", self.offset, self.len)
            }
            RefBacking::Pooled { slot } => {
                write!(
                    f,
                    "StagingRef({}, {}, len={})",
                    self.usage, slot, self.len
                )
            }
        }
    }
}
