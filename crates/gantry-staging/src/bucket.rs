//! The [`SizeClassBufferPool`] power-of-two bucket pool.

use gantry_arena::{SlotArena, SlotId};
use gantry_core::{GpuClock, MemoryUsage, StagingMemory, Tick};

use crate::handle::{RefBacking, StagingRef};

/// Number of size-class levels: one per possible `ceil(log2(size))`.
pub const NUM_LEVELS: usize = usize::BITS as usize;

/// Bucket level for a request of `size` bytes.
pub fn log2_ceil(size: usize) -> u32 {
    if size <= 1 {
        0
    } else {
        usize::BITS - (size - 1).leading_zeros()
    }
}

/// Capacity of buffers in bucket `level`.
pub fn level_capacity(level: u32) -> usize {
    1usize << level
}

/// One independent staging buffer owned by the pool.
pub struct PooledBuffer<B> {
    /// The backend buffer.
    pub buffer: B,
    /// Usage class this buffer was created for.
    pub usage: MemoryUsage,
    /// Bucket level, `ceil(log2(original request))`.
    pub log2_level: u32,
    /// Monotonic creation index, for diagnostics.
    pub unique_index: u64,
    /// Last submission tick, or [`Tick::MAX`] while pinned.
    pub tick: Tick,
    /// Pinned for caller-controlled release; invisible to reuse and GC.
    pub deferred: bool,
}

/// One size-class bucket: slots into the pool arena plus scan cursors.
#[derive(Default)]
struct Bucket {
    entries: Vec<SlotId>,
    /// Rotating reuse-scan hint; amortises scans across mixed-age
    /// buckets instead of always rescanning from zero.
    iterate_index: usize,
    /// Garbage-collection cursor.
    delete_index: usize,
}

/// Statistics from one garbage-collection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReleaseStats {
    /// Buffers destroyed.
    pub destroyed: u64,
    /// Bytes of capacity reclaimed.
    pub bytes: u64,
}

/// Pool of fully independent staging buffers grouped by
/// `ceil(log2(size))` buckets, one set of buckets per usage class.
///
/// Buffers are stored in a [`SlotArena`]; buckets only hold slot ids,
/// so reuse, pinning, and garbage collection all go through the same
/// handle machinery as every other cached GPU-side object.
pub struct SizeClassBufferPool<B> {
    arena: SlotArena<PooledBuffer<B>>,
    /// `caches[usage][level]`.
    caches: Vec<Vec<Bucket>>,
    unique_ids: u64,
}

impl<B: StagingMemory> SizeClassBufferPool<B> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            caches: (0..MemoryUsage::ALL.len())
                .map(|_| (0..NUM_LEVELS).map(|_| Bucket::default()).collect())
                .collect(),
            unique_ids: 0,
        }
    }

    /// Reuse a free, complete, unpinned buffer of the right size class.
    ///
    /// Scans the bucket starting at its rotating hint, wrapping once.
    /// On success the entry is restamped with the current tick (or
    /// pinned when the request itself is deferred).
    pub fn try_get_reserved(
        &mut self,
        size: usize,
        usage: MemoryUsage,
        deferred: bool,
        clock: &dyn GpuClock,
    ) -> Option<StagingRef> {
        let level = log2_ceil(size) as usize;
        let bucket = &mut self.caches[usage_index(usage)][level];
        let arena = &self.arena;

        let is_free = |&slot: &SlotId| {
            let entry = &arena[slot];
            !entry.deferred && clock.is_tick_complete(entry.tick)
        };
        let hint = bucket.iterate_index.min(bucket.entries.len());
        let position = bucket.entries[hint..]
            .iter()
            .position(is_free)
            .map(|p| hint + p)
            .or_else(|| bucket.entries[..hint].iter().position(is_free))?;

        bucket.iterate_index = position + 1;
        let slot = bucket.entries[position];
        let entry = &mut self.arena[slot];
        debug_assert!(!entry.deferred);
        entry.tick = if deferred {
            Tick::MAX
        } else {
            clock.current_tick()
        };
        entry.deferred = deferred;
        Some(StagingRef {
            backing: RefBacking::Pooled { slot },
            offset: 0,
            len: size,
            usage,
        })
    }

    /// Add a freshly allocated buffer and hand it out.
    ///
    /// The buffer must be sized to the bucket's power-of-two ceiling
    /// (the caller allocates `level_capacity(log2_ceil(size))` bytes,
    /// never the exact request).
    pub fn adopt(
        &mut self,
        buffer: B,
        size: usize,
        usage: MemoryUsage,
        deferred: bool,
        clock: &dyn GpuClock,
    ) -> StagingRef {
        let level = log2_ceil(size);
        debug_assert!(buffer.len() >= level_capacity(level));
        let entry = PooledBuffer {
            buffer,
            usage,
            log2_level: level,
            unique_index: self.unique_ids,
            tick: if deferred {
                Tick::MAX
            } else {
                clock.current_tick()
            },
            deferred,
        };
        self.unique_ids += 1;
        let slot = self.arena.insert(entry);
        self.caches[usage_index(usage)][level as usize]
            .entries
            .push(slot);
        StagingRef {
            backing: RefBacking::Pooled { slot },
            offset: 0,
            len: size,
            usage,
        }
    }

    /// Unpin a deferred buffer: restamp it with the current tick so it
    /// becomes eligible for reuse once that tick completes.
    pub fn unpin(&mut self, slot: SlotId, usage: MemoryUsage, clock: &dyn GpuClock) {
        let entry = &mut self.arena[slot];
        debug_assert!(entry.deferred, "free_deferred on an unpinned buffer");
        debug_assert_eq!(entry.usage, usage);
        entry.tick = clock.current_tick();
        entry.deferred = false;
    }

    /// Destroy complete buffers in one bucket, bounded by `budget`
    /// entries examined per call.
    ///
    /// The window starts at the bucket's deletion cursor, which advances
    /// by the budget each call and wraps, so repeated calls sweep the
    /// whole bucket eventually without ever scanning it all at once.
    pub fn release_level(
        &mut self,
        usage: MemoryUsage,
        level: usize,
        budget: usize,
        clock: &dyn GpuClock,
    ) -> ReleaseStats {
        let bucket = &mut self.caches[usage_index(usage)][level];
        let mut stats = ReleaseStats::default();

        let begin = bucket.delete_index.min(bucket.entries.len());
        let mut end = (begin + budget).min(bucket.entries.len());
        let mut index = begin;
        while index < end {
            let slot = bucket.entries[index];
            let entry = &self.arena[slot];
            if clock.is_tick_complete(entry.tick) {
                stats.destroyed += 1;
                stats.bytes += entry.buffer.len() as u64;
                self.arena.erase(slot);
                bucket.entries.remove(index);
                end -= 1;
            } else {
                index += 1;
            }
        }

        bucket.delete_index += budget;
        if bucket.delete_index >= bucket.entries.len() {
            bucket.delete_index = 0;
        }
        if bucket.iterate_index > bucket.entries.len() {
            bucket.iterate_index = 0;
        }
        stats
    }

    /// Borrow a pooled buffer entry.
    pub fn buffer(&self, slot: SlotId) -> &PooledBuffer<B> {
        &self.arena[slot]
    }

    /// Mutably borrow a pooled buffer entry.
    pub fn buffer_mut(&mut self, slot: SlotId) -> &mut PooledBuffer<B> {
        &mut self.arena[slot]
    }

    /// Number of live pooled buffers across all buckets.
    pub fn live_buffers(&self) -> usize {
        self.arena.len()
    }

    /// Number of entries in one bucket.
    pub fn bucket_len(&self, usage: MemoryUsage, level: usize) -> usize {
        self.caches[usage_index(usage)][level].entries.len()
    }
}

impl<B: StagingMemory> Default for SizeClassBufferPool<B> {
    fn default() -> Self {
        Self::new()
    }
}

fn usage_index(usage: MemoryUsage) -> usize {
    match usage {
        MemoryUsage::DeviceLocal => 0,
        MemoryUsage::Upload => 1,
        MemoryUsage::Download => 2,
    }
}
