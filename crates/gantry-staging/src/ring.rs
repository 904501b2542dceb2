//! The [`StreamRing`] circular staging allocator.

use gantry_core::{GpuClock, StagingMemory, Tick};

use crate::config::StagingConfig;

/// Circular upload region divided into tick-stamped sync regions.
///
/// The ring is a single persistently mapped buffer logically divided
/// into `ring_regions` equal regions. Every allocation that touches a
/// region stamps it with the current submission tick; a region may be
/// carved from again only once its stamp is known complete. When the
/// next slice would overlap a still-active region, [`try_alloc`] refuses
/// instead of waiting — the caller falls back to the bucket pool, so the
/// CPU never stalls on the GPU.
///
/// Stamping is deferred: the regions covered by `[used_cursor, cursor)`
/// (everything handed out since the previous request) are stamped when
/// the *next* request arrives, with the tick current at that moment.
/// That overestimates the stamp by at most one tick, which is safe.
///
/// [`try_alloc`]: StreamRing::try_alloc
pub struct StreamRing<B> {
    buffer: B,
    region_size: usize,
    alignment: usize,
    /// Last submission tick stamped on each region.
    sync_ticks: Vec<Tick>,
    /// Next allocation offset.
    cursor: usize,
    /// Start of the span handed out since the last stamping pass.
    used_cursor: usize,
    /// High-water mark of handed-out spans in the current lap.
    free_cursor: usize,
}

impl<B: StagingMemory> StreamRing<B> {
    /// Wrap `buffer` as a stream ring with the given geometry.
    ///
    /// The buffer must be at least `config.ring_capacity` bytes; the
    /// config is assumed validated.
    pub fn new(buffer: B, config: &StagingConfig) -> Self {
        debug_assert!(buffer.len() >= config.ring_capacity);
        Self {
            buffer,
            region_size: config.region_size(),
            alignment: config.alignment,
            sync_ticks: vec![Tick::ZERO; config.ring_regions],
            cursor: 0,
            used_cursor: 0,
            free_cursor: 0,
        }
    }

    /// Ring capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.sync_ticks.len() * self.region_size
    }

    /// Largest request the ring will accept.
    ///
    /// Anything bigger goes straight to the bucket pool.
    pub fn request_ceiling(&self) -> usize {
        self.region_size
    }

    /// Try to carve `size` bytes, returning the offset on success.
    ///
    /// Returns `None` when the slice would overlap a region whose
    /// stamped tick is not yet complete — either straight ahead of the
    /// cursor, or at the head of the ring after a wrap. Refusal leaves
    /// the ring in a state where the next request re-attempts (and
    /// re-probes) the same placement; it never commits a span it did
    /// not hand out.
    pub fn try_alloc(&mut self, size: usize, clock: &dyn GpuClock) -> Option<usize> {
        debug_assert!(size <= self.request_ceiling());
        let num_regions = self.sync_ticks.len();

        // Straight-line probe: everything from the first region past the
        // current lap's high-water mark up to the end of the prospective
        // span must be complete.
        let probe_begin = self.region_of(self.free_cursor) + 1;
        let probe_end = (self.region_of(self.cursor + size) + 1).min(num_regions);
        if self.regions_active(probe_begin, probe_end, clock) {
            return None;
        }

        // Stamp the span handed out since the previous request.
        let current = clock.current_tick();
        self.stamp(
            self.region_of(self.used_cursor),
            self.region_of(self.cursor),
            current,
        );
        self.used_cursor = self.cursor;
        self.free_cursor = self.free_cursor.max(self.cursor + size);

        if self.cursor + size >= self.capacity() {
            // The slice does not fit before the physical end. Stamp the
            // tail regions (they hold this lap's data) and probe the
            // head regions the wrapped slice would land on.
            self.stamp(self.region_of(self.used_cursor), num_regions, current);
            if self.regions_active(0, self.region_of(size) + 1, clock) {
                // Wrapped target still active: leave the cursor parked
                // at the end so the next request retries the wrap
                // against fresh completion state. No partial wrap.
                return None;
            }
            self.used_cursor = 0;
            self.cursor = 0;
            self.free_cursor = size;
        }

        let offset = self.cursor;
        self.cursor = align_up(self.cursor + size, self.alignment);
        Some(offset)
    }

    /// Read-only view of an allocated slice.
    pub fn span(&self, offset: usize, len: usize) -> &[u8] {
        &self.buffer.as_slice()[offset..offset + len]
    }

    /// Mutable view of an allocated slice.
    pub fn span_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.buffer.as_mut_slice()[offset..offset + len]
    }

    /// The stamp on `region`, for diagnostics.
    pub fn region_tick(&self, region: usize) -> Tick {
        self.sync_ticks[region]
    }

    fn region_of(&self, offset: usize) -> usize {
        offset / self.region_size
    }

    /// Whether any region in `[begin, end)` carries an incomplete stamp.
    fn regions_active(&self, begin: usize, end: usize, clock: &dyn GpuClock) -> bool {
        if begin >= end {
            return false;
        }
        self.sync_ticks[begin..end]
            .iter()
            .any(|&tick| !clock.is_tick_complete(tick))
    }

    /// Stamp regions `[begin, end)` with `tick`.
    fn stamp(&mut self, begin: usize, end: usize, tick: Tick) {
        if begin >= end {
            return;
        }
        for stamp in &mut self.sync_ticks[begin..end] {
            *stamp = tick;
        }
    }
}

fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}
