//! End-to-end resource lifetime scenarios: a minimal buffer cache built
//! on the arena, the tick LRU, and the staging pool together, driven
//! through simulated frames.

use std::sync::Arc;

use gantry::prelude::*;
use gantry_test_utils::{HeapDevice, ManualClock};

/// What a real renderer's buffer cache keeps per cached buffer.
struct CachedBuffer {
    len: usize,
    lru_id: ItemId,
}

/// Minimal buffer-cache client of the resource machinery.
struct BufferCache {
    context: ResourceContext<HeapDevice>,
    clock: Arc<ManualClock>,
    arena: SlotArena<CachedBuffer>,
    lru: TickLruCache<SlotId>,
}

impl BufferCache {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new());
        let context = ResourceContext::new(
            HeapDevice::new(),
            clock.clone(),
            StagingConfig {
                ring_capacity: 1024,
                ring_regions: 8,
                alignment: 64,
                deletions_per_frame: 16,
            },
        )
        .unwrap();
        Self {
            context,
            clock,
            arena: SlotArena::new(),
            lru: TickLruCache::new(),
        }
    }

    /// Upload `data` through staging memory and cache the buffer.
    fn create_buffer(&mut self, data: &[u8]) -> SlotId {
        let staging = self
            .context
            .staging_mut()
            .request(data.len(), MemoryUsage::Upload, false)
            .unwrap();
        self.context.staging_mut().span_of_mut(&staging)[..data.len()].copy_from_slice(data);

        let tick = self.clock.current_tick();
        let slot = self.arena.insert(CachedBuffer {
            len: data.len(),
            lru_id: ItemId(u32::MAX),
        });
        let lru_id = self.lru.insert(slot, tick);
        self.arena[slot].lru_id = lru_id;
        slot
    }

    /// Mark a cached buffer as used this frame.
    fn touch(&mut self, slot: SlotId) {
        let lru_id = self.arena[slot].lru_id;
        self.lru.touch(lru_id, self.clock.current_tick());
    }

    /// Evict every buffer last used strictly before `tick`.
    fn trim_below(&mut self, tick: Tick) -> Vec<SlotId> {
        let mut cold = Vec::new();
        self.lru.for_each_below(tick, |&slot| cold.push(slot));
        for &slot in &cold {
            let lru_id = self.arena[slot].lru_id;
            self.lru.free(lru_id);
            self.arena.erase(slot);
        }
        cold
    }

    /// End the frame: submit, and run per-frame housekeeping.
    fn end_frame(&mut self) {
        self.clock.advance();
        self.context.tick_frame();
    }
}

// ── Arena behaviour through the cache ────────────────────────────

#[test]
fn arena_growth_and_survivor_iteration() {
    let mut cache = BufferCache::new();

    // Three inserts grow the arena 0 → 1 → 2 → 4.
    assert_eq!(cache.arena.capacity(), 0);
    let a = cache.create_buffer(&[1; 16]);
    assert_eq!(cache.arena.capacity(), 1);
    let b = cache.create_buffer(&[2; 16]);
    assert_eq!(cache.arena.capacity(), 2);
    let c = cache.create_buffer(&[3; 16]);
    assert_eq!(cache.arena.capacity(), 4);

    // Erase the middle buffer; iteration yields exactly the first and
    // third.
    cache.lru.free(cache.arena[b].lru_id);
    cache.arena.erase(b);
    let live: Vec<SlotId> = cache.arena.iter().map(|(slot, _)| slot).collect();
    assert_eq!(live, vec![a, c]);
    assert_eq!(cache.arena.len(), 2);
}

#[test]
fn handles_stay_valid_across_frames_of_churn() {
    let mut cache = BufferCache::new();
    let keeper = cache.create_buffer(&[7; 32]);

    for frame in 0..20 {
        let transient = cache.create_buffer(&[frame as u8; 64]);
        cache.touch(keeper);
        cache.end_frame();
        cache.clock.complete_all();
        let lru_id = cache.arena[transient].lru_id;
        cache.lru.free(lru_id);
        cache.arena.erase(transient);
    }

    assert_eq!(cache.arena[keeper].len, 32);
    assert_eq!(cache.arena.len(), 1);
}

// ── LRU ordering through the cache ───────────────────────────────

#[test]
fn touched_buffers_outlive_a_trim() {
    let mut cache = BufferCache::new();

    // Frame 1: two buffers.
    let a = cache.create_buffer(&[0xA; 100]);
    let b = cache.create_buffer(&[0xB; 100]);
    cache.end_frame();

    // Frame 2: another buffer, and `a` is used again.
    let c = cache.create_buffer(&[0xC; 100]);
    cache.touch(a);
    cache.end_frame();

    // Trim everything older than frame 2: only `b` is cold.
    let evicted = cache.trim_below(Tick(2));
    assert_eq!(evicted, vec![b]);
    assert!(cache.arena.contains(a));
    assert!(!cache.arena.contains(b));
    assert!(cache.arena.contains(c));
}

#[test]
fn trim_visits_cold_buffers_in_age_order() {
    let mut cache = BufferCache::new();
    let mut created = Vec::new();
    for i in 0..5 {
        created.push(cache.create_buffer(&[i; 10]));
        cache.end_frame();
    }
    // Touch the oldest so it becomes the newest.
    cache.touch(created[0]);

    // Everything below the final tick: the four untouched buffers, in
    // creation order, but not the re-touched one.
    let evicted = cache.trim_below(cache.clock.current_tick());
    assert_eq!(evicted, created[1..].to_vec());
    assert!(cache.arena.contains(created[0]));
}

// ── Full frame loop ──────────────────────────────────────────────

#[test]
fn frame_loop_with_eviction_and_staging_reclaim() {
    let mut cache = BufferCache::new();

    // Ten frames: one new buffer per frame, half of them large enough
    // to force the pooled staging path.
    let mut slots = Vec::new();
    for frame in 0..10u8 {
        let size = if frame % 2 == 0 { 100 } else { 300 };
        slots.push(cache.create_buffer(&vec![frame; size]));
        cache.end_frame();
        // The GPU runs two frames behind.
        let behind = cache.clock.current_tick().0.saturating_sub(2);
        cache.clock.complete_to(Tick(behind));
    }

    // Memory pressure: evict everything older than five frames ago.
    let horizon = Tick(cache.clock.current_tick().0 - 5);
    let evicted = cache.trim_below(horizon);
    assert_eq!(evicted.len(), 5);
    assert_eq!(cache.arena.len(), 5);

    // Survivors keep their identity.
    for slot in &slots[5..] {
        assert!(cache.arena.contains(*slot));
    }

    // Let the GPU finish everything and run the frame hook until the
    // staging pool has swept every deletion level twice.
    cache.clock.complete_all();
    for _ in 0..2 * gantry::staging::bucket::NUM_LEVELS {
        cache.end_frame();
        cache.clock.complete_all();
    }
    assert_eq!(cache.context.staging().pooled_buffers(), 0);
    // The ring's backing buffer is the only device allocation left.
    assert_eq!(cache.context.staging().device().live_buffers(), 1);
}

// ── Delayed release ──────────────────────────────────────────────

#[test]
fn delayed_release_holds_wrappers_for_the_in_flight_window() {
    use std::rc::Rc;

    let mut ring: DelayedReleaseRing<Rc<str>> = DelayedReleaseRing::new(3);
    let wrapper: Rc<str> = "vertex-buffer-wrapper".into();

    ring.push(Rc::clone(&wrapper));
    assert_eq!(Rc::strong_count(&wrapper), 2);

    // Two frames in flight: still referenced.
    ring.tick();
    ring.tick();
    assert_eq!(Rc::strong_count(&wrapper), 2);

    // Third frame: the command streams that referenced it are done.
    ring.tick();
    assert_eq!(Rc::strong_count(&wrapper), 1);
}
