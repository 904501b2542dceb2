//! Benchmark profiles and fixtures for the Gantry resource machinery.
//!
//! Provides pre-built staging pool geometries and workload builders
//! shared by the criterion benches and the `frame_loop` example:
//!
//! - [`bench_pool`]: a 16 MiB staging pool on the mock heap backend
//! - [`populated_arena`]: a slot arena pre-filled with `n` live entries

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use gantry_arena::{SlotArena, SlotId};
use gantry_staging::{StagingConfig, StagingPool};
use gantry_test_utils::{HeapDevice, ManualClock};

/// Staging pool geometry used by the benches: 16 MiB ring, 16 regions.
pub fn bench_config() -> StagingConfig {
    StagingConfig {
        ring_capacity: 16 * 1024 * 1024,
        ring_regions: 16,
        alignment: 256,
        deletions_per_frame: 16,
    }
}

/// Build a staging pool over the mock heap backend.
pub fn bench_pool() -> (StagingPool<HeapDevice>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let pool = StagingPool::new(HeapDevice::new(), clock.clone(), bench_config())
        .expect("bench config is valid");
    (pool, clock)
}

/// Build a slot arena holding `n` live `u64` entries.
pub fn populated_arena(n: usize) -> (SlotArena<u64>, Vec<SlotId>) {
    let mut arena = SlotArena::new();
    let ids = (0..n as u64).map(|i| arena.insert(i)).collect();
    (arena, ids)
}
