//! End-to-end frame loop example.
//!
//! Demonstrates: request staging memory → write through the span →
//! submit (advance the clock) → lagging GPU completion → per-frame
//! garbage collection → metrics readout.

use gantry_bench::bench_pool;
use gantry_core::{GpuClock, MemoryUsage, Tick};

fn main() {
    println!("=== Gantry frame loop example ===\n");

    let (mut pool, clock) = bench_pool();

    // 120 simulated frames; the GPU runs two submissions behind.
    const FRAMES: u64 = 120;
    const GPU_LAG: u64 = 2;

    for frame in 0..FRAMES {
        // A few uploads per frame: vertex data, uniforms, one texture
        // region, and every 10th frame a readback.
        for size in [64 * 1024, 256, 4096] {
            let staging = pool
                .request(size, MemoryUsage::Upload, false)
                .expect("device has memory");
            pool.span_of_mut(&staging).fill(frame as u8);
        }
        if frame % 10 == 0 {
            let readback = pool
                .request(1024 * 1024, MemoryUsage::Download, true)
                .expect("device has memory");
            // The consumer would read this after the GPU finishes;
            // unpin immediately for the example's purposes.
            pool.free_deferred(&readback);
        }

        // Submit this frame's work and observe lagging completion.
        clock.advance();
        let current = clock.current_tick().0;
        clock.complete_to(Tick(current.saturating_sub(GPU_LAG)));

        // Per-frame housekeeping.
        pool.tick_frame();

        if frame % 30 == 29 {
            let m = pool.metrics();
            println!("frame {:3}:", frame + 1);
            println!("  ring allocations: {:6}", m.ring_allocations);
            println!("  ring fallbacks:   {:6}", m.ring_fallbacks);
            println!("  pool hits/misses: {:4} / {:<4}", m.pool_reuse_hits, m.pool_reuse_misses);
            println!("  buffers created:  {:6}", m.buffers_created);
            println!("  buffers destroyed:{:6}", m.buffers_destroyed);
            println!("  bytes live:       {:6}", m.bytes_live());
        }
    }

    // Drain: let the GPU finish and sweep every deletion level.
    clock.complete_all();
    for _ in 0..2 * gantry_staging::bucket::NUM_LEVELS {
        pool.tick_frame();
    }

    let m = pool.metrics();
    println!("\nafter drain:");
    println!("  pooled buffers alive: {}", pool.pooled_buffers());
    println!("  bytes live:           {}", m.bytes_live());
    assert_eq!(pool.pooled_buffers(), 0);
    println!("\nall staging memory reclaimed");
}
