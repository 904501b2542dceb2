//! The [`StagingPool`] facade.

use std::sync::Arc;

use gantry_core::{DeviceAllocator, GpuClock, MemoryUsage, StagingMemory};

use crate::bucket::{level_capacity, log2_ceil, SizeClassBufferPool, NUM_LEVELS};
use crate::config::StagingConfig;
use crate::error::StagingError;
use crate::handle::{RefBacking, StagingRef};
use crate::metrics::FrameMetrics;
use crate::ring::StreamRing;

/// Staging memory allocator: stream ring with a size-class pool fallback.
///
/// Owns the device allocator, the shared GPU clock, the stream ring, and
/// the bucket pool. A request is served from the ring when it is a small
/// non-deferred upload and the target regions are complete; every other
/// request (and every ring refusal) is served by reusing or creating an
/// independent pooled buffer. No path ever waits on the GPU.
///
/// Single-owner like the rest of the subsystem: one logical thread calls
/// into the pool, and GPU concurrency is modelled entirely through the
/// clock.
pub struct StagingPool<D: DeviceAllocator> {
    device: D,
    clock: Arc<dyn GpuClock>,
    ring: StreamRing<D::Buffer>,
    buckets: SizeClassBufferPool<D::Buffer>,
    deletions_per_frame: usize,
    /// Bucket level garbage-collected this frame; rotates once per
    /// [`tick_frame`](StagingPool::tick_frame).
    current_delete_level: usize,
    metrics: FrameMetrics,
}

impl<D: DeviceAllocator> StagingPool<D> {
    /// Build a pool, allocating the ring's backing buffer up front.
    pub fn new(
        mut device: D,
        clock: Arc<dyn GpuClock>,
        config: StagingConfig,
    ) -> Result<Self, StagingError> {
        config.validate()?;
        let ring_buffer = device.alloc_buffer(config.ring_capacity, MemoryUsage::Upload)?;
        Ok(Self {
            device,
            clock,
            ring: StreamRing::new(ring_buffer, &config),
            buckets: SizeClassBufferPool::new(),
            deletions_per_frame: config.deletions_per_frame,
            current_delete_level: 0,
            metrics: FrameMetrics::default(),
        })
    }

    /// Allocate `size` bytes of staging memory.
    ///
    /// `deferred` pins the allocation against automatic tick-based
    /// reclaim until [`free_deferred`](StagingPool::free_deferred);
    /// deferred requests and non-upload usages always take the pooled
    /// path. The only failure is device memory exhaustion on a pool
    /// miss.
    pub fn request(
        &mut self,
        size: usize,
        usage: MemoryUsage,
        deferred: bool,
    ) -> Result<StagingRef, StagingError> {
        if !deferred && usage == MemoryUsage::Upload && size <= self.ring.request_ceiling() {
            if let Some(offset) = self.ring.try_alloc(size, &*self.clock) {
                self.metrics.ring_allocations += 1;
                return Ok(StagingRef {
                    backing: RefBacking::Ring,
                    offset,
                    len: size,
                    usage,
                });
            }
            self.metrics.ring_fallbacks += 1;
        }
        self.pooled(size, usage, deferred)
    }

    /// Unpin a deferred allocation, stamping it with the current tick.
    ///
    /// The buffer becomes eligible for reuse and garbage collection once
    /// that tick completes. Calling this on a non-deferred or ring
    /// allocation is a programming error.
    pub fn free_deferred(&mut self, staging_ref: &StagingRef) {
        match staging_ref.backing {
            RefBacking::Pooled { slot } => {
                self.buckets.unpin(slot, staging_ref.usage, &*self.clock);
                self.metrics.deferred_released += 1;
            }
            RefBacking::Ring => {
                debug_assert!(false, "free_deferred on a ring allocation");
            }
        }
    }

    /// Once-per-frame housekeeping hook.
    ///
    /// Rotates the deletion level and garbage-collects that level in
    /// each usage cache, bounded by the per-frame deletion budget, so
    /// worst-case cost per frame stays fixed regardless of pool size.
    pub fn tick_frame(&mut self) {
        self.current_delete_level = (self.current_delete_level + 1) % NUM_LEVELS;
        for usage in MemoryUsage::ALL {
            let stats = self.buckets.release_level(
                usage,
                self.current_delete_level,
                self.deletions_per_frame,
                &*self.clock,
            );
            self.metrics.buffers_destroyed += stats.destroyed;
            self.metrics.bytes_freed += stats.bytes;
        }
    }

    /// Resolve the mapped byte span of an allocation.
    pub fn span_of(&self, staging_ref: &StagingRef) -> &[u8] {
        match staging_ref.backing {
            RefBacking::Ring => self.ring.span(staging_ref.offset, staging_ref.len),
            RefBacking::Pooled { slot } => {
                &self.buckets.buffer(slot).buffer.as_slice()[..staging_ref.len]
            }
        }
    }

    /// Resolve the mapped byte span of an allocation, mutably.
    pub fn span_of_mut(&mut self, staging_ref: &StagingRef) -> &mut [u8] {
        match staging_ref.backing {
            RefBacking::Ring => self.ring.span_mut(staging_ref.offset, staging_ref.len),
            RefBacking::Pooled { slot } => {
                &mut self.buckets.buffer_mut(slot).buffer.as_mut_slice()[..staging_ref.len]
            }
        }
    }

    /// Allocator counters.
    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    /// The shared GPU clock.
    pub fn clock(&self) -> &Arc<dyn GpuClock> {
        &self.clock
    }

    /// Number of live pooled buffers (excludes the ring).
    pub fn pooled_buffers(&self) -> usize {
        self.buckets.live_buffers()
    }

    /// The device allocator, for host-side introspection.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Serve a request from the bucket pool: reuse first, create on miss.
    fn pooled(
        &mut self,
        size: usize,
        usage: MemoryUsage,
        deferred: bool,
    ) -> Result<StagingRef, StagingError> {
        if deferred {
            self.metrics.deferred_pinned += 1;
        }
        if let Some(staging_ref) =
            self.buckets
                .try_get_reserved(size, usage, deferred, &*self.clock)
        {
            self.metrics.pool_reuse_hits += 1;
            return Ok(staging_ref);
        }
        self.metrics.pool_reuse_misses += 1;

        let capacity = level_capacity(log2_ceil(size));
        let buffer = self.device.alloc_buffer(capacity, usage)?;
        self.metrics.buffers_created += 1;
        self.metrics.bytes_allocated += capacity as u64;
        Ok(self
            .buckets
            .adopt(buffer, size, usage, deferred, &*self.clock))
    }
}
