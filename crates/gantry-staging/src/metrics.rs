//! Allocator counters for telemetry.

/// Cumulative staging allocator counters.
///
/// Updated by the pool as requests are served and read back by the host
/// for telemetry and memory-pressure decisions. All counters are
/// monotonic over the pool's lifetime; live memory is the difference of
/// the byte counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameMetrics {
    /// Requests served directly from the stream ring.
    pub ring_allocations: u64,
    /// Ring-eligible requests redirected to the pool because the target
    /// regions were still active (straight-line or wrapped).
    pub ring_fallbacks: u64,
    /// Pooled requests served by reusing a free, complete buffer.
    pub pool_reuse_hits: u64,
    /// Pooled requests that had to create a new buffer.
    pub pool_reuse_misses: u64,
    /// Pooled buffers created.
    pub buffers_created: u64,
    /// Pooled buffers destroyed by garbage collection.
    pub buffers_destroyed: u64,
    /// Bytes of pooled buffer capacity allocated.
    pub bytes_allocated: u64,
    /// Bytes of pooled buffer capacity reclaimed.
    pub bytes_freed: u64,
    /// Requests that pinned a buffer for deferred release.
    pub deferred_pinned: u64,
    /// Deferred buffers explicitly released.
    pub deferred_released: u64,
}

impl FrameMetrics {
    /// Bytes of pooled buffer capacity currently alive.
    pub fn bytes_live(&self) -> u64 {
        self.bytes_allocated - self.bytes_freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = FrameMetrics::default();
        assert_eq!(m.ring_allocations, 0);
        assert_eq!(m.ring_fallbacks, 0);
        assert_eq!(m.pool_reuse_hits, 0);
        assert_eq!(m.pool_reuse_misses, 0);
        assert_eq!(m.buffers_created, 0);
        assert_eq!(m.buffers_destroyed, 0);
        assert_eq!(m.bytes_allocated, 0);
        assert_eq!(m.bytes_freed, 0);
        assert_eq!(m.deferred_pinned, 0);
        assert_eq!(m.deferred_released, 0);
        assert_eq!(m.bytes_live(), 0);
    }

    #[test]
    fn bytes_live_is_the_counter_difference() {
        let m = FrameMetrics {
            bytes_allocated: 8192,
            bytes_freed: 1024,
            ..Default::default()
        };
        assert_eq!(m.bytes_live(), 7168);
    }
}
