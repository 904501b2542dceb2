//! Staging allocator configuration.

use crate::error::StagingError;

/// Configuration for a [`StagingPool`].
///
/// Validated at pool construction; all values are immutable afterwards.
///
/// [`StagingPool`]: crate::pool::StagingPool
#[derive(Clone, Debug)]
pub struct StagingConfig {
    /// Size of the stream ring in bytes.
    ///
    /// Default: 128 MiB. Must be a positive multiple of both
    /// `ring_regions` and `alignment`.
    pub ring_capacity: usize,

    /// Number of sync regions the ring is divided into.
    ///
    /// Each region carries one "last submitted tick" stamp; a finer
    /// division recycles space sooner at the cost of more stamps to
    /// probe. Default: 16. Must be at least 2.
    pub ring_regions: usize,

    /// Alignment of every ring allocation in bytes.
    ///
    /// Covers the maximum buffer alignment any backend requires.
    /// Default: 256. Must be a power of two.
    pub alignment: usize,

    /// Upper bound on pooled-buffer deletions examined per frame and
    /// per usage class.
    ///
    /// Bounds worst-case garbage collection cost instead of sweeping
    /// whole buckets, trading reclaim latency for predictable frame
    /// time. Default: 16. Must be at least 1.
    pub deletions_per_frame: usize,
}

impl StagingConfig {
    /// Default ring capacity: 128 MiB.
    pub const DEFAULT_RING_CAPACITY: usize = 128 * 1024 * 1024;

    /// Default region count.
    pub const DEFAULT_RING_REGIONS: usize = 16;

    /// Default allocation alignment.
    pub const DEFAULT_ALIGNMENT: usize = 256;

    /// Default per-frame deletion budget.
    pub const DEFAULT_DELETIONS_PER_FRAME: usize = 16;

    /// Bytes per sync region.
    ///
    /// Also the per-request ceiling for ring eligibility: larger
    /// requests go straight to the bucket pool.
    pub fn region_size(&self) -> usize {
        self.ring_capacity / self.ring_regions
    }

    /// Check the configuration invariants.
    pub fn validate(&self) -> Result<(), StagingError> {
        if self.ring_capacity == 0 {
            return Err(StagingError::InvalidConfig {
                reason: "ring_capacity must be positive",
            });
        }
        if self.ring_regions < 2 {
            return Err(StagingError::InvalidConfig {
                reason: "ring_regions must be at least 2",
            });
        }
        if self.ring_capacity % self.ring_regions != 0 {
            return Err(StagingError::InvalidConfig {
                reason: "ring_capacity must be a multiple of ring_regions",
            });
        }
        if !self.alignment.is_power_of_two() {
            return Err(StagingError::InvalidConfig {
                reason: "alignment must be a power of two",
            });
        }
        if self.ring_capacity % self.alignment != 0 {
            return Err(StagingError::InvalidConfig {
                reason: "ring_capacity must be a multiple of alignment",
            });
        }
        if self.deletions_per_frame == 0 {
            return Err(StagingError::InvalidConfig {
                reason: "deletions_per_frame must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            ring_capacity: Self::DEFAULT_RING_CAPACITY,
            ring_regions: Self::DEFAULT_RING_REGIONS,
            alignment: Self::DEFAULT_ALIGNMENT,
            deletions_per_frame: Self::DEFAULT_DELETIONS_PER_FRAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StagingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.region_size(), 8 * 1024 * 1024);
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = StagingConfig {
            ring_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StagingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn capacity_must_divide_evenly_into_regions() {
        let config = StagingConfig {
            ring_capacity: 1000,
            ring_regions: 16,
            alignment: 8,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_power_of_two_alignment_rejected() {
        let config = StagingConfig {
            ring_capacity: 1024,
            ring_regions: 8,
            alignment: 48,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn small_test_geometry_is_valid() {
        // The geometry used throughout the allocator tests.
        let config = StagingConfig {
            ring_capacity: 1024,
            ring_regions: 8,
            alignment: 64,
            deletions_per_frame: 16,
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.region_size(), 128);
    }
}
