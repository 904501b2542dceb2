//! The [`ResourceContext`] engine context.

use std::sync::Arc;

use gantry_core::{DeviceAllocator, GpuClock};
use gantry_staging::{StagingConfig, StagingError, StagingPool};

/// Long-lived, explicitly owned home for the shared resource machinery.
///
/// The host renderer constructs one context at startup and passes it
/// (or a borrow of it) to every subsystem that allocates staging memory
/// or needs the clock. There is no hidden process-wide state anywhere
/// in the workspace: drop the context and everything it owns — pooled
/// buffers included — is released.
///
/// Per-resource-kind arenas and LRU caches stay with their owning
/// subsystem (a buffer cache owns its own `SlotArena` of buffers); the
/// context only holds what must be shared.
pub struct ResourceContext<D: DeviceAllocator> {
    clock: Arc<dyn GpuClock>,
    staging: StagingPool<D>,
}

impl<D: DeviceAllocator> ResourceContext<D> {
    /// Build a context from a backend device, a shared clock, and a
    /// staging configuration.
    pub fn new(
        device: D,
        clock: Arc<dyn GpuClock>,
        config: StagingConfig,
    ) -> Result<Self, StagingError> {
        let staging = StagingPool::new(device, Arc::clone(&clock), config)?;
        Ok(Self { clock, staging })
    }

    /// The shared GPU clock.
    pub fn clock(&self) -> &Arc<dyn GpuClock> {
        &self.clock
    }

    /// The staging pool.
    pub fn staging(&self) -> &StagingPool<D> {
        &self.staging
    }

    /// The staging pool, mutably.
    pub fn staging_mut(&mut self) -> &mut StagingPool<D> {
        &mut self.staging
    }

    /// Once-per-frame hook: advances staging garbage collection.
    ///
    /// Call after presenting, alongside the host's own per-frame cache
    /// sweeps.
    pub fn tick_frame(&mut self) {
        self.staging.tick_frame();
    }
}
