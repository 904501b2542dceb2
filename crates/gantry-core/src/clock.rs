//! The [`GpuClock`] abstraction over tick submission and completion.

use crate::id::Tick;

/// Non-blocking view of GPU progress, expressed in logical ticks.
///
/// One implementation exists per backend: a Vulkan backend reads a
/// timeline semaphore or fence payload, a test backend flips counters by
/// hand. The cache and allocator code in this workspace only ever talks
/// to this trait; no graphics API type appears below it.
///
/// All methods take `&self`: implementations are expected to be backed
/// by atomics so a single clock can be shared between the submission
/// path and the pools (`Arc<dyn GpuClock>`).
///
/// # Contract
///
/// - `current_tick` is monotonically increasing and advanced once per
///   submitted batch of work via [`advance`](GpuClock::advance).
/// - `known_complete_tick` is monotonic: once a tick is observed
///   complete it never becomes incomplete again. This is what makes the
///   "is-free" check safe to re-run cheaply.
/// - No method blocks.
pub trait GpuClock {
    /// The tick that will be assigned to the next submitted batch.
    fn current_tick(&self) -> Tick;

    /// The newest tick whose work the device has been observed to finish.
    fn known_complete_tick(&self) -> Tick;

    /// Advance the logical tick, returning the tick that was current
    /// before the bump. Called once per submitted unit of work.
    fn advance(&self) -> Tick;

    /// Whether the batch stamped with `tick` is known to be complete.
    ///
    /// Non-blocking; a `false` answer may become `true` later, never the
    /// reverse.
    fn is_tick_complete(&self, tick: Tick) -> bool {
        self.known_complete_tick() >= tick
    }
}
