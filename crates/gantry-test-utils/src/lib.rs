//! Test utilities and mock backends for Gantry development.
//!
//! Provides [`ManualClock`], a hand-cranked [`GpuClock`], and
//! [`HeapDevice`], a [`DeviceAllocator`] whose buffers are plain heap
//! memory with live-allocation tracking. Together they let every
//! allocator and cache test drive tick submission and completion
//! without a graphics device.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

use gantry_core::{AllocError, DeviceAllocator, GpuClock, MemoryUsage, StagingMemory, Tick};

/// Hand-cranked GPU clock.
///
/// The logical tick starts at 1 and the known-complete tick at 0, the
/// same initial state a timeline-semaphore backend presents before any
/// submission. Tests advance the tick with [`GpuClock::advance`] and
/// retire work with [`complete_to`](ManualClock::complete_to).
pub struct ManualClock {
    current: AtomicU64,
    complete: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            current: AtomicU64::new(1),
            complete: AtomicU64::new(0),
        }
    }

    /// Observe every tick up to and including `tick` as complete.
    ///
    /// Monotonic: completion never moves backwards, even if a test
    /// passes a stale tick.
    pub fn complete_to(&self, tick: Tick) {
        self.complete.fetch_max(tick.0, Ordering::AcqRel);
    }

    /// Observe every submitted tick as complete.
    pub fn complete_all(&self) {
        self.complete_to(Tick(self.current.load(Ordering::Acquire)));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuClock for ManualClock {
    fn current_tick(&self) -> Tick {
        Tick(self.current.load(Ordering::Acquire))
    }

    fn known_complete_tick(&self) -> Tick {
        Tick(self.complete.load(Ordering::Acquire))
    }

    fn advance(&self) -> Tick {
        Tick(self.current.fetch_add(1, Ordering::AcqRel))
    }
}

/// A "mapped" buffer backed by plain heap memory.
///
/// Deregisters itself from its [`HeapDevice`] on drop, so tests can
/// assert on live-buffer counts after garbage collection.
pub struct HeapBuffer {
    id: u64,
    bytes: Vec<u8>,
    registry: Arc<Mutex<Registry>>,
}

impl StagingMemory for HeapBuffer {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Drop for HeapBuffer {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap();
        registry.live.shift_remove(&self.id);
    }
}

#[derive(Default)]
struct Registry {
    /// Live allocations: id → (size, usage). Insertion-ordered so test
    /// assertions over allocation history are deterministic.
    live: IndexMap<u64, (usize, MemoryUsage)>,
}

/// Mock device allocator over heap memory.
///
/// Buffers are zero-filled `Vec<u8>`s. An optional failure fuse makes
/// allocation fail after N further successes, for exercising the fatal
/// error path.
pub struct HeapDevice {
    registry: Arc<Mutex<Registry>>,
    next_id: u64,
    total_allocated: u64,
    fail_after: Option<u64>,
}

impl HeapDevice {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            next_id: 0,
            total_allocated: 0,
            fail_after: None,
        }
    }

    /// Make allocation fail after `successes` more successful calls.
    pub fn fail_after(&mut self, successes: u64) {
        self.fail_after = Some(successes);
    }

    /// Number of buffers currently alive (allocated and not dropped).
    pub fn live_buffers(&self) -> usize {
        self.registry.lock().unwrap().live.len()
    }

    /// Bytes currently alive across all buffers.
    pub fn live_bytes(&self) -> usize {
        self.registry
            .lock()
            .unwrap()
            .live
            .values()
            .map(|&(size, _)| size)
            .sum()
    }

    /// Cumulative bytes ever allocated.
    pub fn total_allocated(&self) -> u64 {
        self.total_allocated
    }

    /// A probe onto the allocation registry that outlives the device,
    /// for asserting that buffers are released after teardown.
    pub fn probe(&self) -> DeviceProbe {
        DeviceProbe {
            registry: Arc::clone(&self.registry),
        }
    }
}

/// Observer handle onto a [`HeapDevice`]'s allocation registry.
pub struct DeviceProbe {
    registry: Arc<Mutex<Registry>>,
}

impl DeviceProbe {
    /// Number of buffers currently alive.
    pub fn live_buffers(&self) -> usize {
        self.registry.lock().unwrap().live.len()
    }

    /// Bytes currently alive across all buffers.
    pub fn live_bytes(&self) -> usize {
        self.registry
            .lock()
            .unwrap()
            .live
            .values()
            .map(|&(size, _)| size)
            .sum()
    }
}

impl Default for HeapDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceAllocator for HeapDevice {
    type Buffer = HeapBuffer;

    fn alloc_buffer(
        &mut self,
        size: usize,
        usage: MemoryUsage,
    ) -> Result<Self::Buffer, AllocError> {
        if let Some(remaining) = self.fail_after.as_mut() {
            if *remaining == 0 {
                return Err(AllocError::OutOfDeviceMemory {
                    requested: size,
                    usage,
                });
            }
            *remaining -= 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.total_allocated += size as u64;
        self.registry
            .lock()
            .unwrap()
            .live
            .insert(id, (size, usage));
        Ok(HeapBuffer {
            id,
            bytes: vec![0; size],
            registry: Arc::clone(&self.registry),
        })
    }
}
