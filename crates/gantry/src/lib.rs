//! Gantry: stable handles for resources whose true lifetime belongs to
//! an asynchronous, out-of-order GPU.
//!
//! Three structures solve one problem — CPU code needs stable handles
//! to objects the GPU may still be reading — and every higher layer of
//! a renderer (buffer cache, texture cache, descriptor pool) is a thin
//! client of them:
//!
//! - [`arena::SlotArena`]: packed pools with stable indices and
//!   bit-scan iteration, the backing store for every cached GPU object.
//! - [`cache::TickLruCache`]: a tick-ordered list that enumerates
//!   eviction candidates in O(cold items).
//! - [`staging::StagingPool`]: ring-allocated upload memory with a
//!   size-class pool fallback, recycled only after proof of GPU
//!   completion.
//!
//! Concurrency with the GPU is modelled entirely through
//! [`types::GpuClock`]: a monotonic logical tick per submitted batch
//! and a non-blocking "is this tick complete" query. Nothing in this
//! workspace waits on the device.
//!
//! # Quick start
//!
//! ```rust
//! use gantry::prelude::*;
//! use std::sync::Arc;
//!
//! # use gantry_test_utils::{HeapDevice, ManualClock};
//! // A backend supplies a clock and a device allocator; tests use the
//! // manual implementations from `gantry-test-utils`.
//! let clock = Arc::new(ManualClock::new());
//! let config = StagingConfig {
//!     ring_capacity: 1 << 20,
//!     ..Default::default()
//! };
//! let mut context =
//!     ResourceContext::new(HeapDevice::new(), clock.clone(), config).unwrap();
//!
//! // Upload path: request transient memory, write through the span,
//! // record the copy, submit, tick the frame.
//! let staging = context
//!     .staging_mut()
//!     .request(4096, MemoryUsage::Upload, false)
//!     .unwrap();
//! context.staging_mut().span_of_mut(&staging)[..4].copy_from_slice(b"data");
//! clock.advance();
//! context.tick_frame();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gantry-core` | `Tick`, `GpuClock`, device traits, errors |
//! | [`arena`] | `gantry-arena` | `SlotId`, `SlotArena` |
//! | [`cache`] | `gantry-cache` | `TickLruCache`, `DelayedReleaseRing` |
//! | [`staging`] | `gantry-staging` | `StagingPool`, config, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Slot arenas (`gantry-arena`).
pub use gantry_arena as arena;

/// LRU and delayed-release structures (`gantry-cache`).
pub use gantry_cache as cache;

/// Core types and traits (`gantry-core`).
pub use gantry_core as types;

/// Staging buffer allocation (`gantry-staging`).
pub use gantry_staging as staging;

mod context;

pub use context::ResourceContext;

/// Commonly used types, re-exported for single-import convenience.
pub mod prelude {
    pub use crate::context::ResourceContext;
    pub use gantry_arena::{SlotArena, SlotId};
    pub use gantry_cache::{DelayedReleaseRing, ItemId, TickLruCache};
    pub use gantry_core::{
        AllocError, DeviceAllocator, GpuClock, MemoryUsage, StagingMemory, Tick,
    };
    pub use gantry_staging::{
        FrameMetrics, StagingConfig, StagingError, StagingPool, StagingRef,
    };
}
