//! Core types and traits for the Gantry resource lifetime subsystem.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the tick abstraction that models CPU/GPU concurrency, the device
//! allocation seam, and the error types shared across the workspace.
//!
//! The central idea: the CPU never waits on the GPU. Every batch of
//! submitted GPU work is assigned a monotonically increasing [`Tick`],
//! and "is this batch finished" is a cheap, non-blocking query through
//! [`GpuClock`]. Allocators and caches built on top of these types
//! reclaim memory only once the stamped tick is observed complete.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod device;
pub mod error;
pub mod id;

// Public re-exports for the primary API surface.
pub use clock::GpuClock;
pub use device::{DeviceAllocator, MemoryUsage, StagingMemory};
pub use error::AllocError;
pub use id::Tick;
