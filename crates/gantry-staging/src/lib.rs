//! Staging buffer allocation: transient CPU→GPU upload memory that is
//! recycled only after proof of GPU completion.
//!
//! # Architecture
//!
//! ```text
//! StagingPool (facade: request / free_deferred / tick_frame)
//! ├── StreamRing (fixed ring carved into NUM_SYNCS regions,
//! │               each stamped with its last submission tick)
//! └── SizeClassBufferPool (power-of-two buckets of independent
//!     │                    buffers, entries stored in a SlotArena)
//!     └── bounded per-frame garbage collection, one level per frame
//! ```
//!
//! A request first tries to carve a slice from the ring; if the slice
//! would overlap a region whose stamped tick is not yet known complete,
//! the request falls back to the bucket pool instead of stalling. The
//! allocator never waits on the GPU: transient unavailability is always
//! resolved by the pooled path, and the only surfaced failure is device
//! memory exhaustion.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bucket;
pub mod config;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod pool;
pub mod ring;

pub use config::StagingConfig;
pub use error::StagingError;
pub use handle::{RefBacking, StagingRef};
pub use metrics::FrameMetrics;
pub use pool::StagingPool;
