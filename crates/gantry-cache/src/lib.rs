//! Eviction-ordering structures for tick-stamped resource caches.
//!
//! [`TickLruCache`] keeps cached objects in a doubly linked list ordered
//! by last-touched logical tick, so a frame-level sweep can enumerate
//! eviction candidates in O(cold items) instead of scanning the whole
//! cache. [`DelayedReleaseRing`] holds objects for a fixed number of
//! frames after they are unreferenced, for clients whose CPU-side
//! wrappers must outlive the last frame that recorded them.
//!
//! Neither structure owns a reclamation policy: the LRU only orders
//! candidates, and the ring only defers drops. Deciding *what* to evict
//! and releasing device memory stay with the caller.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod delay;
pub mod lru;

pub use delay::DelayedReleaseRing;
pub use lru::{ItemId, TickLruCache};
