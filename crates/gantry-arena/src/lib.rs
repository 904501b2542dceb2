//! Slot arena: stable-index object pools for GPU-side resources.
//!
//! [`SlotArena`] is a packed pool that hands out stable [`SlotId`]
//! indices over a free-list-recycled backing store. Every cached
//! GPU-side object in the workspace (buffers, images, views, samplers)
//! lives in one of these pools, so "a resource" is always a small,
//! copyable id rather than a pointer.
//!
//! # Architecture
//!
//! ```text
//! SlotArena<T>
//! ├── slots:     Vec<Option<T>>   (index-stable cells)
//! ├── live_bits: Vec<u64>         (one bit per cell, word-packed)
//! └── free_list: Vec<u32>         (recycled indices, LIFO)
//! ```
//!
//! The liveness bitset is the source of truth for iteration: sweeps over
//! all live resources skip dead cells a word at a time with
//! `trailing_zeros`, which is the property frame-level "for all cached
//! objects" passes depend on.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod slot;

pub use arena::SlotArena;
pub use slot::SlotId;
