//! # heapcore
//!
//! An explicit free-list dynamic storage allocator over a single,
//! linearly-growable byte region.
//!
//! ```text
//! Allocator<R: HeapRegion>
//!   │
//!   ├── allocate/free/reallocate  (public facade, src/allocator.rs)
//!   │     │
//!   │     ├── Placement Engine    (src/placement.rs)  first-fit + split
//!   │     ├── Coalescer           (src/coalesce.rs)    4-case merge
//!   │     └── Free List           (src/free_list.rs)   embedded doubly-linked LIFO
//!   │
//!   └── Block Layout              (src/block.rs)  header/footer/link packing
//!
//! HeapRegion (trait, src/region.rs) ── GrowableRegion (std reference impl)
//! ```
//!
//! The heap region is a contiguous byte range bracketed by a prologue and an
//! epilogue sentinel block, both always "allocated", so the coalescer never
//! needs a bounds check at either end. Every block carries a boundary tag
//! (matching header and footer words); free blocks additionally carry their
//! free-list links in the first bytes of their own payload, so the list costs
//! nothing beyond the blocks it threads through.
//!
//! Offsets into the region are plain `usize` byte indices rather than native
//! pointers, so the allocator never aliases a raw pointer against the
//! `&mut [u8]` borrow obtained from its [`HeapRegion`].
#![cfg_attr(not(feature = "std"), no_std)]

mod block;
mod coalesce;
mod free_list;
mod placement;

pub mod allocator;
pub mod config;
pub mod error;
pub mod region;

#[cfg(feature = "checked")]
pub mod debug_invariants;

pub use allocator::Allocator;
pub use config::HeapConfig;
pub use error::AllocError;
pub use region::HeapRegion;

#[cfg(feature = "std")]
pub use region::GrowableRegion;
