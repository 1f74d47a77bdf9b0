//! A fixed-size-chunk slab allocator: a memory pool that hands out and
//! reclaims objects all of the same byte size, backed by larger
//! OS-allocated blocks carved into equal chunks.
//!
//! [`SlabContext`] is the allocator itself. It exploits the constant chunk
//! size to avoid size-class search, per-chunk size headers on the hot path,
//! and fragmentation within a block: `allocate` always draws from the
//! fullest non-full block (the smallest bucket with a free chunk), and a
//! block is returned to the system allocator the instant it becomes
//! completely empty (eager reclamation, no empty-block cache).
//!
//! ```
//! use nebula_slab::{SlabConfig, SlabContext};
//!
//! let ctx = SlabContext::create("example", 64, SlabConfig::default()).unwrap();
//! let p = ctx.allocate(64).unwrap().expect("system allocator has room");
//! unsafe { ctx.free(p) };
//! assert!(ctx.is_empty());
//! ```
//!
//! The [`allocator`] module hosts the ambient `Allocator`/`Resettable`/
//! `MemoryUsage`/`StatisticsProvider` trait family that [`SlabContext`]
//! implements, plus [`allocator::SystemAllocator`] and
//! [`allocator::TrackedAllocator`] so a slab composes with the rest of a
//! larger memory-context registry the same way any other allocator would.

pub mod allocator;
mod block;
mod check;
mod chunk;
mod config;
mod context;
mod error;
mod hooks;
mod stats;
pub mod utils;

pub use check::IntegrityWarning;
pub use config::{SlabConfig, MIN_CHUNK_SIZE};
pub use context::SlabContext;
pub use error::{SlabError, SlabResult};
pub use hooks::DebugHooks;
pub use stats::SlabStats;
