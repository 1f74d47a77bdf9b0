//! Ambient allocator trait family and two concrete allocators.
//!
//! This module provides the `Allocator`/`Resettable`/`MemoryUsage`/
//! `StatisticsProvider` trait family plus [`SystemAllocator`] (a thin
//! wrapper over the platform allocator) and [`TrackedAllocator`] (a
//! statistics-collecting wrapper around any other `Allocator`). The slab
//! allocator itself ([`crate::SlabContext`]) implements the same trait
//! family, so it composes with `TrackedAllocator` like any other allocator
//! here.

mod error;
mod stats;
mod system;
mod tracked;
mod traits;

pub use error::{AllocError, AllocErrorKind, AllocResult};
pub use stats::{AllocatorStats, AtomicAllocatorStats, OptionalStats, StatisticsProvider};
pub use system::SystemAllocator;
pub use tracked::TrackedAllocator;
pub use traits::{
    Allocator, BasicMemoryUsage, BulkAllocator, MemoryUsage, Resettable, ThreadSafeAllocator,
    TypedAllocExt,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_allocator_reports_no_fixed_capacity() {
        let sys = SystemAllocator::new();
        assert_eq!(sys.available_memory(), None);
    }
}
