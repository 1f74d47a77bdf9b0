//! Point-in-time geometry/occupancy snapshot of a
//! [`crate::SlabContext`], as returned by its `stats()` method.
//!
//! Distinct from [`crate::allocator::AllocatorStats`] (a generic
//! allocation-counter struct, still used internally via `OptionalStats`
//! when [`crate::SlabConfig::track_stats`] is set): `SlabStats` describes
//! the slab's *current block/chunk layout*, the way PostgreSQL's
//! `SlabStats` output line does, not a running counter of calls made over
//! the context's lifetime.

use core::fmt;

/// A snapshot of block/chunk occupancy for one [`crate::SlabContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabStats {
    /// Byte size of the context header allocation (bucket index + debug
    /// scratch bitmap), tracked separately from block memory.
    pub header_size: usize,
    /// Number of live blocks.
    pub nblocks: usize,
    /// Total bytes currently held in blocks (`nblocks * block_size`).
    pub total_bytes: usize,
    /// Bytes across all blocks currently on a free list.
    pub free_bytes: usize,
    /// Number of individual chunks currently free across all blocks.
    pub free_chunks: usize,
    /// The configured chunk size.
    pub chunk_size: usize,
    /// The true per-slot stride (`sizeof(ChunkHeader) + max_align(chunk_size)`).
    pub full_chunk_size: usize,
}

impl SlabStats {
    /// Bytes currently handed out to callers (`total_bytes - free_bytes`).
    #[inline]
    #[must_use]
    pub const fn used_bytes(&self) -> usize {
        self.total_bytes.saturating_sub(self.free_bytes)
    }
}

impl fmt::Display for SlabStats {
    /// A single-line summary: `"N total in B blocks; F free (C chunks); U used"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total in {} blocks; {} free ({} chunks); {} used",
            self.total_bytes,
            self.nblocks,
            self.free_bytes,
            self.free_chunks,
            self.used_bytes()
        )
    }
}
