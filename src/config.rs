//! Configuration surface for [`crate::SlabContext`].
//!
//! A plain builder struct with named convenience constructors and a
//! `validate()` method, rather than a trait — there is exactly one
//! allocator kind in this crate, so a config trait would have no second
//! implementor.

use core::mem;

use crate::error::SlabError;

/// Minimum chunk size: large enough for the in-place free-list link word.
pub const MIN_CHUNK_SIZE: usize = mem::size_of::<u32>();

/// Tunables for a [`crate::SlabContext`].
///
/// The debug-hook toggles (`mark_undefined_on_alloc`, `wipe_on_free`,
/// `sentinel_past_end`) only take effect when this crate is built with the
/// `debug-hooks` feature; otherwise a no-op hook implementation is always
/// used regardless of these flags, and the flags are inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabConfig {
    /// Byte size of each block obtained from the system allocator.
    pub block_size: usize,
    /// Whether to collect the allocation/deallocation counters surfaced
    /// through [`crate::SlabContext::stats`].
    pub track_stats: bool,
    /// Mark a freshly returned chunk payload as undefined memory.
    pub mark_undefined_on_alloc: bool,
    /// Zero a chunk's payload (past the free-list link word) when freed.
    pub wipe_on_free: bool,
    /// Maintain and check a past-end sentinel byte for chunks narrower than
    /// their slot.
    pub sentinel_past_end: bool,
}

impl SlabConfig {
    /// A block size suitable for most chunk sizes: 64 KiB.
    pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

    /// A reasonably defaulted config for `chunk_size`-sized allocations,
    /// sized so the block holds at least a few dozen chunks when possible.
    #[must_use]
    pub const fn new(block_size: usize) -> Self {
        Self {
            block_size,
            track_stats: true,
            mark_undefined_on_alloc: true,
            wipe_on_free: true,
            sentinel_past_end: true,
        }
    }

    /// Convenience constructor sized so a block comfortably holds a few
    /// hundred `T`-shaped chunks.
    #[must_use]
    pub const fn for_type<T>() -> Self {
        let want = mem::size_of::<T>().max(MIN_CHUNK_SIZE) * 256;
        let block_size = if want < Self::DEFAULT_BLOCK_SIZE { Self::DEFAULT_BLOCK_SIZE } else { want };
        Self::new(block_size)
    }

    /// Disables every debug hook and statistics tracking, for latency- or
    /// allocation-sensitive callers that don't want the overhead even under
    /// the `debug-hooks` feature.
    #[must_use]
    pub const fn bare(block_size: usize) -> Self {
        Self {
            block_size,
            track_stats: false,
            mark_undefined_on_alloc: false,
            wipe_on_free: false,
            sentinel_past_end: false,
        }
    }

    #[must_use]
    pub const fn with_stats(mut self, track_stats: bool) -> Self {
        self.track_stats = track_stats;
        self
    }

    #[must_use]
    pub const fn with_wipe_on_free(mut self, wipe_on_free: bool) -> Self {
        self.wipe_on_free = wipe_on_free;
        self
    }

    #[must_use]
    pub const fn with_sentinel_past_end(mut self, sentinel_past_end: bool) -> Self {
        self.sentinel_past_end = sentinel_past_end;
        self
    }

    #[must_use]
    pub const fn with_mark_undefined_on_alloc(mut self, mark_undefined_on_alloc: bool) -> Self {
        self.mark_undefined_on_alloc = mark_undefined_on_alloc;
        self
    }

    /// Checks `block_size` against `chunk_size`'s geometry without
    /// constructing a context, surfacing the same error `SlabContext::create`
    /// would return for this pair.
    pub fn validate(&self, chunk_size: usize) -> Result<(), SlabError> {
        crate::context::check_geometry(self.block_size, chunk_size.max(MIN_CHUNK_SIZE))
    }
}

impl Default for SlabConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLOCK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_disables_everything_but_keeps_block_size() {
        let cfg = SlabConfig::bare(4096);
        assert_eq!(cfg.block_size, 4096);
        assert!(!cfg.track_stats);
        assert!(!cfg.wipe_on_free);
        assert!(!cfg.mark_undefined_on_alloc);
        assert!(!cfg.sentinel_past_end);
    }

    #[test]
    fn builder_methods_toggle_individual_flags() {
        let cfg = SlabConfig::default().with_stats(false).with_wipe_on_free(false);
        assert!(!cfg.track_stats);
        assert!(!cfg.wipe_on_free);
        assert!(cfg.mark_undefined_on_alloc);
        assert!(cfg.sentinel_past_end);
    }
}
