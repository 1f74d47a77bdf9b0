//! The slab context: geometry, the free-bucket index, and the public
//! allocate/free/reset/delete/query operations (§4 of the design this
//! crate implements).

use std::alloc::{alloc, dealloc, Layout};
use std::cell::RefCell;
use std::mem;
use std::ptr::NonNull;

use intrusive_collections::{LinkedList, UnsafeRef};

use crate::allocator::{
    AllocError, AllocErrorKind, AllocResult, AllocatorStats, MemoryUsage, OptionalStats,
    Resettable, StatisticsProvider,
};
use crate::block::{self, BlockAdapter, BlockHeader};
use crate::check::{self, BlockCheckInput, IntegrityWarning};
use crate::chunk::{self, ChunkHeader};
use crate::config::{SlabConfig, MIN_CHUNK_SIZE};
use crate::error::{SlabError, SlabResult};
use crate::hooks::{DebugHooks, NoopHooks};
use crate::stats::SlabStats;

/// Computes `(full_chunk_size, chunks_per_block)` for a `(block_size,
/// chunk_size)` pair, or the geometry error `create`/`SlabConfig::validate`
/// would raise for it.
pub(crate) fn geometry(block_size: usize, chunk_size: usize) -> SlabResult<(usize, u32)> {
    let full_chunk_size = ChunkHeader::padded_size() + chunk::max_align(chunk_size);
    let chunks_per_block = block_size
        .checked_sub(block::header_size())
        .map(|usable| usable / full_chunk_size)
        .unwrap_or(0);

    if chunks_per_block == 0 {
        return Err(SlabError::BlockGeometryInvalid {
            block_size,
            chunk_size,
            full_chunk_size,
        });
    }

    Ok((full_chunk_size, chunks_per_block as u32))
}

/// As [`geometry`], discarding the computed sizes — used by
/// [`SlabConfig::validate`].
pub(crate) fn check_geometry(block_size: usize, chunk_size: usize) -> SlabResult<()> {
    geometry(block_size, chunk_size).map(|_| ())
}

/// Mutable state behind a [`RefCell`], so every public operation can take
/// `&self` (matching the ambient `Allocator` trait family's signatures)
/// despite the context being single-owner, single-threaded. Nothing here
/// is `Sync`: `LinkedList<BlockAdapter>` holds raw intrusive pointers, so
/// `SlabContext` is correctly `!Sync` (and `!Send`) without any explicit
/// opt-out.
struct Inner {
    min_free_chunks: u32,
    nblocks: usize,
    mem_allocated: usize,
    buckets: Vec<LinkedList<BlockAdapter>>,
    /// Scratch bitmap reused by `check()`, sized `chunks_per_block`.
    scratch: Vec<bool>,
}

/// A fixed-size-chunk slab memory context.
///
/// Hands out and reclaims objects of exactly one byte size (`chunk_size`),
/// backed by blocks obtained from the system allocator and carved into
/// equal chunk slots. See the crate's design documentation for the full
/// allocation/free algorithm; in brief, blocks are filed into
/// `chunks_per_block + 1` buckets by free-chunk count, `allocate` always
/// draws from the fullest non-full bucket, and a block is returned to the
/// system allocator the instant it becomes completely empty.
pub struct SlabContext {
    name: &'static str,
    chunk_size: usize,
    full_chunk_size: usize,
    block_size: usize,
    chunks_per_block: u32,
    /// Byte size of this context's own header allocation (bucket index +
    /// debug scratch bitmap), tracked for `stats()` the way PostgreSQL's
    /// `SlabContext.headerSize` is.
    header_size: usize,
    config: SlabConfig,
    hooks: Box<dyn DebugHooks>,
    stats: OptionalStats,
    inner: RefCell<Inner>,
}

#[cfg(feature = "debug-hooks")]
fn default_hooks() -> Box<dyn DebugHooks> {
    Box::new(crate::hooks::RealHooks)
}

#[cfg(not(feature = "debug-hooks"))]
fn default_hooks() -> Box<dyn DebugHooks> {
    Box::new(NoopHooks)
}

impl SlabContext {
    /// Creates a new slab context handing out `chunk_size`-byte chunks,
    /// backed by `config.block_size`-byte blocks.
    ///
    /// `chunk_size` is silently raised to [`MIN_CHUNK_SIZE`] if smaller, so
    /// the in-place free-list link always fits in a free chunk's payload.
    pub fn create(name: &'static str, chunk_size: usize, config: SlabConfig) -> SlabResult<Self> {
        let chunk_size = chunk_size.max(MIN_CHUNK_SIZE);
        let (full_chunk_size, chunks_per_block) = geometry(config.block_size, chunk_size)?;
        let nbuckets = chunks_per_block as usize + 1;

        let mut buckets: Vec<LinkedList<BlockAdapter>> = Vec::new();
        buckets.try_reserve_exact(nbuckets).map_err(|_| {
            SlabError::HeaderAllocFailed {
                layout: Layout::array::<LinkedList<BlockAdapter>>(nbuckets)
                    .unwrap_or_else(|_| Layout::new::<()>())
                    .into(),
            }
        })?;
        buckets.extend((0..nbuckets).map(|_| LinkedList::new(BlockAdapter::new())));

        let mut scratch: Vec<bool> = Vec::new();
        scratch
            .try_reserve_exact(chunks_per_block as usize)
            .map_err(|_| SlabError::HeaderAllocFailed {
                layout: Layout::array::<bool>(chunks_per_block as usize)
                    .unwrap_or_else(|_| Layout::new::<()>())
                    .into(),
            })?;
        scratch.resize(chunks_per_block as usize, false);

        let header_size = mem::size_of::<Self>()
            + nbuckets * mem::size_of::<LinkedList<BlockAdapter>>()
            + chunks_per_block as usize;

        #[cfg(feature = "logging")]
        tracing::debug!(
            name,
            chunk_size,
            block_size = config.block_size,
            full_chunk_size,
            chunks_per_block,
            "creating slab context"
        );

        Ok(Self {
            name,
            chunk_size,
            full_chunk_size,
            block_size: config.block_size,
            chunks_per_block,
            header_size,
            stats: if config.track_stats {
                OptionalStats::enabled()
            } else {
                OptionalStats::disabled()
            },
            hooks: default_hooks(),
            config,
            inner: RefCell::new(Inner {
                min_free_chunks: 0,
                nblocks: 0,
                mem_allocated: 0,
                buckets,
                scratch,
            }),
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[inline]
    #[must_use]
    pub fn full_chunk_size(&self) -> usize {
        self.full_chunk_size
    }

    #[inline]
    #[must_use]
    pub fn chunks_per_block(&self) -> u32 {
        self.chunks_per_block
    }

    fn owner_ptr(&self) -> NonNull<u8> {
        NonNull::from(self).cast()
    }

    fn block_align(&self) -> usize {
        chunk::MAX_ALIGN.max(mem::align_of::<BlockHeader>())
    }

    fn block_layout(&self) -> Layout {
        Layout::from_size_align(self.block_size, self.block_align())
            .expect("block_size/alignment validated at create()")
    }

    /// Byte slack between a chunk's live region and the end of its slot,
    /// or `None` if the chunk fills its slot exactly.
    fn sentinel_offset(&self) -> Option<usize> {
        let slack = self.full_chunk_size - ChunkHeader::padded_size() - self.chunk_size;
        (slack > 0).then_some(self.chunk_size)
    }

    /// Scans buckets `1..=chunks_per_block` for the smallest non-empty one.
    ///
    /// Bucket `chunks_per_block` is expected to always be empty (a
    /// fully-empty block is reclaimed immediately) — the scan still
    /// includes it and coerces a hit there back to 0 as defense in depth,
    /// in case that invariant is ever violated.
    fn rescan_min_free(buckets: &[LinkedList<BlockAdapter>], chunks_per_block: u32) -> u32 {
        for k in 1..=chunks_per_block {
            if !buckets[k as usize].is_empty() {
                debug_assert_ne!(
                    k, chunks_per_block,
                    "a fully-empty block should have been reclaimed eagerly"
                );
                return k;
            }
        }
        0
    }

    /// Obtains a chunk of `size` bytes, which must equal [`Self::chunk_size`].
    ///
    /// Returns `Ok(None)` (non-fatal) if the system allocator cannot supply
    /// a new block when one is needed; every other failure is fatal and
    /// returned as `Err`.
    pub fn allocate(&self, size: usize) -> SlabResult<Option<NonNull<u8>>> {
        if size != self.chunk_size {
            return Err(SlabError::UnexpectedAllocChunkSize {
                requested: size,
                expected: self.chunk_size,
            });
        }

        let mut inner = self.inner.borrow_mut();

        if inner.min_free_chunks == 0 {
            let block_mem = unsafe { alloc(self.block_layout()) };
            let Some(block_mem) = NonNull::new(block_mem) else {
                return Ok(None);
            };
            let block = block_mem.cast::<BlockHeader>();
            let owner = self.owner_ptr();
            unsafe { block::init(block, self.chunks_per_block, self.full_chunk_size, owner) };

            inner.nblocks += 1;
            inner.mem_allocated += self.block_size;
            inner.buckets[self.chunks_per_block as usize]
                .push_front(unsafe { UnsafeRef::from_raw(block.as_ptr()) });
            inner.min_free_chunks = self.chunks_per_block;

            #[cfg(feature = "logging")]
            tracing::trace!(
                context = self.name,
                nblocks = inner.nblocks,
                "acquired new block"
            );
        }

        let bucket_idx = inner.min_free_chunks as usize;
        let block = {
            let mut cursor = inner.buckets[bucket_idx].front_mut();
            let removed = cursor
                .remove()
                .expect("min_free_chunks names a non-empty bucket");
            NonNull::from(&*removed)
        };

        let idx = unsafe { block::pop_free(block, self.full_chunk_size) };
        let nfree = unsafe { (*block.as_ptr()).nfree };
        inner.buckets[nfree as usize].push_front(unsafe { UnsafeRef::from_raw(block.as_ptr()) });
        inner.min_free_chunks = if nfree == 0 {
            Self::rescan_min_free(&inner.buckets, self.chunks_per_block)
        } else {
            nfree
        };
        drop(inner);

        let slot = unsafe { block::slot_ptr(block, idx, self.full_chunk_size) };
        let header_ptr = slot.cast::<ChunkHeader>();
        unsafe { ChunkHeader::write(header_ptr, block) };

        let payload = unsafe { block::payload_ptr(block, idx, self.full_chunk_size) };

        if self.config.sentinel_past_end {
            if let Some(offset) = self.sentinel_offset() {
                let at = unsafe { NonNull::new_unchecked(payload.as_ptr().add(offset)) };
                unsafe { self.hooks.set_sentinel(at) };
            }
        }
        if self.config.mark_undefined_on_alloc {
            unsafe { self.hooks.mark_undefined(payload, self.chunk_size) };
        }

        self.stats.record_allocation(self.chunk_size);

        Ok(Some(payload))
    }

    /// Returns a chunk previously obtained from [`Self::allocate`] on this
    /// context.
    ///
    /// # Safety
    /// `ptr` must be a payload pointer returned by a prior `allocate` call
    /// on this same context, not already freed.
    pub unsafe fn free(&self, ptr: NonNull<u8>) {
        let header_ptr = unsafe {
            NonNull::new_unchecked(ptr.as_ptr().sub(ChunkHeader::padded_size()))
        }
        .cast::<ChunkHeader>();

        if self.config.sentinel_past_end {
            if let Some(offset) = self.sentinel_offset() {
                let at = unsafe { NonNull::new_unchecked(ptr.as_ptr().add(offset)) };
                if !unsafe { self.hooks.check_sentinel(at) } {
                    #[cfg(feature = "logging")]
                    tracing::warn!(context = self.name, "chunk past-end sentinel corrupted");
                }
            }
        }

        let block = unsafe { ChunkHeader::block_of(header_ptr) };
        let idx = unsafe {
            let offset = header_ptr.as_ptr().cast::<u8>().offset_from(block.as_ptr().cast::<u8>());
            (offset as usize - block::header_size()) / self.full_chunk_size
        } as u32;

        if self.config.wipe_on_free {
            unsafe { self.hooks.wipe_on_free(ptr, self.chunk_size) };
        }

        let mut inner = self.inner.borrow_mut();
        let old_nfree = unsafe { (*block.as_ptr()).nfree };

        unsafe {
            let mut cursor = inner.buckets[old_nfree as usize].cursor_mut_from_ptr(block.as_ptr());
            cursor.remove();
        }
        unsafe { block::push_free(block, idx, self.full_chunk_size) };
        let new_nfree = old_nfree + 1;

        let needs_rescan = inner.min_free_chunks == old_nfree;

        if new_nfree == self.chunks_per_block {
            let layout = self.block_layout();
            unsafe { dealloc(block.as_ptr().cast(), layout) };
            inner.nblocks -= 1;
            inner.mem_allocated -= self.block_size;
            #[cfg(feature = "logging")]
            tracing::trace!(
                context = self.name,
                nblocks = inner.nblocks,
                "reclaimed empty block"
            );
        } else {
            inner.buckets[new_nfree as usize]
                .push_front(unsafe { UnsafeRef::from_raw(block.as_ptr()) });
        }

        if needs_rescan {
            inner.min_free_chunks = Self::rescan_min_free(&inner.buckets, self.chunks_per_block);
        }

        self.stats.record_deallocation(self.chunk_size);
    }

    /// Same-size pass-through reallocation; any other size is an error.
    pub fn realloc(&self, ptr: NonNull<u8>, new_size: usize) -> SlabResult<NonNull<u8>> {
        if new_size == self.chunk_size {
            Ok(ptr)
        } else {
            Err(SlabError::ReallocUnsupported {
                requested: new_size,
                expected: self.chunk_size,
            })
        }
    }

    /// Recovers the owning context of a live chunk from its payload pointer.
    ///
    /// # Safety
    /// `ptr` must be a payload pointer returned by some `SlabContext::allocate`,
    /// not yet freed.
    #[must_use]
    pub unsafe fn get_chunk_context(ptr: NonNull<u8>) -> NonNull<SlabContext> {
        let header_ptr = unsafe {
            NonNull::new_unchecked(ptr.as_ptr().sub(ChunkHeader::padded_size()))
        }
        .cast::<ChunkHeader>();
        let block = unsafe { ChunkHeader::block_of(header_ptr) };
        unsafe { (*block.as_ptr()).owner.cast() }
    }

    /// The true per-chunk byte cost (header plus max-aligned payload).
    ///
    /// # Safety
    /// Same as [`Self::get_chunk_context`].
    #[must_use]
    pub unsafe fn get_chunk_space(ptr: NonNull<u8>) -> usize {
        let ctx = unsafe { Self::get_chunk_context(ptr) };
        unsafe { (*ctx.as_ptr()).full_chunk_size }
    }

    /// Whether this context currently holds zero blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().nblocks == 0
    }

    /// A point-in-time occupancy snapshot.
    #[must_use]
    pub fn stats(&self) -> SlabStats {
        let inner = self.inner.borrow();
        let mut free_bytes = 0usize;
        let mut free_chunks = 0usize;
        for (k, bucket) in inner.buckets.iter().enumerate() {
            let count = bucket.iter().count();
            free_chunks += count * k;
            free_bytes += count * k * self.full_chunk_size;
        }

        SlabStats {
            header_size: self.header_size,
            nblocks: inner.nblocks,
            total_bytes: self.header_size + inner.nblocks * self.block_size,
            free_bytes,
            free_chunks,
            chunk_size: self.chunk_size,
            full_chunk_size: self.full_chunk_size,
        }
    }

    /// Frees every block and resets bookkeeping to the just-created state.
    /// Does not free the context header itself. In debug builds, runs
    /// [`Self::check`] first and logs any warnings.
    pub fn reset(&self) {
        #[cfg(debug_assertions)]
        {
            for warning in self.check() {
                #[cfg(feature = "logging")]
                tracing::warn!(context = self.name, %warning, "integrity warning before reset");
            }
        }

        let mut inner = self.inner.borrow_mut();
        let layout = self.block_layout();

        for bucket in inner.buckets.iter_mut() {
            while let Some(removed) = bucket.front_mut().remove() {
                let block_ptr: NonNull<BlockHeader> = NonNull::from(&*removed);
                unsafe { dealloc(block_ptr.as_ptr().cast(), layout) };
            }
        }

        inner.min_free_chunks = 0;
        inner.nblocks = 0;
        inner.mem_allocated = 0;
    }

    /// Documented alias for dropping the context: performs `reset`, then
    /// releases the header (ordinary Rust field drop glue, since the
    /// bucket index and scratch bitmap are plain `Vec`s).
    pub fn delete(self) {}

    /// Runs the integrity check (§4.8): walks every block, reconstructs
    /// its free set from the in-place free list, and cross-checks it
    /// against the bucket index and each live chunk's back-pointer.
    /// Every problem found is a warning, never fatal, so this may safely
    /// run during error cleanup (e.g. from [`Self::reset`]).
    pub fn check(&self) -> Vec<IntegrityWarning> {
        let mut inner = self.inner.borrow_mut();
        let mut warnings = Vec::new();
        let owner = self.owner_ptr();
        let sentinel_offset = self.config.sentinel_past_end.then(|| self.sentinel_offset()).flatten();
        let chunks_per_block = self.chunks_per_block;
        let full_chunk_size = self.full_chunk_size;

        let Inner { buckets, scratch, nblocks, mem_allocated, .. } = &mut *inner;

        for (k, bucket) in buckets.iter().enumerate() {
            for block_ref in bucket.iter() {
                let input = BlockCheckInput {
                    block: NonNull::from(block_ref),
                    bucket: k as u32,
                    chunks_per_block,
                    full_chunk_size,
                    owner,
                    sentinel_offset,
                    hooks: self.hooks.as_ref(),
                };
                unsafe { check::check_block(&input, scratch, &mut warnings) };
            }
        }

        if *nblocks * self.block_size != *mem_allocated {
            warnings.push(IntegrityWarning::AccountingMismatch {
                nblocks: *nblocks,
                block_size: self.block_size,
                mem_allocated: *mem_allocated,
            });
        }

        for warning in &warnings {
            #[cfg(feature = "logging")]
            tracing::warn!(context = self.name, %warning, "slab integrity check");
        }

        warnings
    }
}

impl Drop for SlabContext {
    fn drop(&mut self) {
        self.reset();
    }
}

impl From<SlabError> for AllocError {
    fn from(err: SlabError) -> Self {
        match err {
            SlabError::BlockGeometryInvalid { .. } | SlabError::HeaderAllocFailed { .. } => {
                AllocError::new_with_kind(AllocErrorKind::OutOfMemory)
            }
            SlabError::UnexpectedAllocChunkSize { .. } | SlabError::ReallocUnsupported { .. } => {
                AllocError::new_with_kind(AllocErrorKind::InvalidLayout)
            }
        }
    }
}

// SAFETY: `allocate`/`deallocate` forward to the inherent `allocate`/`free`
// methods, which satisfy the same contract (pointer previously returned by
// this context's `allocate`, matching layout).
unsafe impl crate::allocator::Allocator for SlabContext {
    unsafe fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        if layout.align() > chunk::MAX_ALIGN {
            return Err(AllocError::with_kind_and_layout(AllocErrorKind::InvalidAlignment, layout));
        }
        match self.allocate(layout.size()) {
            Ok(Some(ptr)) => Ok(NonNull::slice_from_raw_parts(ptr, self.chunk_size)),
            Ok(None) => Err(AllocError::with_kind_and_layout(AllocErrorKind::OutOfMemory, layout)),
            Err(err) => Err(err.into()),
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, _layout: Layout) {
        unsafe { self.free(ptr) };
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        _old_layout: Layout,
        new_layout: Layout,
    ) -> AllocResult<NonNull<[u8]>> {
        match self.realloc(ptr, new_layout.size()) {
            Ok(p) => Ok(NonNull::slice_from_raw_parts(p, self.chunk_size)),
            Err(err) => Err(err.into()),
        }
    }

    fn supports_zero_sized_allocs() -> bool {
        false
    }
}

impl MemoryUsage for SlabContext {
    fn used_memory(&self) -> usize {
        self.inner.borrow().mem_allocated
    }

    fn available_memory(&self) -> Option<usize> {
        None
    }
}

impl Resettable for SlabContext {
    unsafe fn reset(&self) {
        self.reset();
    }
}

impl StatisticsProvider for SlabContext {
    fn statistics(&self) -> AllocatorStats {
        self.stats.snapshot().unwrap_or_default()
    }

    fn reset_statistics(&self) {
        self.stats.reset();
    }

    fn statistics_enabled(&self) -> bool {
        self.stats.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_config() -> SlabConfig {
        // chunk_size 16 => full_chunk_size = padded_size + 16; pick a
        // block_size yielding chunks_per_block == 4, matching §8's scenarios.
        let full = ChunkHeader::padded_size() + chunk::max_align(16);
        SlabConfig::new(block::header_size() + 4 * full)
    }

    #[test]
    fn allocate_then_free_one_returns_to_empty() {
        let ctx = SlabContext::create("test", 16, tiny_config()).unwrap();
        let p1 = ctx.allocate(16).unwrap().unwrap();
        assert_eq!(ctx.stats().nblocks, 1);

        unsafe { ctx.free(p1) };
        assert!(ctx.is_empty());
        assert_eq!(ctx.stats().total_bytes, ctx.stats().header_size);
    }

    #[test]
    fn fill_one_block_then_spill_into_second() {
        let ctx = SlabContext::create("test", 16, tiny_config()).unwrap();
        let mut ptrs = Vec::new();
        for _ in 0..4 {
            ptrs.push(ctx.allocate(16).unwrap().unwrap());
        }
        assert_eq!(ctx.stats().nblocks, 1);

        ptrs.push(ctx.allocate(16).unwrap().unwrap());
        assert_eq!(ctx.stats().nblocks, 2);

        for p in ptrs {
            unsafe { ctx.free(p) };
        }
        assert!(ctx.is_empty());
    }

    #[test]
    fn eager_reclaim_on_full_drain() {
        let ctx = SlabContext::create("test", 16, tiny_config()).unwrap();
        let ptrs: Vec<_> = (0..4).map(|_| ctx.allocate(16).unwrap().unwrap()).collect();
        assert_eq!(ctx.stats().nblocks, 1);

        for p in ptrs.into_iter().rev() {
            unsafe { ctx.free(p) };
        }
        assert_eq!(ctx.stats().nblocks, 0);
        assert_eq!(ctx.stats().total_bytes, ctx.stats().header_size);
    }

    #[test]
    fn wrong_size_allocate_is_fatal_and_leaves_state_unchanged() {
        let ctx = SlabContext::create("test", 16, tiny_config()).unwrap();
        let before = ctx.stats();
        let err = ctx.allocate(15).unwrap_err();
        assert!(matches!(err, SlabError::UnexpectedAllocChunkSize { requested: 15, expected: 16 }));
        assert_eq!(ctx.stats(), before);
    }

    #[test]
    fn realloc_same_size_is_noop_other_sizes_fail() {
        let ctx = SlabContext::create("test", 16, tiny_config()).unwrap();
        let p = ctx.allocate(16).unwrap().unwrap();
        assert_eq!(ctx.realloc(p, 16).unwrap(), p);
        assert!(ctx.realloc(p, 32).is_err());
        unsafe { ctx.free(p) };
    }

    #[test]
    fn check_reports_no_warnings_after_stress() {
        let ctx = SlabContext::create("test", 16, tiny_config()).unwrap();
        let mut live = Vec::new();
        let mut toggle = false;
        for _ in 0..200 {
            if toggle && !live.is_empty() {
                let p = live.remove(0);
                unsafe { ctx.free(p) };
            } else {
                live.push(ctx.allocate(16).unwrap().unwrap());
            }
            toggle = !toggle;
        }
        assert!(ctx.check().is_empty());
        for p in live {
            unsafe { ctx.free(p) };
        }
    }

    #[test]
    fn get_chunk_context_and_space_roundtrip() {
        let ctx = SlabContext::create("test", 16, tiny_config()).unwrap();
        let p = ctx.allocate(16).unwrap().unwrap();
        let recovered = unsafe { SlabContext::get_chunk_context(p) };
        assert_eq!(recovered.as_ptr(), &ctx as *const _ as *mut _);
        assert_eq!(unsafe { SlabContext::get_chunk_space(p) }, ctx.full_chunk_size());
        unsafe { ctx.free(p) };
    }
}
