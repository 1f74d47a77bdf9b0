//! Integrity checker (§4.8): a debug-oriented sweep over every block in a
//! [`crate::SlabContext`] that reconstructs the free set from the
//! in-place free list and cross-checks it against the bucket index.
//!
//! Every problem found is a warning, never a panic — this pass may run
//! during error cleanup (from `reset`/`delete`), so it must not itself
//! raise. Callers get the full set back as a `Vec` in addition to the
//! `tracing::warn!` side effect, so tests can assert on exact findings.

use core::ptr::NonNull;

use crate::block::{self, BlockHeader};
use crate::hooks::DebugHooks;

/// One integrity problem found by [`crate::SlabContext::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// A block's `nfree` did not match the bucket it was filed under.
    BucketMismatch { bucket: u32, actual_nfree: u32 },
    /// A block's back-pointer to its owning context did not match.
    OwnerMismatch,
    /// The in-place free list visited a chunk index more than once, or the
    /// visit count did not equal `nfree` on completion.
    FreeListMalformed { bucket: u32, visited: u32, expected: u32 },
    /// A live chunk's `ChunkHeader` back-pointer did not resolve to the
    /// block it is actually stored in.
    ChunkBackpointerMismatch { bucket: u32, index: u32 },
    /// A live chunk's `ChunkHeader` did not carry the slab's magic tag.
    ChunkTagInvalid { bucket: u32, index: u32 },
    /// A live chunk's past-end sentinel byte had been overwritten.
    SentinelCorrupted { bucket: u32, index: u32 },
    /// `nblocks * block_size != mem_allocated`.
    AccountingMismatch { nblocks: usize, block_size: usize, mem_allocated: usize },
}

impl core::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BucketMismatch { bucket, actual_nfree } => write!(
                f,
                "block filed in bucket {bucket} but its nfree is {actual_nfree}"
            ),
            Self::OwnerMismatch => write!(f, "block's owner back-pointer does not match this context"),
            Self::FreeListMalformed { bucket, visited, expected } => write!(
                f,
                "bucket {bucket} block's free list visited {visited} indices, expected {expected}"
            ),
            Self::ChunkBackpointerMismatch { bucket, index } => write!(
                f,
                "chunk {index} in bucket {bucket} block has a stale block back-pointer"
            ),
            Self::ChunkTagInvalid { bucket, index } => write!(
                f,
                "chunk {index} in bucket {bucket} block does not carry the slab's magic tag"
            ),
            Self::SentinelCorrupted { bucket, index } => {
                write!(f, "chunk {index} in bucket {bucket} block has a corrupted past-end sentinel")
            }
            Self::AccountingMismatch { nblocks, block_size, mem_allocated } => write!(
                f,
                "nblocks ({nblocks}) * block_size ({block_size}) != mem_allocated ({mem_allocated})"
            ),
        }
    }
}

/// Parameters the checker needs about one block, gathered by the caller
/// (normally [`crate::SlabContext::check`]) so this module stays
/// ignorant of `SlabContext`'s own layout.
pub(crate) struct BlockCheckInput<'a> {
    pub(crate) block: NonNull<BlockHeader>,
    pub(crate) bucket: u32,
    pub(crate) chunks_per_block: u32,
    pub(crate) full_chunk_size: usize,
    pub(crate) owner: NonNull<u8>,
    /// `Some(offset)` only when the context's `sentinel_past_end` config is
    /// on and the chunk has alignment slack; `None` means no sentinel was
    /// ever written and none should be expected on read.
    pub(crate) sentinel_offset: Option<usize>,
    pub(crate) hooks: &'a dyn DebugHooks,
}

/// Runs §4.8 steps 1-4 over a single block, pushing any findings into
/// `warnings`. The scratch slice must be at least `chunks_per_block` long
/// and is fully overwritten; its contents on return are unspecified.
///
/// # Safety
/// `input.block` must point at a live, correctly initialized block with
/// exactly `input.chunks_per_block` chunk slots, each `input.full_chunk_size`
/// bytes.
pub(crate) unsafe fn check_block(
    input: &BlockCheckInput<'_>,
    scratch: &mut [bool],
    warnings: &mut Vec<IntegrityWarning>,
) {
    let header = unsafe { &*input.block.as_ptr() };

    if header.nfree != input.bucket {
        warnings.push(IntegrityWarning::BucketMismatch {
            bucket: input.bucket,
            actual_nfree: header.nfree,
        });
    }
    if header.owner != input.owner {
        warnings.push(IntegrityWarning::OwnerMismatch);
    }

    for slot in scratch.iter_mut().take(input.chunks_per_block as usize) {
        *slot = false;
    }

    let mut visited = 0u32;
    unsafe {
        block::walk_free_list(
            input.block,
            input.chunks_per_block,
            input.full_chunk_size,
            |idx| {
                if (idx as usize) < scratch.len() {
                    scratch[idx as usize] = true;
                }
                visited += 1;
            },
        );
    }

    if visited != header.nfree {
        warnings.push(IntegrityWarning::FreeListMalformed {
            bucket: input.bucket,
            visited,
            expected: header.nfree,
        });
    }

    for idx in 0..input.chunks_per_block {
        if scratch[idx as usize] {
            continue; // free chunk, already accounted for above
        }

        let slot = unsafe { block::slot_ptr(input.block, idx, input.full_chunk_size) };
        let header_ptr = slot.cast::<crate::chunk::ChunkHeader>();
        let recovered = unsafe { crate::chunk::ChunkHeader::block_of(header_ptr) };
        if recovered != input.block {
            warnings.push(IntegrityWarning::ChunkBackpointerMismatch {
                bucket: input.bucket,
                index: idx,
            });
        }
        if !unsafe { crate::chunk::ChunkHeader::has_valid_tag(header_ptr) } {
            warnings.push(IntegrityWarning::ChunkTagInvalid {
                bucket: input.bucket,
                index: idx,
            });
        }

        if let Some(offset) = input.sentinel_offset {
            let payload = unsafe { block::payload_ptr(input.block, idx, input.full_chunk_size) };
            let sentinel_ptr = unsafe { NonNull::new_unchecked(payload.as_ptr().add(offset)) };
            if !unsafe { input.hooks.check_sentinel(sentinel_ptr) } {
                warnings.push(IntegrityWarning::SentinelCorrupted {
                    bucket: input.bucket,
                    index: idx,
                });
            }
        }
    }
}
