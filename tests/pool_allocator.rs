//! Scenario tests for the slab's bucket policy: blocks are drawn from the
//! fullest non-full bucket first, and the `Allocator` trait impl composes
//! with `TrackedAllocator` the same way any other allocator in this crate
//! does.

use nebula_slab::allocator::{Allocator, TrackedAllocator};
use nebula_slab::{SlabConfig, SlabContext};
use std::alloc::Layout;

fn slab_for(chunks_per_block_at_least: u32) -> SlabContext {
    // A block comfortably larger than needed so geometry stays predictable
    // across chunk-header layout changes.
    let block_size = 64 + (chunks_per_block_at_least as usize + 2) * 64;
    SlabContext::create("scenario", 32, SlabConfig::new(block_size)).unwrap()
}

#[test]
fn fullest_non_full_block_is_drawn_from_first() {
    let ctx = slab_for(4);
    let per_block = ctx.chunks_per_block();
    assert!(per_block >= 3, "test needs at least 3 chunks per block");

    // Build two blocks: one with 2 free chunks, one with 3 free chunks.
    let mut first_block: Vec<_> = (0..per_block).map(|_| ctx.allocate(32).unwrap().unwrap()).collect();
    let mut second_block: Vec<_> = (0..per_block).map(|_| ctx.allocate(32).unwrap().unwrap()).collect();
    assert_eq!(ctx.stats().nblocks, 2);

    // Free 2 chunks from the first block, 3 from the second, so buckets[2]
    // and buckets[3] each hold one block.
    for _ in 0..2 {
        unsafe { ctx.free(first_block.pop().unwrap()) };
    }
    for _ in 0..3 {
        unsafe { ctx.free(second_block.pop().unwrap()) };
    }

    let free_before = ctx.stats().free_chunks;

    // The next allocate must draw from the fullest non-full block (2 free,
    // not 3): total free chunks across both blocks drops by exactly one,
    // and no new block is created.
    let p = ctx.allocate(32).unwrap().unwrap();
    assert_eq!(ctx.stats().nblocks, 2);
    assert_eq!(ctx.stats().free_chunks, free_before - 1);

    unsafe { ctx.free(p) };
    for p in first_block.into_iter().chain(second_block) {
        unsafe { ctx.free(p) };
    }
    assert!(ctx.is_empty());
}

#[test]
fn slab_implements_the_ambient_allocator_trait() {
    let ctx = slab_for(2);
    let layout = Layout::from_size_align(32, 8).unwrap();

    unsafe {
        let ptr = Allocator::allocate(&ctx, layout).unwrap();
        assert_eq!(ptr.len(), 32);
        std::ptr::write_bytes(ptr.cast::<u8>().as_ptr(), 0xAB, 32);
        Allocator::deallocate(&ctx, ptr.cast(), layout);
    }
}

#[test]
fn tracked_allocator_counts_slab_allocations() {
    let ctx = slab_for(2);
    let tracked = TrackedAllocator::new(ctx);
    let layout = Layout::from_size_align(32, 8).unwrap();

    unsafe {
        let p1 = tracked.allocate(layout).unwrap();
        let p2 = tracked.allocate(layout).unwrap();
        assert_eq!(tracked.allocated_bytes(), 64);

        tracked.deallocate(p1.cast(), layout);
        assert_eq!(tracked.allocated_bytes(), 32);

        tracked.deallocate(p2.cast(), layout);
        assert_eq!(tracked.allocated_bytes(), 0);
    }
}

#[test]
fn misaligned_layout_is_rejected_by_the_allocator_impl() {
    let ctx = slab_for(2);
    // Alignment stronger than max-align is out of scope; the `Allocator`
    // impl must reject it rather than silently under-align.
    let layout = Layout::from_size_align(32, 4096).unwrap();
    let err = unsafe { Allocator::allocate(&ctx, layout) };
    assert!(err.is_err());
}
