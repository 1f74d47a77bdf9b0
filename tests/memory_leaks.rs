//! Leak-oriented integration tests: eager block reclamation, `reset`, and
//! `Drop` must all return every byte the slab obtained from the system
//! allocator.

use nebula_slab::{SlabConfig, SlabContext};

fn slab() -> SlabContext {
    SlabContext::create("leaks", 32, SlabConfig::new(512)).unwrap()
}

#[test]
fn eager_reclaim_returns_block_the_instant_it_empties() {
    let ctx = slab();
    let per_block = ctx.chunks_per_block() as usize;

    let ptrs: Vec<_> = (0..per_block).map(|_| ctx.allocate(32).unwrap().unwrap()).collect();
    assert_eq!(ctx.stats().nblocks, 1);

    for (i, p) in ptrs.into_iter().rev().enumerate() {
        unsafe { ctx.free(p) };
        if i + 1 < per_block {
            assert_eq!(ctx.stats().nblocks, 1, "block reclaimed too early");
        }
    }

    assert_eq!(ctx.stats().nblocks, 0);
    assert_eq!(ctx.stats().total_bytes, ctx.stats().header_size);
}

#[test]
fn no_fully_empty_block_is_ever_observable() {
    // After every free, either the block still holds a live chunk, or it
    // was returned to the system allocator — never left sitting at 100%
    // free.
    let ctx = slab();
    let per_block = ctx.chunks_per_block() as usize;
    let mut live = Vec::new();

    for round in 0..50 {
        if round % 3 == 0 && !live.is_empty() {
            let p = live.remove(0);
            unsafe { ctx.free(p) };
        } else {
            live.push(ctx.allocate(32).unwrap().unwrap());
        }
        let stats = ctx.stats();
        if stats.nblocks > 0 {
            assert!(stats.free_chunks < stats.nblocks * per_block);
        }
    }

    for p in live {
        unsafe { ctx.free(p) };
    }
    assert!(ctx.is_empty());
}

#[test]
fn reset_frees_every_block_without_freeing_the_context() {
    let ctx = slab();
    for _ in 0..ctx.chunks_per_block() * 3 {
        ctx.allocate(32).unwrap().unwrap();
    }
    assert!(ctx.stats().nblocks > 0);

    ctx.reset();

    assert!(ctx.is_empty());
    assert_eq!(ctx.stats().total_bytes, ctx.stats().header_size);

    // the context itself is still usable after reset
    let p = ctx.allocate(32).unwrap().unwrap();
    unsafe { ctx.free(p) };
}

#[test]
fn drop_releases_all_outstanding_blocks() {
    {
        let ctx = slab();
        for _ in 0..ctx.chunks_per_block() * 5 {
            ctx.allocate(32).unwrap().unwrap();
        }
        assert!(ctx.stats().nblocks > 0);
        // ctx drops here; Drop::drop calls reset(), which must free every
        // block it still holds. If it leaked, ASan/Miri would flag it.
    }
}

#[test]
fn repeated_alloc_free_cycles_never_grow_unboundedly() {
    let ctx = slab();
    for _ in 0..10_000 {
        let p = ctx.allocate(32).unwrap().unwrap();
        unsafe { ctx.free(p) };
    }
    assert!(ctx.is_empty());
    assert_eq!(ctx.stats().total_bytes, ctx.stats().header_size);
}
