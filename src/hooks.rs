//! Optional instrumentation services consulted at a handful of call sites
//! inside [`crate::SlabContext`].
//!
//! Mirrors the three debug-memory-checker services PostgreSQL's allocator
//! code calls unconditionally (compiled away by macros in C): marking newly
//! returned memory as undefined/no-access/defined (for a Valgrind-style
//! checker), wiping freed memory, and maintaining a past-end sentinel byte.
//! Here they are a trait with a zero-cost [`NoopHooks`] default; real bodies
//! live behind the `debug-hooks` Cargo feature so a plain test build never
//! silently diverges from a release build's behavior.

use core::ptr::NonNull;

/// Byte pattern written past the end of a chunk's live region when the
/// chunk is narrower than its slot, and checked again on free.
pub const SENTINEL_BYTE: u8 = 0x7E;

/// Byte pattern used to wipe a freed chunk's payload (skipping the
/// leading 4-byte free-list link word).
pub const WIPE_BYTE: u8 = 0x7F;

/// Instrumentation hook points invoked by [`crate::SlabContext`].
///
/// Every method receives a payload pointer and length already computed by
/// the caller — hooks never need to know block/chunk geometry themselves.
pub trait DebugHooks {
    /// Marks `len` bytes starting at `ptr` as undefined (uninitialized),
    /// called on every chunk handed out by `allocate`.
    ///
    /// # Safety
    /// `ptr` must be valid for `len` bytes.
    unsafe fn mark_undefined(&self, ptr: NonNull<u8>, len: usize);

    /// Marks `len` bytes as inaccessible, called on a block returned to the
    /// system allocator before the underlying memory is actually freed.
    ///
    /// # Safety
    /// `ptr` must be valid for `len` bytes.
    unsafe fn mark_noaccess(&self, ptr: NonNull<u8>, len: usize);

    /// Marks `len` bytes as defined, called when handing previously-freed
    /// memory back out (a block being reused after a `reset`).
    ///
    /// # Safety
    /// `ptr` must be valid for `len` bytes.
    unsafe fn mark_defined(&self, ptr: NonNull<u8>, len: usize);

    /// Wipes a freed chunk's payload in place, called from `free` before
    /// the chunk is pushed back onto its block's free list.
    ///
    /// `payload` points at the full chunk payload and `len` is its full
    /// length; implementations must skip the first 4 bytes (the in-place
    /// free-list link word that `free` writes immediately afterward).
    ///
    /// # Safety
    /// `payload` must be valid for `len` bytes and `len >= 4`.
    unsafe fn wipe_on_free(&self, payload: NonNull<u8>, len: usize);

    /// Writes the past-end sentinel byte just past a chunk's live region.
    ///
    /// # Safety
    /// `at` must be valid for one write.
    unsafe fn set_sentinel(&self, at: NonNull<u8>);

    /// Checks the past-end sentinel byte, returning `true` if intact.
    ///
    /// # Safety
    /// `at` must be valid for one read.
    unsafe fn check_sentinel(&self, at: NonNull<u8>) -> bool;
}

/// The default, zero-cost [`DebugHooks`] implementation: every method is a
/// no-op (or, for `check_sentinel`, unconditionally reports success).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl DebugHooks for NoopHooks {
    #[inline(always)]
    unsafe fn mark_undefined(&self, _ptr: NonNull<u8>, _len: usize) {}

    #[inline(always)]
    unsafe fn mark_noaccess(&self, _ptr: NonNull<u8>, _len: usize) {}

    #[inline(always)]
    unsafe fn mark_defined(&self, _ptr: NonNull<u8>, _len: usize) {}

    #[inline(always)]
    unsafe fn wipe_on_free(&self, _payload: NonNull<u8>, _len: usize) {}

    #[inline(always)]
    unsafe fn set_sentinel(&self, _at: NonNull<u8>) {}

    #[inline(always)]
    unsafe fn check_sentinel(&self, _at: NonNull<u8>) -> bool {
        true
    }
}

/// Real hook bodies, enabled only under the `debug-hooks` Cargo feature.
///
/// Unlike [`NoopHooks`] this has observable side effects (zeroing memory,
/// writing a sentinel byte) but no effect on allocator *correctness* — a
/// build without this feature behaves identically modulo those side
/// effects. Every hook in this module must uphold that property.
#[cfg(feature = "debug-hooks")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RealHooks;

#[cfg(feature = "debug-hooks")]
impl DebugHooks for RealHooks {
    unsafe fn mark_undefined(&self, ptr: NonNull<u8>, len: usize) {
        unsafe { core::ptr::write_bytes(ptr.as_ptr(), 0xCD, len) };
    }

    unsafe fn mark_noaccess(&self, ptr: NonNull<u8>, len: usize) {
        unsafe { core::ptr::write_bytes(ptr.as_ptr(), 0xDE, len) };
    }

    unsafe fn mark_defined(&self, ptr: NonNull<u8>, len: usize) {
        unsafe { core::ptr::write_bytes(ptr.as_ptr(), 0, len) };
    }

    unsafe fn wipe_on_free(&self, payload: NonNull<u8>, len: usize) {
        if len <= 4 {
            return;
        }
        unsafe {
            core::ptr::write_bytes(payload.as_ptr().add(4), WIPE_BYTE, len - 4);
        }
    }

    unsafe fn set_sentinel(&self, at: NonNull<u8>) {
        unsafe { at.as_ptr().write(SENTINEL_BYTE) };
    }

    unsafe fn check_sentinel(&self, at: NonNull<u8>) -> bool {
        unsafe { at.as_ptr().read() == SENTINEL_BYTE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_hooks_check_sentinel_always_true() {
        let hooks = NoopHooks;
        let mut byte: u8 = 0;
        let ptr = NonNull::from(&mut byte);
        assert!(unsafe { hooks.check_sentinel(ptr) });
    }

    #[cfg(feature = "debug-hooks")]
    #[test]
    fn real_hooks_sentinel_roundtrips() {
        let hooks = RealHooks;
        let mut byte: u8 = 0;
        let ptr = NonNull::from(&mut byte);
        unsafe { hooks.set_sentinel(ptr) };
        assert!(unsafe { hooks.check_sentinel(ptr) });
    }

    #[cfg(feature = "debug-hooks")]
    #[test]
    fn real_hooks_wipe_skips_link_word() {
        let hooks = RealHooks;
        let mut buf = [0xAAu8; 16];
        let ptr = NonNull::new(buf.as_mut_ptr()).unwrap();
        unsafe { hooks.wipe_on_free(ptr, buf.len()) };
        assert_eq!(&buf[0..4], &[0xAA, 0xAA, 0xAA, 0xAA]);
        assert!(buf[4..].iter().all(|&b| b == WIPE_BYTE));
    }
}
