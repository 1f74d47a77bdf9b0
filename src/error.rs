//! Fatal error type for [`crate::SlabContext`].
//!
//! `SlabError` covers every fatal failure mode: bad geometry at creation
//! time, a failed header allocation, an allocate/realloc call at the wrong
//! size. The one non-fatal path — failure to obtain a new block from the
//! system allocator — is not a variant here at all; `allocate` returns
//! `Ok(None)` for it instead, leaving exhaustion policy to the caller.
//! Integrity-check problems are likewise not `SlabError`s — see
//! [`crate::IntegrityWarning`].

use core::alloc::Layout;
use core::fmt;

use thiserror::Error;

/// A `Layout` wrapper with a `Display` impl matching the rest of this
/// enum's messages; `core::alloc::Layout` has no `Display` of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDisplay(pub Layout);

impl fmt::Display for LayoutDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes, align {}", self.0.size(), self.0.align())
    }
}

impl From<Layout> for LayoutDisplay {
    fn from(layout: Layout) -> Self {
        Self(layout)
    }
}

/// Fatal failures raised by [`crate::SlabContext`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SlabError {
    /// `block_size` cannot hold even a single chunk of `chunk_size`.
    #[error(
        "block size {block_size} is too small to hold a single {full_chunk_size}-byte chunk \
         (requested chunk_size {chunk_size})"
    )]
    BlockGeometryInvalid {
        block_size: usize,
        chunk_size: usize,
        full_chunk_size: usize,
    },

    /// The system allocator rejected the context-header allocation.
    #[error("failed to allocate slab context header ({layout})")]
    HeaderAllocFailed { layout: LayoutDisplay },

    /// `allocate` was called with a size other than the configured
    /// `chunk_size`.
    #[error(
        "allocate called with size {requested}, but this slab only hands out {expected}-byte chunks"
    )]
    UnexpectedAllocChunkSize { requested: usize, expected: usize },

    /// `realloc` was called with a size other than the current
    /// `chunk_size`.
    #[error(
        "realloc to {requested} bytes is unsupported; only the existing {expected}-byte size is a no-op"
    )]
    ReallocUnsupported { requested: usize, expected: usize },
}

/// Result alias for fallible [`crate::SlabContext`] operations.
pub type SlabResult<T> = Result<T, SlabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_error_message_names_all_three_sizes() {
        let err = SlabError::BlockGeometryInvalid {
            block_size: 8,
            chunk_size: 64,
            full_chunk_size: 96,
        };
        let text = err.to_string();
        assert!(text.contains('8'));
        assert!(text.contains("96"));
    }

    #[test]
    fn header_alloc_failed_displays_layout() {
        let layout = Layout::from_size_align(128, 8).unwrap();
        let err = SlabError::HeaderAllocFailed { layout: layout.into() };
        assert!(err.to_string().contains("128 bytes"));
    }
}
