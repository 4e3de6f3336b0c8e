//! Pluggable allocator interface.
//!
//! The standard `Allocator` trait is still unstable, so the arena defines
//! its own minimal equivalent. Every array carries two instances: one for
//! node tables and one for the contiguous leaf buffer.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::error::Error;
use std::fmt;
use std::ptr::NonNull;

/// The allocator refused a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "memory allocation failed")
    }
}

impl Error for AllocError {}

/// Source of raw memory for array blocks.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - a successful [`allocate`](ArrayAllocator::allocate) returns memory
///   valid for reads and writes of `layout.size()` bytes, aligned to
///   `layout.align()`, and not aliased by any other live allocation;
/// - memory stays valid until [`deallocate`](ArrayAllocator::deallocate)
///   is called on it through this allocator or any clone of it;
/// - clones are interchangeable: a block allocated by one clone may be
///   freed by another.
///
/// Callers never request zero-sized layouts.
pub unsafe trait ArrayAllocator: Clone {
    /// Allocate a block described by `layout`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator (or a
    /// clone) with the same `layout`, and must not have been freed yet.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process-wide allocator, via [`std::alloc`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

// SAFETY: delegates to `std::alloc`, which upholds the contract for
// non-zero layouts; zero-sized requests are refused rather than served.
unsafe impl ArrayAllocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError);
        }
        // SAFETY: `layout` has non-zero size.
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: per the caller contract, `ptr` came from `allocate` with
        // this `layout`.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}
