//! Low-level primitives for arena memory operations.
//!
//! [`Block`] is the one place the workspace touches uninitialised memory.
//! It pairs a typed allocation with the allocator that produced it, fills
//! it through a guard that unwinds a partially built prefix, and destroys
//! elements in reverse index order before freeing. Every `unsafe`
//! operation carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use std::alloc::{handle_alloc_error, Layout};
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::{fmt, slice};

use vla_core::{ArrayError, MAX_SIZE};

use crate::alloc::ArrayAllocator;

/// An owned, contiguous, typed allocation.
///
/// The first `len` slots are initialised. `cap` is the allocated slot
/// count; it only differs from `len` when an iterator ran dry during
/// [`Block::try_from_iter`].
pub struct Block<T, A: ArrayAllocator> {
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: `Block` owns its elements exclusively, like `Vec<T>`.
unsafe impl<T: Send, A: ArrayAllocator + Send> Send for Block<T, A> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, A: ArrayAllocator + Sync> Sync for Block<T, A> {}

impl<T, A: ArrayAllocator> Block<T, A> {
    /// A block with no elements and no allocation.
    pub fn empty(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            cap: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    /// Allocate `len` slots and construct element `i` from `f(i)`, front
    /// to back.
    ///
    /// If `f` panics, the elements built so far are dropped in reverse
    /// order and the allocation is released before the panic continues.
    /// Fails with [`ArrayError::LengthViolation`] when `len` elements of
    /// `T` cannot be described by a `Layout`; nothing is allocated then.
    pub fn try_from_fn<F>(len: usize, alloc: A, mut f: F) -> Result<Self, ArrayError>
    where
        F: FnMut(usize) -> T,
    {
        let mut block = Self::with_capacity(len, alloc)?;
        {
            let mut fill = Fill::new(&mut block);
            while fill.filled < len {
                let value = f(fill.filled);
                fill.push(value);
            }
            fill.commit();
        }
        Ok(block)
    }

    /// Allocate `len` slots and move elements in from `iter`.
    ///
    /// Stops early if the iterator is exhausted; [`Block::len`] then
    /// reports how many elements were written.
    pub fn try_from_iter<I>(len: usize, alloc: A, iter: I) -> Result<Self, ArrayError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut block = Self::with_capacity(len, alloc)?;
        {
            let mut fill = Fill::new(&mut block);
            for value in iter.into_iter().take(len) {
                fill.push(value);
            }
            fill.commit();
        }
        Ok(block)
    }

    fn with_capacity(cap: usize, alloc: A) -> Result<Self, ArrayError> {
        if cap == 0 {
            return Ok(Self::empty(alloc));
        }
        let layout = Self::layout(cap)?;
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            match alloc.allocate(layout) {
                Ok(p) => p.cast::<T>(),
                Err(_) => handle_alloc_error(layout),
            }
        };
        log::trace!(
            "allocated block of {cap} x {} ({} bytes)",
            std::any::type_name::<T>(),
            layout.size()
        );
        Ok(Self {
            ptr,
            len: 0,
            cap,
            alloc,
            _owns: PhantomData,
        })
    }

    /// Check that `len` elements of `T` fit in one allocation, without
    /// allocating.
    pub fn check_len(len: usize) -> Result<(), ArrayError> {
        Self::layout(len).map(|_| ())
    }

    fn layout(cap: usize) -> Result<Layout, ArrayError> {
        if cap > MAX_SIZE {
            return Err(ArrayError::LengthViolation {
                dimension: 0,
                max_size: MAX_SIZE,
            });
        }
        Layout::array::<T>(cap).map_err(|_| ArrayError::LengthViolation {
            dimension: 0,
            max_size: MAX_SIZE / mem::size_of::<T>().max(1),
        })
    }

    /// Number of initialised elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the block holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the block holds an allocation from its allocator.
    pub fn is_allocated(&self) -> bool {
        self.cap > 0 && mem::size_of::<T>() > 0
    }

    /// The allocator this block was (or would be) allocated from.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Bytes held by the allocation.
    pub fn memory_bytes(&self) -> usize {
        self.cap * mem::size_of::<T>()
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `ptr` is aligned and non-null (dangling only when
        // `len == 0`), and the first `len` slots are initialised.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// The elements, mutably, alongside the allocator.
    pub fn parts_mut(&mut self) -> (&mut [T], &A) {
        // SAFETY: as in `as_slice`; `&mut self` guarantees exclusivity and
        // the allocator is a separate field.
        let elements = unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) };
        (elements, &self.alloc)
    }

    /// Destroy the initialised elements back to front and free the
    /// allocation. Leaves `self` empty, safe to drop again.
    fn release(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        let cap = mem::replace(&mut self.cap, 0);
        // SAFETY: slots `0..len` are initialised and are no longer
        // reachable through `self` once `len` is zero.
        unsafe { drop_reverse(self.ptr, len) };
        if cap > 0 {
            // SAFETY: `cap` slots were allocated from `self.alloc` with this
            // layout in `with_capacity`.
            unsafe { free::<T, A>(&self.alloc, self.ptr, cap) };
            log::trace!(
                "released block of {cap} x {}",
                std::any::type_name::<T>()
            );
        }
        self.ptr = NonNull::dangling();
    }
}

impl<T, A: ArrayAllocator> Drop for Block<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T, A: ArrayAllocator> Deref for Block<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: ArrayAllocator> DerefMut for Block<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: ArrayAllocator> fmt::Debug for Block<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, A: ArrayAllocator> IntoIterator for Block<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let this = ManuallyDrop::new(self);
        // SAFETY: `this` is never dropped, so the allocator is moved out
        // exactly once.
        let alloc = unsafe { ptr::read(&this.alloc) };
        IntoIter {
            ptr: this.ptr,
            start: 0,
            end: this.len,
            cap: this.cap,
            alloc,
            _owns: PhantomData,
        }
    }
}

/// Moves elements out of a [`Block`], front to back.
///
/// Elements not yielded are dropped, and the allocation freed, when the
/// iterator is dropped.
pub struct IntoIter<T, A: ArrayAllocator> {
    ptr: NonNull<T>,
    start: usize,
    end: usize,
    cap: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

impl<T, A: ArrayAllocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: slot `start` is initialised and, after the increment,
        // no longer considered owned by the iterator.
        let value = unsafe { self.ptr.as_ptr().add(self.start).read() };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.start;
        (n, Some(n))
    }
}

impl<T, A: ArrayAllocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: ArrayAllocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        // SAFETY: slots `start..end` are still initialised and owned here.
        unsafe {
            let rest = NonNull::new_unchecked(self.ptr.as_ptr().add(self.start));
            drop_reverse(rest, self.end - self.start);
        }
        if self.cap > 0 {
            // SAFETY: the allocation came from `alloc` with `cap` slots.
            unsafe { free::<T, A>(&self.alloc, self.ptr, self.cap) };
        }
    }
}

/// Write guard used while a block is being filled.
///
/// Until [`Fill::commit`] runs, dropping the guard (normally during a
/// panic unwind) destroys the written prefix and frees the block.
struct Fill<'b, T, A: ArrayAllocator> {
    block: &'b mut Block<T, A>,
    filled: usize,
}

impl<'b, T, A: ArrayAllocator> Fill<'b, T, A> {
    fn new(block: &'b mut Block<T, A>) -> Self {
        Self { block, filled: 0 }
    }

    fn push(&mut self, value: T) {
        assert!(self.filled < self.block.cap, "block overfilled");
        // SAFETY: `filled < cap`, so the slot is inside the allocation and
        // not yet initialised.
        unsafe { self.block.ptr.as_ptr().add(self.filled).write(value) };
        self.filled += 1;
    }

    fn commit(self) {
        self.block.len = self.filled;
        mem::forget(self);
    }
}

impl<T, A: ArrayAllocator> Drop for Fill<'_, T, A> {
    fn drop(&mut self) {
        log::debug!(
            "unwinding partially built block: {} of {} elements",
            self.filled,
            self.block.cap
        );
        self.block.len = self.filled;
        self.block.release();
    }
}

/// Drop `len` initialised elements starting at `ptr`, last first.
///
/// # Safety
///
/// Slots `0..len` from `ptr` must be initialised and not used afterwards.
unsafe fn drop_reverse<T>(ptr: NonNull<T>, len: usize) {
    if !mem::needs_drop::<T>() {
        return;
    }
    for i in (0..len).rev() {
        // SAFETY: per the caller contract.
        unsafe { ptr::drop_in_place(ptr.as_ptr().add(i)) };
    }
}

/// Free an allocation of `cap` slots of `T`.
///
/// # Safety
///
/// `ptr` must come from `alloc` with `Layout::array::<T>(cap)`.
unsafe fn free<T, A: ArrayAllocator>(alloc: &A, ptr: NonNull<T>, cap: usize) {
    let Ok(layout) = Layout::array::<T>(cap) else {
        return;
    };
    if layout.size() == 0 {
        return;
    }
    // SAFETY: per the caller contract.
    unsafe { alloc.deallocate(ptr.cast::<u8>(), layout) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Global;
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;

    struct Noisy {
        id: usize,
        log: Rc<RefCell<Vec<usize>>>,
    }

    impl Drop for Noisy {
        fn drop(&mut self) {
            self.log.borrow_mut().push(self.id);
        }
    }

    fn noisy(n: usize, log: &Rc<RefCell<Vec<usize>>>) -> Block<Noisy, Global> {
        Block::try_from_fn(n, Global, |id| Noisy {
            id,
            log: Rc::clone(log),
        })
        .unwrap()
    }

    #[test]
    fn from_fn_fills_in_order() {
        let block = Block::try_from_fn(5, Global, |i| i * 10).unwrap();
        assert_eq!(block.as_slice(), &[0, 10, 20, 30, 40]);
        assert!(block.is_allocated());
    }

    #[test]
    fn empty_block_allocates_nothing() {
        let block: Block<u32, Global> = Block::try_from_fn(0, Global, |_| 1).unwrap();
        assert!(block.is_empty());
        assert!(!block.is_allocated());
        assert_eq!(block.as_slice(), &[] as &[u32]);
    }

    #[test]
    fn drop_destroys_in_reverse_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        drop(noisy(4, &log));
        assert_eq!(*log.borrow(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn panicking_initialiser_unwinds_prefix() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let result = catch_unwind(AssertUnwindSafe(|| {
            Block::try_from_fn(10, Global, |id| {
                if id == 3 {
                    panic!("boom");
                }
                Noisy {
                    id,
                    log: Rc::clone(&log),
                }
            })
        }));
        assert!(result.is_err());
        assert_eq!(*log.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn oversized_layout_is_a_length_violation() {
        let result = Block::<u64, Global>::try_from_fn(MAX_SIZE, Global, |_| 0);
        assert!(matches!(result, Err(ArrayError::LengthViolation { .. })));
    }

    #[test]
    fn from_iter_stops_when_exhausted() {
        let block = Block::try_from_iter(5, Global, vec![1, 2, 3]).unwrap();
        assert_eq!(block.as_slice(), &[1, 2, 3]);
        assert_eq!(block.memory_bytes(), 5 * mem::size_of::<i32>());
    }

    #[test]
    fn into_iter_moves_and_drops_the_rest() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut iter = noisy(4, &log).into_iter();
        let first = iter.next().unwrap();
        assert_eq!(first.id, 0);
        drop(iter);
        assert_eq!(*log.borrow(), vec![3, 2, 1]);
        drop(first);
        assert_eq!(*log.borrow(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn zero_sized_elements_skip_the_allocator() {
        let block = Block::try_from_fn(1000, Global, |_| ()).unwrap();
        assert_eq!(block.len(), 1000);
        assert!(!block.is_allocated());
    }

    #[test]
    fn deref_mut_writes_through() {
        let mut block = Block::try_from_fn(3, Global, |_| 0u8).unwrap();
        block[1] = 7;
        assert_eq!(&*block, &[0, 7, 0]);
    }
}
