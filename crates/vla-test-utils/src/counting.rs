//! An allocator that keeps a ledger of live blocks.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use indexmap::IndexMap;
use vla_arena::{AllocError, ArrayAllocator};

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Default)]
struct Ledger {
    live: IndexMap<usize, Layout>,
    allocations: usize,
    deallocations: usize,
}

/// Heap allocator that records every block it serves.
///
/// Clones share one ledger and compare equal; separately created
/// allocators never do. Freeing a block the ledger does not know, or with
/// the wrong layout, panics.
#[derive(Clone)]
pub struct CountingAllocator {
    id: usize,
    ledger: Arc<Mutex<Ledger>>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            ledger: Arc::default(),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("allocation ledger poisoned")
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Blocks served so far.
    pub fn allocations(&self) -> usize {
        self.ledger().allocations
    }

    /// Blocks released so far.
    pub fn deallocations(&self) -> usize {
        self.ledger().deallocations
    }

    /// Blocks served and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.ledger().live.len()
    }

    pub fn live_bytes(&self) -> usize {
        self.ledger().live.values().map(Layout::size).sum()
    }

    /// Layouts of the live blocks, oldest first.
    pub fn live_layouts(&self) -> Vec<Layout> {
        self.ledger().live.values().copied().collect()
    }

    /// Panic unless every block served has been released.
    pub fn assert_no_leaks(&self) {
        let ledger = self.ledger();
        assert!(
            ledger.live.is_empty(),
            "allocator {} leaked {} block(s): {:?}",
            self.id,
            ledger.live.len(),
            ledger.live.values().collect::<Vec<_>>()
        );
    }
}

impl Default for CountingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for CountingAllocator {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CountingAllocator {}

impl fmt::Debug for CountingAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingAllocator")
            .field("id", &self.id)
            .field("live_blocks", &self.live_blocks())
            .finish()
    }
}

// SAFETY: memory comes from `std::alloc` with the caller's layout and is
// returned to it with the recorded layout. All clones share the ledger, so
// any clone may free a block another served.
unsafe impl ArrayAllocator for CountingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError);
        }
        // SAFETY: `layout` has non-zero size.
        let ptr = NonNull::new(unsafe { std::alloc::alloc(layout) }).ok_or(AllocError)?;
        let mut ledger = self.ledger();
        ledger.live.insert(ptr.as_ptr() as usize, layout);
        ledger.allocations += 1;
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        {
            let mut ledger = self.ledger();
            let Some(recorded) = ledger.live.shift_remove(&(ptr.as_ptr() as usize)) else {
                panic!("allocator {} freed a block it does not own", self.id);
            };
            assert_eq!(recorded, layout, "block freed with a different layout");
            ledger.deallocations += 1;
        }
        // SAFETY: the ledger confirmed `ptr` was served by `allocate` with
        // this `layout` and has not been freed since.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}
