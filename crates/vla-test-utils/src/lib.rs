//! Test utilities for VLA development.
//!
//! Provides a [`CountingAllocator`] that records every block it hands
//! out, and element types that report their own drops, so tests can
//! check that an array releases exactly what it acquired.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod counting;
pub mod fixtures;

pub use counting::CountingAllocator;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared record of [`Tracked`] drops, in drop order.
#[derive(Clone, Debug, Default)]
pub struct DropLog(Arc<Mutex<Vec<u32>>>);

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracked element that logs `id` here when dropped.
    pub fn track(&self, id: u32) -> Tracked {
        Tracked {
            id,
            log: self.clone(),
        }
    }

    /// Ids dropped so far, oldest first.
    pub fn dropped(&self) -> Vec<u32> {
        self.0.lock().expect("drop log poisoned").clone()
    }

    pub fn clear(&self) {
        self.0.lock().expect("drop log poisoned").clear();
    }
}

/// An element that appends its id to a [`DropLog`] when dropped.
///
/// Clones share the id, so a cloned array logs the same ids again.
#[derive(Debug)]
pub struct Tracked {
    pub id: u32,
    log: DropLog,
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.log.track(self.id)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        if let Ok(mut log) = self.log.0.lock() {
            log.push(self.id);
        }
    }
}

/// Counter of live [`Counted`] elements.
#[derive(Clone, Debug, Default)]
pub struct LiveCount(Arc<AtomicUsize>);

impl LiveCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&self, value: u32) -> Counted {
        self.0.fetch_add(1, Ordering::SeqCst);
        Counted {
            value,
            live: self.clone(),
        }
    }

    /// Elements created and not yet dropped.
    pub fn live(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// An element counted in a [`LiveCount`] for as long as it exists.
#[derive(Debug)]
pub struct Counted {
    pub value: u32,
    live: LiveCount,
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        self.live.spawn(self.value)
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.live.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PartialEq for Counted {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// A [`Counted`] element whose clone panics when armed.
///
/// Drives unwind tests: cloning an array of these stops partway.
#[derive(Debug)]
pub struct PanicOnClone {
    pub inner: Counted,
    pub armed: bool,
}

impl PanicOnClone {
    pub fn new(live: &LiveCount, value: u32, armed: bool) -> Self {
        Self {
            inner: live.spawn(value),
            armed,
        }
    }
}

impl Clone for PanicOnClone {
    fn clone(&self) -> Self {
        if self.armed {
            panic!("clone of armed element {}", self.inner.value);
        }
        Self {
            inner: self.inner.clone(),
            armed: false,
        }
    }
}
