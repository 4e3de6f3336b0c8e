//! Arrays whose depth is part of the type.

use std::fmt;
use std::ops::{Deref, Index, IndexMut};

use vla_arena::{ArrayAllocator, Global};
use vla_core::ArrayError;

use crate::array::DynArray;
use crate::config::ArrayConfig;
use crate::view::{ArrayView, ArrayViewMut, AsView};

/// A [`DynArray`] of depth exactly `D`.
///
/// The depth is checked at compile time (`D >= 1`) and every operation
/// that could change it is either absent or typed to preserve it. Shared
/// access goes through `Deref<Target = DynArray>`.
///
/// # Examples
///
/// ```
/// use vla::FixedArray;
///
/// let mut m: FixedArray<f32, 2> = FixedArray::new([2, 3]).unwrap();
/// m[[1, 2]] = 1.5;
/// assert_eq!(m.row(1).leaves(), &[0.0, 0.0, 1.5]);
/// ```
pub struct FixedArray<T, const D: usize, A: ArrayAllocator = Global> {
    inner: DynArray<T, A>,
}

impl<T, const D: usize, A: ArrayAllocator> FixedArray<T, D, A> {
    const DEPTH_OK: () = assert!(D >= 1, "FixedArray depth must be at least 1");
}

impl<T, const D: usize> FixedArray<T, D, Global> {
    /// An array of `extents` with every leaf `T::default()`.
    pub fn new(extents: [usize; D]) -> Result<Self, ArrayError>
    where
        T: Default,
    {
        Self::from_fn(extents, |_| T::default())
    }

    /// An array of `extents` with every leaf a clone of `value`.
    pub fn from_elem(extents: [usize; D], value: T) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        Self::from_fn(extents, |_| value.clone())
    }

    /// An array of `extents` with each leaf built from its full index.
    pub fn from_fn<F>(extents: [usize; D], f: F) -> Result<Self, ArrayError>
    where
        F: FnMut([usize; D]) -> T,
    {
        Self::from_config(ArrayConfig::new(extents), f)
    }

    /// An array sized by the first `D` of `extents`.
    ///
    /// Fewer than `D` extents give the canonical empty state; surplus
    /// extents are ignored with a warning.
    pub fn from_extents(extents: &[usize]) -> Result<Self, ArrayError>
    where
        T: Default,
    {
        Self::from_config(ArrayConfig::new(extents), |_| T::default())
    }

    /// The canonical empty array.
    pub fn empty() -> Self {
        Self::empty_in(Global, Global)
    }
}

impl<T, const D: usize, A: ArrayAllocator> FixedArray<T, D, A> {
    /// Build from a configuration; its declared depth is overridden by `D`.
    pub fn from_config<F>(config: ArrayConfig<A>, mut f: F) -> Result<Self, ArrayError>
    where
        F: FnMut([usize; D]) -> T,
    {
        let () = Self::DEPTH_OK;
        let inner = DynArray::from_config(config.depth(D), |idx| {
            let mut index = [0; D];
            index.copy_from_slice(idx);
            f(index)
        })?;
        Ok(Self { inner })
    }

    /// The canonical empty array with explicit allocators.
    pub fn empty_in(node_allocator: A, leaf_allocator: A) -> Self {
        let () = Self::DEPTH_OK;
        Self {
            inner: DynArray::empty_in(D, node_allocator, leaf_allocator),
        }
    }

    /// The depth, as a constant.
    pub const fn rank() -> usize {
        D
    }

    /// Give up the depth guarantee.
    pub fn into_dyn(self) -> DynArray<T, A> {
        self.inner
    }

    /// Every leaf, mutably.
    pub fn leaves_mut(&mut self) -> &mut [T] {
        self.inner.leaves_mut()
    }

    /// A mutable view of the whole array.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T, A> {
        self.inner.view_mut()
    }

    /// Row `i`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or `D == 1`.
    pub fn row_mut(&mut self, i: usize) -> ArrayViewMut<'_, T, A> {
        self.inner.row_mut(i)
    }

    /// Leaf `i` of a one-dimensional array, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or `D > 1`.
    pub fn value_mut(&mut self, i: usize) -> &mut T {
        self.inner.value_mut(i)
    }

    /// Overwrite every leaf with a clone of `value`.
    pub fn fill(&mut self, value: &T)
    where
        T: Clone,
    {
        self.inner.fill(value);
    }

    /// Return to the canonical empty state, keeping depth `D`.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Exchange contents with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.inner.swap(&mut other.inner);
    }

    /// Take the contents in O(1), leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            inner: self.inner.take(),
        }
    }

    /// Replace the contents with a copy of `source`.
    pub fn assign<B: ArrayAllocator>(&mut self, source: &FixedArray<T, D, B>)
    where
        T: Clone,
    {
        self.inner.assign(&source.inner);
    }

    /// A deep copy drawing from fresh allocators.
    pub fn clone_in<B: ArrayAllocator>(
        &self,
        node_allocator: B,
        leaf_allocator: B,
    ) -> FixedArray<T, D, B>
    where
        T: Clone,
    {
        FixedArray {
            inner: self.inner.clone_in(node_allocator, leaf_allocator),
        }
    }
}

impl<T, const D: usize, A: ArrayAllocator> Deref for FixedArray<T, D, A> {
    type Target = DynArray<T, A>;

    fn deref(&self) -> &DynArray<T, A> {
        &self.inner
    }
}

impl<T, const D: usize, A: ArrayAllocator> TryFrom<DynArray<T, A>> for FixedArray<T, D, A> {
    type Error = DynArray<T, A>;

    /// Fails, handing the array back, unless its depth is `D`.
    fn try_from(inner: DynArray<T, A>) -> Result<Self, DynArray<T, A>> {
        let () = Self::DEPTH_OK;
        if inner.depth() == D {
            Ok(Self { inner })
        } else {
            Err(inner)
        }
    }
}

impl<T, const D: usize, A: ArrayAllocator> From<FixedArray<T, D, A>> for DynArray<T, A> {
    fn from(fixed: FixedArray<T, D, A>) -> Self {
        fixed.inner
    }
}

impl<T, const D: usize, A: ArrayAllocator> Index<[usize; D]> for FixedArray<T, D, A> {
    type Output = T;

    fn index(&self, path: [usize; D]) -> &T {
        &self.inner[path]
    }
}

impl<T, const D: usize, A: ArrayAllocator> IndexMut<[usize; D]> for FixedArray<T, D, A> {
    fn index_mut(&mut self, path: [usize; D]) -> &mut T {
        &mut self.inner[path]
    }
}

impl<T, const D: usize, A: ArrayAllocator> AsView<T, A> for FixedArray<T, D, A> {
    fn as_view(&self) -> ArrayView<'_, T, A> {
        self.inner.view()
    }
}

impl<T: Clone, const D: usize, A: ArrayAllocator> Clone for FixedArray<T, D, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, const D: usize, A: ArrayAllocator + Default> Default for FixedArray<T, D, A> {
    fn default() -> Self {
        Self::empty_in(A::default(), A::default())
    }
}

impl<T: fmt::Debug, const D: usize, A: ArrayAllocator> fmt::Debug for FixedArray<T, D, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_index_matches_dyn() {
        let a =
            FixedArray::<usize, 3>::from_fn([2, 3, 4], |[i, j, k]| i * 100 + j * 10 + k).unwrap();
        assert_eq!(a[[1, 2, 3]], 123);
        assert_eq!(a.depth(), 3);
        assert_eq!(FixedArray::<usize, 3>::rank(), 3);
    }

    #[test]
    fn too_few_extents_is_empty() {
        let a = FixedArray::<u8, 3>::from_extents(&[4, 5]).unwrap();
        assert!(a.is_empty());
        assert_eq!(a.depth(), 3);
    }

    #[test]
    fn surplus_extents_are_ignored() {
        let a = FixedArray::<u8, 2>::from_extents(&[4, 5, 6]).unwrap();
        assert_eq!(a.len(), 4);
        assert_eq!(a.leaf_count(), 20);
    }

    #[test]
    fn try_from_checks_depth() {
        let d = DynArray::from_nested(vec![vec![1, 2], vec![3]]);
        let fixed: FixedArray<i32, 2> = d.try_into().unwrap();
        assert_eq!(fixed.row(1).leaves(), &[3]);
        let back = FixedArray::<i32, 3>::try_from(fixed.into_dyn()).unwrap_err();
        assert_eq!(back.depth(), 2);
    }

    #[test]
    fn take_keeps_the_type_depth() {
        let mut a = FixedArray::<u8, 2>::from_elem([2, 2], 3).unwrap();
        let b = a.take();
        assert!(a.is_empty());
        assert_eq!(a.depth(), 2);
        assert_eq!(b.leaves(), &[3, 3, 3, 3]);
    }

    #[test]
    fn assign_and_clone() {
        let a = FixedArray::<u8, 2>::from_elem([1, 3], 1).unwrap();
        let mut b = FixedArray::<u8, 2>::new([4, 4]).unwrap();
        b.assign(&a);
        assert_eq!(b.len(), 1);
        let c = b.clone();
        assert_eq!(c.leaves(), &[1, 1, 1]);
    }
}
