//! An owning box for alternatives that contain the variant itself.

use alloc::boxed::Box;
use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Deref, DerefMut},
};

/// Exclusively owns one heap-allocated `T`.
///
/// A variant cannot hold itself by value, since it would be infinitely large.
/// Writing an alternative as `rec T` in [`Variant!`] stores it through an
/// `Indirection<T>` instead, while every accessor and visitor still sees a
/// plain `T`.
///
/// Cloning deep-copies the pointee; comparison, hashing and formatting are
/// those of `T`.
///
/// # Examples
///
/// ```rust
/// use tvariant::{Indirection, Variant};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Cell(List);
/// type List = Variant![(), rec Cell];
///
/// let list: List = Variant::new(Cell(Variant::new(())));
/// let copy = list.clone();
/// assert_eq!(list, copy);
///
/// let boxed = Indirection::new(5);
/// assert_eq!(*boxed + 1, 6);
/// ```
///
/// [`Variant!`]: crate::Variant
pub struct Indirection<T>(Box<T>);

impl<T> Indirection<T> {
    /// Moves `value` onto the heap.
    pub fn new(value: T) -> Self {
        Indirection(Box::new(value))
    }

    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }

    /// Moves the value back out of its allocation.
    pub fn into_inner(self) -> T {
        *self.0
    }

    /// Replaces the owned value without reallocating, returning the old one.
    pub fn replace(&mut self, value: T) -> T {
        core::mem::replace(&mut *self.0, value)
    }
}

impl<T> From<T> for Indirection<T> {
    fn from(value: T) -> Self {
        Indirection::new(value)
    }
}

impl<T> Deref for Indirection<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Indirection<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Default> Default for Indirection<T> {
    fn default() -> Self {
        Indirection::new(T::default())
    }
}

impl<T: Clone> Clone for Indirection<T> {
    fn clone(&self) -> Self {
        Indirection(self.0.clone())
    }

    fn clone_from(&mut self, source: &Self) {
        self.0.clone_from(&source.0);
    }
}

impl<T: PartialEq> PartialEq for Indirection<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: Eq> Eq for Indirection<T> {}

impl<T: PartialOrd> PartialOrd for Indirection<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (*self.0).partial_cmp(&*other.0)
    }
}

impl<T: Ord> Ord for Indirection<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self.0).cmp(&*other.0)
    }
}

impl<T: Hash> Hash for Indirection<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (*self.0).hash(state)
    }
}

impl<T: fmt::Debug> fmt::Debug for Indirection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl<T: fmt::Display> fmt::Display for Indirection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc, string::String};

    use super::*;

    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn clone_is_deep() {
        let a = Indirection::new(String::from("left"));
        let mut b = a.clone();
        b.push_str("-right");
        assert_eq!(*a, "left");
        assert_eq!(*b, "left-right");
        assert_ne!(a, b);
    }

    #[test]
    fn clone_from_reuses_allocation() {
        let source = Indirection::new(String::from("abc"));
        let mut target = Indirection::new(String::with_capacity(64));
        let before: *const String = target.get();
        target.clone_from(&source);
        assert_eq!(*target, "abc");
        assert!(core::ptr::eq(before, target.get()));
    }

    #[test]
    fn drops_once() {
        let drops = Rc::new(Cell::new(0));
        let a = Indirection::new(Tracked(drops.clone()));
        let b = a;
        assert_eq!(drops.get(), 0);
        drop(b);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn replace_and_into_inner() {
        let mut a = Indirection::new(1);
        assert_eq!(a.replace(2), 1);
        *a.get_mut() += 1;
        assert_eq!(a.into_inner(), 3);
    }
}
