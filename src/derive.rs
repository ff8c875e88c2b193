//! Per-alternative standard traits, lifted to whole type lists.
//!
//! Each trait here is implemented for a list when every alternative in it
//! implements the corresponding standard trait; [`Variant`](crate::Variant)
//! then implements the standard trait on top, after handling the tag and the
//! valueless state.

use core::{cmp::Ordering, fmt};

use crate::repr::{Nil, Node, SumList};

pub trait SumClone: SumList {
    #[doc(hidden)]
    unsafe fn clone(this: &Self::Repr, tag: u8) -> Self::Repr;

    #[doc(hidden)]
    unsafe fn clone_from(this: &mut Self::Repr, source: &Self::Repr, tag: u8);
}

impl SumClone for () {
    unsafe fn clone(_: &Nil, tag: u8) -> Nil {
        unreachable!("cloning tag {tag} of an empty set")
    }

    unsafe fn clone_from(_: &mut Nil, _: &Nil, tag: u8) {
        unreachable!("cloning tag {tag} of an empty set")
    }
}

impl<L> SumClone for L
where
    L: Node,
    L::Head: Clone,
    L::Tail: SumClone,
{
    unsafe fn clone(this: &Self::Repr, tag: u8) -> Self::Repr {
        if tag == 0 {
            L::from_head(unsafe { L::head(this) }.clone())
        } else {
            L::from_tail(unsafe { <L::Tail as SumClone>::clone(L::tail(this), tag - 1) })
        }
    }

    unsafe fn clone_from(this: &mut Self::Repr, source: &Self::Repr, tag: u8) {
        if tag == 0 {
            unsafe { L::head_mut(this).clone_from(L::head(source)) }
        } else {
            unsafe { <L::Tail as SumClone>::clone_from(L::tail_mut(this), L::tail(source), tag - 1) }
        }
    }
}

pub trait SumPartialEq: SumList {
    #[doc(hidden)]
    unsafe fn eq(this: &Self::Repr, other: &Self::Repr, tag: u8) -> bool;
}

impl SumPartialEq for () {
    unsafe fn eq(_: &Nil, _: &Nil, _: u8) -> bool {
        false
    }
}

impl<L> SumPartialEq for L
where
    L: Node,
    L::Head: PartialEq,
    L::Tail: SumPartialEq,
{
    unsafe fn eq(this: &Self::Repr, other: &Self::Repr, tag: u8) -> bool {
        if tag == 0 {
            unsafe { L::head(this) == L::head(other) }
        } else {
            unsafe { <L::Tail as SumPartialEq>::eq(L::tail(this), L::tail(other), tag - 1) }
        }
    }
}

pub trait SumPartialOrd: SumPartialEq {
    #[doc(hidden)]
    unsafe fn partial_cmp(this: &Self::Repr, other: &Self::Repr, tag: u8) -> Option<Ordering>;
}

impl SumPartialOrd for () {
    unsafe fn partial_cmp(_: &Nil, _: &Nil, _: u8) -> Option<Ordering> {
        None
    }
}

impl<L> SumPartialOrd for L
where
    L: Node,
    L::Head: PartialOrd,
    L::Tail: SumPartialOrd,
{
    unsafe fn partial_cmp(this: &Self::Repr, other: &Self::Repr, tag: u8) -> Option<Ordering> {
        if tag == 0 {
            unsafe { L::head(this).partial_cmp(L::head(other)) }
        } else {
            unsafe { <L::Tail as SumPartialOrd>::partial_cmp(L::tail(this), L::tail(other), tag - 1) }
        }
    }
}

pub trait SumDebug: SumList {
    #[doc(hidden)]
    unsafe fn fmt(this: &Self::Repr, tag: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl SumDebug for () {
    unsafe fn fmt(_: &Nil, _: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<valueless>")
    }
}

impl<L> SumDebug for L
where
    L: Node,
    L::Head: fmt::Debug,
    L::Tail: SumDebug,
{
    unsafe fn fmt(this: &Self::Repr, tag: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if tag == 0 {
            fmt::Debug::fmt(unsafe { L::head(this) }, f)
        } else {
            unsafe { <L::Tail as SumDebug>::fmt(L::tail(this), tag - 1, f) }
        }
    }
}

pub trait SumDisplay: SumList {
    #[doc(hidden)]
    unsafe fn fmt(this: &Self::Repr, tag: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl SumDisplay for () {
    unsafe fn fmt(_: &Nil, _: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<valueless>")
    }
}

impl<L> SumDisplay for L
where
    L: Node,
    L::Head: fmt::Display,
    L::Tail: SumDisplay,
{
    unsafe fn fmt(this: &Self::Repr, tag: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if tag == 0 {
            fmt::Display::fmt(unsafe { L::head(this) }, f)
        } else {
            unsafe { <L::Tail as SumDisplay>::fmt(L::tail(this), tag - 1, f) }
        }
    }
}
