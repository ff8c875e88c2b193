//! Visitor dispatch over one or several variants.
//!
//! A visitor handles every alternative of a variant through one
//! [`Visitor`] implementation per alternative type, all sharing a single
//! `Output`. Leaving an alternative out, or disagreeing on the output type,
//! fails to build:
//!
//! ```rust
//! use tvariant::{Variant, Visitor};
//!
//! struct Size;
//!
//! impl Visitor<&i32> for Size {
//!     type Output = usize;
//!
//!     fn visit(&mut self, _: &i32) -> usize {
//!         1
//!     }
//! }
//!
//! impl Visitor<&String> for Size {
//!     type Output = usize;
//!
//!     fn visit(&mut self, s: &String) -> usize {
//!         s.len()
//!     }
//! }
//!
//! let v: Variant![i32, String] = Variant::convert("hi");
//! assert_eq!(v.visit(&mut Size), Ok(2));
//! ```
//!
//! ```rust,compile_fail
//! use tvariant::{Variant, Visitor};
//!
//! struct OnlyInts;
//!
//! impl Visitor<&i32> for OnlyInts {
//!     type Output = ();
//!
//!     fn visit(&mut self, _: &i32) {}
//! }
//!
//! let v: Variant![i32, String] = Variant::new(5i32);
//! let _ = v.visit(&mut OnlyInts);
//! ```
//!
//! ```rust,compile_fail
//! use tvariant::{Variant, Visitor};
//!
//! struct Mismatched;
//!
//! impl Visitor<&i32> for Mismatched {
//!     type Output = i32;
//!
//!     fn visit(&mut self, v: &i32) -> i32 {
//!         *v
//!     }
//! }
//!
//! impl Visitor<&String> for Mismatched {
//!     type Output = usize;
//!
//!     fn visit(&mut self, s: &String) -> usize {
//!         s.len()
//!     }
//! }
//!
//! let v: Variant![i32, String] = Variant::new(5i32);
//! let _ = v.visit(&mut Mismatched);
//! ```
//!
//! Several variants are visited together with [`visit_all`], which hands the
//! visitor one typed reference per variant, in order, as a tuple list.
//! Fixed trailing arguments go through [`visit_all_with`] and
//! [`Variant::visit_with`].

use core::marker::PhantomData;

use crate::{
    Repr, Variant,
    error::EmptyVariantAccess,
    repr::{Nil, Node, SumList},
};

/// A reusable visitor, called with the active alternative(s).
///
/// `Args` is `&T` or `&mut T` for a single variant, and a tuple list such as
/// `(&A, (&mut B, ()))` for [`visit_all`].
pub trait Visitor<Args> {
    type Output;

    fn visit(&mut self, args: Args) -> Self::Output;
}

/// A visitor consumed by a single dispatch.
///
/// Every `&mut V` where `V: Visitor` is one.
pub trait VisitOnce<Args> {
    type Output;

    fn visit_once(self, args: Args) -> Self::Output;
}

impl<Args, V> VisitOnce<Args> for &mut V
where
    V: Visitor<Args> + ?Sized,
{
    type Output = V::Output;

    fn visit_once(self, args: Args) -> V::Output {
        self.visit(args)
    }
}

/// The trait that type lists implement to dispatch a visitor on a shared
/// reference to the active alternative.
pub trait VisitRef<'a, V, R>: SumList {
    #[doc(hidden)]
    unsafe fn visit_ref(this: &'a Self::Repr, tag: u8, visitor: V) -> R;
}

impl<'a, V, R> VisitRef<'a, V, R> for () {
    unsafe fn visit_ref(_: &'a Nil, tag: u8, _: V) -> R {
        unreachable!("visiting tag {tag} of an empty set")
    }
}

impl<'a, L, V, R> VisitRef<'a, V, R> for L
where
    L: Node,
    L::Head: 'a,
    Repr<L::Tail>: 'a,
    V: VisitOnce<&'a L::Head, Output = R>,
    L::Tail: VisitRef<'a, V, R>,
{
    unsafe fn visit_ref(this: &'a Self::Repr, tag: u8, visitor: V) -> R {
        if tag == 0 {
            visitor.visit_once(unsafe { L::head(this) })
        } else {
            unsafe { <L::Tail as VisitRef<'a, V, R>>::visit_ref(L::tail(this), tag - 1, visitor) }
        }
    }
}

/// The trait that type lists implement to dispatch a visitor on a mutable
/// reference to the active alternative.
pub trait VisitMut<'a, V, R>: SumList {
    #[doc(hidden)]
    unsafe fn visit_mut(this: &'a mut Self::Repr, tag: u8, visitor: V) -> R;
}

impl<'a, V, R> VisitMut<'a, V, R> for () {
    unsafe fn visit_mut(_: &'a mut Nil, tag: u8, _: V) -> R {
        unreachable!("visiting tag {tag} of an empty set")
    }
}

impl<'a, L, V, R> VisitMut<'a, V, R> for L
where
    L: Node,
    L::Head: 'a,
    Repr<L::Tail>: 'a,
    V: VisitOnce<&'a mut L::Head, Output = R>,
    L::Tail: VisitMut<'a, V, R>,
{
    unsafe fn visit_mut(this: &'a mut Self::Repr, tag: u8, visitor: V) -> R {
        if tag == 0 {
            visitor.visit_once(unsafe { L::head_mut(this) })
        } else {
            unsafe { <L::Tail as VisitMut<'a, V, R>>::visit_mut(L::tail_mut(this), tag - 1, visitor) }
        }
    }
}

/// Appends an element to the end of a tuple list.
pub trait Append<T> {
    type Output;

    fn append(self, value: T) -> Self::Output;
}

impl<T> Append<T> for () {
    type Output = (T, ());

    fn append(self, value: T) -> (T, ()) {
        (value, ())
    }
}

impl<T, Head, Tail: Append<T>> Append<T> for (Head, Tail) {
    type Output = (Head, Tail::Output);

    fn append(self, value: T) -> Self::Output {
        (self.0, self.1.append(value))
    }
}

/// Concatenates two tuple lists.
pub trait Concat<Rhs> {
    type Output;

    fn concat(self, rhs: Rhs) -> Self::Output;
}

impl<Rhs> Concat<Rhs> for () {
    type Output = Rhs;

    fn concat(self, rhs: Rhs) -> Rhs {
        rhs
    }
}

impl<Rhs, Head, Tail: Concat<Rhs>> Concat<Rhs> for (Head, Tail) {
    type Output = (Head, Tail::Output);

    fn concat(self, rhs: Rhs) -> Self::Output {
        (self.0, self.1.concat(rhs))
    }
}

/// A visitor that receives a fixed tuple list of trailing arguments after
/// the collected references.
///
/// Built by [`visit_all_with`] and [`Variant::visit_with`].
pub struct WithExtra<Extra, V> {
    extra: Extra,
    visitor: V,
}

impl<Args, Extra, V> VisitOnce<Args> for WithExtra<Extra, V>
where
    Args: Concat<Extra>,
    V: VisitOnce<Args::Output>,
{
    type Output = V::Output;

    fn visit_once(self, args: Args) -> V::Output {
        self.visitor.visit_once(args.concat(self.extra))
    }
}

/// The intermediate visitor of [`visit_all`].
///
/// It holds the references collected from the variants visited so far and
/// the variants still to visit; visiting the next variant appends its active
/// alternative and moves on, until the final visitor gets the whole list.
pub struct Collect<Args, Rest, V, R> {
    args: Args,
    rest: Rest,
    visitor: V,
    output: PhantomData<fn() -> R>,
}

impl<'a, T, Args, Rest, V, R> VisitOnce<&'a T> for Collect<Args, Rest, V, R>
where
    T: ?Sized,
    Args: Append<&'a T>,
    Rest: Dispatch<Args::Output, V, R>,
{
    type Output = Result<R, EmptyVariantAccess>;

    fn visit_once(self, value: &'a T) -> Self::Output {
        self.rest.dispatch(self.args.append(value), self.visitor)
    }
}

impl<'a, T, Args, Rest, V, R> VisitOnce<&'a mut T> for Collect<Args, Rest, V, R>
where
    T: ?Sized,
    Args: Append<&'a mut T>,
    Rest: Dispatch<Args::Output, V, R>,
{
    type Output = Result<R, EmptyVariantAccess>;

    fn visit_once(self, value: &'a mut T) -> Self::Output {
        self.rest.dispatch(self.args.append(value), self.visitor)
    }
}

/// The trait that tuple lists of variant references implement to be visited
/// together.
///
/// `Args` is the tuple list collected so far.
pub trait Dispatch<Args, V, R> {
    #[doc(hidden)]
    fn dispatch(self, args: Args, visitor: V) -> Result<R, EmptyVariantAccess>;
}

impl<Args, V, R> Dispatch<Args, V, R> for ()
where
    V: VisitOnce<Args, Output = R>,
{
    fn dispatch(self, args: Args, visitor: V) -> Result<R, EmptyVariantAccess> {
        Ok(visitor.visit_once(args))
    }
}

impl<'a, S, Rest, Args, V, R> Dispatch<Args, V, R> for (&'a Variant<S>, Rest)
where
    S: VisitRef<'a, Collect<Args, Rest, V, R>, Result<R, EmptyVariantAccess>>,
{
    fn dispatch(self, args: Args, visitor: V) -> Result<R, EmptyVariantAccess> {
        let (variant, rest) = self;
        let collect = Collect {
            args,
            rest,
            visitor,
            output: PhantomData,
        };
        variant.visit_once(collect)?
    }
}

impl<'a, S, Rest, Args, V, R> Dispatch<Args, V, R> for (&'a mut Variant<S>, Rest)
where
    S: VisitMut<'a, Collect<Args, Rest, V, R>, Result<R, EmptyVariantAccess>>,
{
    fn dispatch(self, args: Args, visitor: V) -> Result<R, EmptyVariantAccess> {
        let (variant, rest) = self;
        let collect = Collect {
            args,
            rest,
            visitor,
            output: PhantomData,
        };
        variant.visit_once_mut(collect)?
    }
}

/// Visits several variants at once.
///
/// `variants` is a tuple list of shared or mutable variant references, built
/// with [`t!`](crate::t). The visitor is called exactly once, with the active
/// alternatives in the same order. If any of the variants is valueless,
/// nothing is called and [`EmptyVariantAccess`] is returned.
///
/// # Examples
///
/// ```rust
/// use std::fmt::Display;
///
/// use tvariant::{Variant, Visitor, t, visit_all};
///
/// struct Pair;
///
/// impl<A: Display, B: Display> Visitor<(&A, (&B, ()))> for Pair {
///     type Output = String;
///
///     fn visit(&mut self, (a, (b, ())): (&A, (&B, ()))) -> String {
///         format!("({a}, {b})")
///     }
/// }
///
/// let a: Variant![i32, String] = Variant::new(0i32);
/// let b: Variant![i32, String] = Variant::convert("hello");
/// assert_eq!(visit_all(t![&a, &b], &mut Pair).as_deref(), Ok("(0, hello)"));
/// ```
pub fn visit_all<'v, L, V, R>(variants: L, visitor: &'v mut V) -> Result<R, EmptyVariantAccess>
where
    L: Dispatch<(), &'v mut V, R>,
    V: ?Sized,
{
    variants.dispatch((), visitor)
}

/// Visits several variants at once, passing `extra` after the collected
/// references.
///
/// `extra` is a tuple list, built with [`t!`](crate::t) like `variants`. The
/// visitor receives the active alternatives followed by its elements, so
/// `visit_all_with(t![&a, &b], t![x], v)` calls `v` with `(&A, (&B, (X, ())))`.
///
/// # Examples
///
/// ```rust
/// use tvariant::{Variant, Visitor, t, visit_all_with};
///
/// struct Scale;
///
/// impl Visitor<(&i64, (&i64, (i64, ())))> for Scale {
///     type Output = i64;
///
///     fn visit(&mut self, (a, (b, (k, ()))): (&i64, (&i64, (i64, ())))) -> i64 {
///         (a + b) * k
///     }
/// }
///
/// let a: Variant![i64] = Variant::new(2i64);
/// let b: Variant![i64] = Variant::new(3i64);
/// assert_eq!(visit_all_with(t![&a, &b], t![10i64], &mut Scale), Ok(50));
/// ```
pub fn visit_all_with<'v, L, E, V, R>(variants: L, extra: E, visitor: &'v mut V) -> Result<R, EmptyVariantAccess>
where
    L: Dispatch<(), WithExtra<E, &'v mut V>, R>,
    V: ?Sized,
{
    variants.dispatch((), WithExtra { extra, visitor })
}
