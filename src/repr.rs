//! The module dealing with the underlying representation of the [`Variant`]
//! type.
//!
//! # Implementation details
//!
//! A variant is a hand-written tagged union. The memory layout of a variant
//! over `T![T1, T2]` resembles:
//!
//! ```rust,no_run
//! # use core::convert::Infallible;
//! # use core::mem::{ManuallyDrop, MaybeUninit};
//!
//! struct Nil(Infallible);
//! #[repr(C)]
//! union Cons<T, Next> {
//!     data: ManuallyDrop<T>,
//!     next: ManuallyDrop<Next>,
//! }
//!
//! // For example only. Not actually defined.
//! struct RawVariant2<T1, T2> {
//!     tag: u8,
//!     data: MaybeUninit<Cons<T1, Cons<T2, Nil>>>,
//! }
//! ```
//!
//! Every alternative lives at offset 0, so the storage is as large and as
//! aligned as the largest and strictest alternative. A list entry written
//! `rec T` becomes a [`Rec`] node, which stores an [`Indirection<T>`] in its
//! slot but hands out `T` everywhere else.
//!
//! All the traits are implemented upon this layout, peeling one tag off per
//! list node.
//!
//! [`Variant`]: crate::Variant
//! [`Indirection<T>`]: crate::Indirection

use core::{any, convert::Infallible, marker::PhantomData, mem::ManuallyDrop};

use crate::{
    Indirection, NarrowRem, Rem, Repr,
    index::{Index, UInt, UTerm},
};

/// The terminator type of the underlying union of the [`Variant`] type.
///
/// [`Variant`]: crate::Variant
pub struct Nil(pub(crate) Infallible);

/// The accumulator type of the underlying union of the [`Variant`] type.
///
/// [`Variant`]: crate::Variant
#[repr(C)]
pub union Cons<T, U> {
    pub(crate) data: ManuallyDrop<T>,
    pub(crate) next: ManuallyDrop<U>,
}

/// A type list node whose head alternative is stored behind an
/// [`Indirection`], so that it may contain the variant itself.
///
/// Written `rec T` inside [`T!`] and [`Variant!`]. It is never instantiated.
///
/// [`T!`]: crate::T
/// [`Variant!`]: crate::Variant
pub struct Rec<T, Tail>(Infallible, PhantomData<(T, Tail)>);

/// The trait that type lists implement to support its corresponding tagged
/// union representation for the [`Variant`] type.
///
/// [`Variant`]: crate::Variant
pub trait SumList {
    /// The underlying representation of the `Variant` type.
    type Repr;

    /// The number of alternatives in the list.
    const LEN: usize;

    #[doc(hidden)]
    unsafe fn drop(this: &mut Self::Repr, tag: u8);

    #[doc(hidden)]
    fn type_name(tag: u8) -> Option<&'static str>;
}

impl SumList for () {
    type Repr = Nil;
    const LEN: usize = 0;

    unsafe fn drop(_: &mut Nil, _: u8) {}

    fn type_name(_: u8) -> Option<&'static str> {
        None
    }
}

impl<Head, Tail> SumList for (Head, Tail)
where
    Tail: SumList,
{
    type Repr = Cons<Head, Tail::Repr>;
    const LEN: usize = 1 + Tail::LEN;

    unsafe fn drop(this: &mut Self::Repr, tag: u8) {
        if tag == 0 {
            unsafe { ManuallyDrop::drop(&mut this.data) };
        } else {
            unsafe { Tail::drop(&mut this.next, tag - 1) }
        }
    }

    fn type_name(tag: u8) -> Option<&'static str> {
        match tag.checked_sub(1) {
            None => Some(any::type_name::<Head>()),
            Some(tag) => Tail::type_name(tag),
        }
    }
}

impl<Head, Tail> SumList for Rec<Head, Tail>
where
    Tail: SumList,
{
    type Repr = Cons<Indirection<Head>, Tail::Repr>;
    const LEN: usize = 1 + Tail::LEN;

    unsafe fn drop(this: &mut Self::Repr, tag: u8) {
        if tag == 0 {
            unsafe { ManuallyDrop::drop(&mut this.data) };
        } else {
            unsafe { Tail::drop(&mut this.next, tag - 1) }
        }
    }

    fn type_name(tag: u8) -> Option<&'static str> {
        match tag.checked_sub(1) {
            None => Some(any::type_name::<Head>()),
            Some(tag) => Tail::type_name(tag),
        }
    }
}

/// A non-empty type list, viewed as its head alternative and the rest.
///
/// This is what the per-alternative behaviour in [`derive`](crate::derive)
/// and [`visit`](crate::visit) is written against, so that plain and
/// [`Rec`] nodes share one implementation.
pub trait Node: SumList {
    /// The alternative the head slot exposes.
    type Head;

    /// The type physically stored in the head slot.
    type Stored;

    /// The rest of the list.
    type Tail: SumList;

    #[doc(hidden)]
    fn from_head(head: Self::Head) -> Self::Repr;

    #[doc(hidden)]
    fn from_tail(tail: Repr<Self::Tail>) -> Self::Repr;

    #[doc(hidden)]
    unsafe fn head(this: &Self::Repr) -> &Self::Head;

    #[doc(hidden)]
    unsafe fn head_mut(this: &mut Self::Repr) -> &mut Self::Head;

    #[doc(hidden)]
    unsafe fn tail(this: &Self::Repr) -> &Repr<Self::Tail>;

    #[doc(hidden)]
    unsafe fn tail_mut(this: &mut Self::Repr) -> &mut Repr<Self::Tail>;
}

impl<Head, Tail> Node for (Head, Tail)
where
    Tail: SumList,
{
    type Head = Head;
    type Stored = Head;
    type Tail = Tail;

    fn from_head(head: Head) -> Self::Repr {
        Cons {
            data: ManuallyDrop::new(head),
        }
    }

    fn from_tail(tail: Tail::Repr) -> Self::Repr {
        Cons {
            next: ManuallyDrop::new(tail),
        }
    }

    unsafe fn head(this: &Self::Repr) -> &Head {
        unsafe { &*this.data }
    }

    unsafe fn head_mut(this: &mut Self::Repr) -> &mut Head {
        unsafe { &mut *this.data }
    }

    unsafe fn tail(this: &Self::Repr) -> &Tail::Repr {
        unsafe { &*this.next }
    }

    unsafe fn tail_mut(this: &mut Self::Repr) -> &mut Tail::Repr {
        unsafe { &mut *this.next }
    }
}

impl<Head, Tail> Node for Rec<Head, Tail>
where
    Tail: SumList,
{
    type Head = Head;
    type Stored = Indirection<Head>;
    type Tail = Tail;

    fn from_head(head: Head) -> Self::Repr {
        Cons {
            data: ManuallyDrop::new(Indirection::new(head)),
        }
    }

    fn from_tail(tail: Tail::Repr) -> Self::Repr {
        Cons {
            next: ManuallyDrop::new(tail),
        }
    }

    unsafe fn head(this: &Self::Repr) -> &Head {
        Indirection::get(unsafe { &this.data })
    }

    unsafe fn head_mut(this: &mut Self::Repr) -> &mut Head {
        Indirection::get_mut(unsafe { &mut this.data })
    }

    unsafe fn tail(this: &Self::Repr) -> &Tail::Repr {
        unsafe { &*this.next }
    }

    unsafe fn tail_mut(this: &mut Self::Repr) -> &mut Tail::Repr {
        unsafe { &mut *this.next }
    }
}

/// The trait that type lists implement to support manipulating a specified
/// alternative value marked by a specified index in the [`Variant`] type.
///
/// A list implements `Split<T, U>` exactly for the position `U` holding `T`,
/// so leaving `U` to inference resolves an alternative by its exact type:
///
/// ```rust
/// use tvariant::Variant;
///
/// let v: Variant![i32, String] = Variant::new(String::from("x"));
/// assert_eq!(v.index(), Some(1));
/// ```
///
/// A type that is not in the list does not build:
///
/// ```rust,compile_fail
/// use tvariant::Variant;
///
/// let v: Variant![i32, String] = Variant::new(1.5f64);
/// ```
///
/// Neither does a type that occurs twice, unless the index is spelled out:
///
/// ```rust,compile_fail
/// use tvariant::Variant;
///
/// let v: Variant![i32, i32] = Variant::new(1i32);
/// ```
///
/// Indexing past the end of the list does not build either:
///
/// ```rust,compile_fail
/// use tvariant::{Variant, index::U2};
///
/// let v: Variant![i32, String] = Variant::new(1i32);
/// let _ = v.get::<_, U2>();
/// ```
///
/// [`Variant`]: crate::Variant
pub trait Split<T, U: Index>: SumList {
    /// The type physically stored for `T`: `T` itself, or `Indirection<T>`
    /// for a `rec` alternative.
    type Stored;

    /// The remainder type list from splitting type list `Self` with type `T`
    /// and its index tag `U`.
    type Remainder: SumList;

    #[doc(hidden)]
    fn from_data(data: T) -> Self::Repr;

    #[doc(hidden)]
    unsafe fn into_data_unchecked(this: Self::Repr) -> T;

    #[doc(hidden)]
    unsafe fn get_unchecked(this: &Self::Repr) -> &T;

    #[doc(hidden)]
    unsafe fn get_unchecked_mut(this: &mut Self::Repr) -> &mut T;

    #[doc(hidden)]
    fn from_remainder(tag: u8) -> u8;

    #[doc(hidden)]
    fn try_unwrap(tag: u8) -> Result<(), u8>;
}

fn unwrap_head(tag: u8) -> Result<(), u8> {
    match tag.checked_sub(1) {
        None => Ok(()),
        Some(tag) => Err(tag),
    }
}

fn unwrap_at<U: Index>(tag: u8) -> Result<(), u8> {
    let cur = UInt::<U>::TAG;
    match tag.cmp(&cur) {
        core::cmp::Ordering::Equal => Ok(()),
        core::cmp::Ordering::Less => Err(tag),
        core::cmp::Ordering::Greater => Err(tag - 1),
    }
}

impl<Head, Tail> Split<Head, UTerm> for (Head, Tail)
where
    Tail: SumList,
{
    type Stored = Head;
    type Remainder = Tail;

    fn from_data(data: Head) -> Self::Repr {
        <Self as Node>::from_head(data)
    }

    unsafe fn into_data_unchecked(this: Self::Repr) -> Head {
        unsafe { ManuallyDrop::into_inner(this.data) }
    }

    unsafe fn get_unchecked(this: &Self::Repr) -> &Head {
        unsafe { <Self as Node>::head(this) }
    }

    unsafe fn get_unchecked_mut(this: &mut Self::Repr) -> &mut Head {
        unsafe { <Self as Node>::head_mut(this) }
    }

    fn from_remainder(tag: u8) -> u8 {
        tag + 1
    }

    fn try_unwrap(tag: u8) -> Result<(), u8> {
        unwrap_head(tag)
    }
}

impl<Head, Tail> Split<Head, UTerm> for Rec<Head, Tail>
where
    Tail: SumList,
{
    type Stored = Indirection<Head>;
    type Remainder = Tail;

    fn from_data(data: Head) -> Self::Repr {
        <Self as Node>::from_head(data)
    }

    unsafe fn into_data_unchecked(this: Self::Repr) -> Head {
        unsafe { ManuallyDrop::into_inner(this.data) }.into_inner()
    }

    unsafe fn get_unchecked(this: &Self::Repr) -> &Head {
        unsafe { <Self as Node>::head(this) }
    }

    unsafe fn get_unchecked_mut(this: &mut Self::Repr) -> &mut Head {
        unsafe { <Self as Node>::head_mut(this) }
    }

    fn from_remainder(tag: u8) -> u8 {
        tag + 1
    }

    fn try_unwrap(tag: u8) -> Result<(), u8> {
        unwrap_head(tag)
    }
}

impl<Head, Tail, T, U: Index> Split<T, UInt<U>> for (Head, Tail)
where
    Tail: Split<T, U>,
{
    type Stored = <Tail as Split<T, U>>::Stored;
    type Remainder = (Head, Rem<Tail, T, U>);

    fn from_data(data: T) -> Self::Repr {
        <Self as Node>::from_tail(<Tail as Split<T, U>>::from_data(data))
    }

    unsafe fn into_data_unchecked(this: Self::Repr) -> T {
        unsafe { <Tail as Split<T, U>>::into_data_unchecked(ManuallyDrop::into_inner(this.next)) }
    }

    unsafe fn get_unchecked(this: &Self::Repr) -> &T {
        unsafe { <Tail as Split<T, U>>::get_unchecked(<Self as Node>::tail(this)) }
    }

    unsafe fn get_unchecked_mut(this: &mut Self::Repr) -> &mut T {
        unsafe { <Tail as Split<T, U>>::get_unchecked_mut(<Self as Node>::tail_mut(this)) }
    }

    fn from_remainder(tag: u8) -> u8 {
        if tag < UInt::<U>::TAG { tag } else { tag + 1 }
    }

    fn try_unwrap(tag: u8) -> Result<(), u8> {
        unwrap_at::<U>(tag)
    }
}

impl<Head, Tail, T, U: Index> Split<T, UInt<U>> for Rec<Head, Tail>
where
    Tail: Split<T, U>,
{
    type Stored = <Tail as Split<T, U>>::Stored;
    type Remainder = Rec<Head, Rem<Tail, T, U>>;

    fn from_data(data: T) -> Self::Repr {
        <Self as Node>::from_tail(<Tail as Split<T, U>>::from_data(data))
    }

    unsafe fn into_data_unchecked(this: Self::Repr) -> T {
        unsafe { <Tail as Split<T, U>>::into_data_unchecked(ManuallyDrop::into_inner(this.next)) }
    }

    unsafe fn get_unchecked(this: &Self::Repr) -> &T {
        unsafe { <Tail as Split<T, U>>::get_unchecked(<Self as Node>::tail(this)) }
    }

    unsafe fn get_unchecked_mut(this: &mut Self::Repr) -> &mut T {
        unsafe { <Tail as Split<T, U>>::get_unchecked_mut(<Self as Node>::tail_mut(this)) }
    }

    fn from_remainder(tag: u8) -> u8 {
        if tag < UInt::<U>::TAG { tag } else { tag + 1 }
    }

    fn try_unwrap(tag: u8) -> Result<(), u8> {
        unwrap_at::<U>(tag)
    }
}

/// The trait that type lists implement to accept a value of type `V` through
/// the single alternative at index `U` that `V` converts [`Into`].
///
/// Resolution is by inference over `U`, so it succeeds only when exactly one
/// alternative accepts `V`:
///
/// ```rust
/// use tvariant::Variant;
///
/// let v: Variant![i32, String] = Variant::convert("hi");
/// assert_eq!(v.get::<String, _>().map(String::as_str), Some("hi"));
/// ```
///
/// ```rust,compile_fail
/// use tvariant::Variant;
///
/// // `i32` converts into both `i64` and `f64`.
/// let v: Variant![i64, f64] = Variant::convert(1i32);
/// ```
///
/// An alternative that is exactly `V` gets no priority over the others; it
/// is one more match. Select it with [`Variant::new`](crate::Variant::new)
/// instead:
///
/// ```rust,compile_fail
/// use tvariant::Variant;
///
/// // `i32` is an alternative, and also converts into `i64`.
/// let v: Variant![i64, i32] = Variant::convert(1i32);
/// ```
///
/// ```rust
/// use tvariant::Variant;
///
/// let v: Variant![i64, i32] = Variant::new(1i32);
/// assert_eq!(v.index(), Some(1));
/// ```
pub trait Convert<V, U: Index>: SumList {
    #[doc(hidden)]
    fn convert(value: V) -> Self::Repr;

    #[doc(hidden)]
    unsafe fn convert_assign(this: &mut Self::Repr, value: V);
}

impl<V, L> Convert<V, UTerm> for L
where
    L: Node,
    V: Into<L::Head>,
{
    fn convert(value: V) -> Self::Repr {
        L::from_head(value.into())
    }

    unsafe fn convert_assign(this: &mut Self::Repr, value: V) {
        *unsafe { L::head_mut(this) } = value.into();
    }
}

impl<V, L, U: Index> Convert<V, UInt<U>> for L
where
    L: Node,
    L::Tail: Convert<V, U>,
{
    fn convert(value: V) -> Self::Repr {
        L::from_tail(<L::Tail as Convert<V, U>>::convert(value))
    }

    unsafe fn convert_assign(this: &mut Self::Repr, value: V) {
        unsafe { <L::Tail as Convert<V, U>>::convert_assign(L::tail_mut(this), value) }
    }
}

/// The trait that type lists implement to be able to be splitted from another
/// type list.
///
/// `Self: SplitList<Sub, UMap>` holds when every alternative of `Sub` occurs
/// in `Self`, stored the same way, at the positions listed by `UMap`.
pub trait SplitList<Sub: SumList, UMap>: SumList {
    /// The remainder type list from splitting type list `Self` with type list
    /// `Sub` and its index tag map `UMap`.
    type Remainder: SumList;

    #[doc(hidden)]
    fn broaden_tag(tag: u8) -> u8;

    #[doc(hidden)]
    fn narrow_tag(tag: u8) -> Result<u8, u8>;
}

impl<T: SumList> SplitList<(), ()> for T {
    type Remainder = Self;

    fn broaden_tag(tag: u8) -> u8 {
        unreachable!("mapping tag {tag} from an empty set")
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Err(tag)
    }
}

impl<Sub, Super, HeadIndex: Index, TailIndex> SplitList<Sub, (HeadIndex, TailIndex)> for Super
where
    Sub: Node,
    Super: Split<Sub::Head, HeadIndex, Stored = Sub::Stored>,
    Rem<Super, Sub::Head, HeadIndex>: SplitList<Sub::Tail, TailIndex>,
{
    type Remainder = NarrowRem<Rem<Super, Sub::Head, HeadIndex>, Sub::Tail, TailIndex>;

    fn broaden_tag(tag: u8) -> u8 {
        match unwrap_head(tag) {
            Ok(()) => HeadIndex::TAG,
            Err(remainder) => {
                let ret = <Rem<Super, Sub::Head, HeadIndex> as SplitList<Sub::Tail, TailIndex>>::broaden_tag(remainder);
                <Super as Split<Sub::Head, HeadIndex>>::from_remainder(ret)
            }
        }
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Ok(match <Super as Split<Sub::Head, HeadIndex>>::try_unwrap(tag) {
            Ok(()) => 0,
            Err(remainder) => {
                <Rem<Super, Sub::Head, HeadIndex> as SplitList<Sub::Tail, TailIndex>>::narrow_tag(remainder)? + 1
            }
        })
    }
}
