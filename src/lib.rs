#![doc = include_str!("../README.md")]
#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;
#[cfg(test)]
extern crate std;

use core::{
    any,
    cmp::Ordering,
    convert::Infallible,
    fmt,
    mem::{self, ManuallyDrop, MaybeUninit},
    ptr,
};

#[macro_use]
mod macros;

pub mod derive;
pub mod error;
pub mod index;
mod indirection;
pub mod repr;
pub mod visit;

#[cfg(feature = "macros")]
pub use tvariant_macros::match_variant;

pub use self::{
    error::{BadVariantAccess, EmptyVariantAccess},
    indirection::Indirection,
    visit::{VisitOnce, Visitor, visit_all, visit_all_with},
};
use self::{
    derive::{SumClone, SumDebug, SumDisplay, SumPartialEq, SumPartialOrd},
    index::Index,
    repr::{Convert, Node, Split, SplitList, SumList},
    visit::{Dispatch, VisitMut, VisitRef, WithExtra},
};

pub type Repr<S> = <S as repr::SumList>::Repr;
pub type Rem<S, T, U> = <S as repr::Split<T, U>>::Remainder;
pub type NarrowRem<S, S2, UMap> = <S as repr::SplitList<S2, UMap>>::Remainder;

const VALUELESS: u8 = u8::MAX;

/// A unit alternative standing for "no value".
///
/// Put first in a list, it gives the variant a cheap default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Blank;

impl fmt::Display for Blank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("blank")
    }
}

/// A value of exactly one of the types in the list `S`.
///
/// The value is stored inline, with a one-byte tag recording which
/// alternative is active. Build the type with [`Variant!`](crate::Variant!).
///
/// A variant always holds a value, with two exceptions: after an in-place
/// construction failed ([`try_emplace_with`](Variant::try_emplace_with) or a
/// panicking [`emplace_with`](Variant::emplace_with)), and after the value was
/// explicitly moved out with [`take`](Variant::take). Such a variant is
/// *valueless*: [`index`](Variant::index) returns `None`, visiting it fails
/// with [`EmptyVariantAccess`], and it compares unequal to everything.
pub struct Variant<S: SumList> {
    tag: u8,
    data: MaybeUninit<Repr<S>>,
}

impl<S: Node> Default for Variant<S>
where
    S::Head: Default,
{
    /// Holds the default value of the first alternative.
    fn default() -> Self {
        Variant::from_repr(S::from_head(Default::default()), 0)
    }
}

impl<T> From<T> for Variant![T] {
    /// Construct a `Variant` of one type from a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let v: Variant![i32] = 42.into();
    /// assert_eq!(v.get(), Some(&42));
    /// ```
    fn from(value: T) -> Self {
        Variant::new(value)
    }
}

impl Variant![] {
    /// Consumes a variant over no alternatives.
    ///
    /// Such a variant can only be valueless, so this always panics with
    /// [`EmptyVariantAccess`]. It ends the expansion of
    /// [`match_variant!`](crate::match_variant!) once every alternative has
    /// been split off.
    #[track_caller]
    pub fn unreachable(self) -> ! {
        tracing::error!("matched a valueless variant");
        panic!("{EmptyVariantAccess}")
    }
}

impl<S: SumList> Variant<S> {
    /// The number of alternatives.
    pub const LEN: usize = S::LEN;

    fn valueless() -> Self {
        Variant {
            tag: VALUELESS,
            data: MaybeUninit::uninit(),
        }
    }

    fn from_repr(repr: Repr<S>, tag: u8) -> Self {
        const { assert!(S::LEN <= VALUELESS as usize, "a variant holds at most 255 alternatives") };
        Variant {
            tag,
            data: MaybeUninit::new(repr),
        }
    }

    /// Moves the value into a new variant, leaving this one valueless.
    fn relocate(&mut self) -> Self {
        mem::replace(self, Variant::valueless())
    }

    fn into_raw(self) -> (u8, MaybeUninit<Repr<S>>) {
        let this = ManuallyDrop::new(self);
        (this.tag, unsafe { ptr::read(&this.data) })
    }

    /// Stores `repr` into a valueless variant.
    fn construct(&mut self, repr: Repr<S>, tag: u8) {
        debug_assert!(self.is_valueless());
        self.data = MaybeUninit::new(repr);
        self.tag = tag;
    }

    /// Drops the active alternative, if any.
    ///
    /// The tag is cleared first, so a panicking destructor leaves the variant
    /// valueless instead of dropping twice.
    fn destroy(&mut self) {
        let tag = mem::replace(&mut self.tag, VALUELESS);
        if tag != VALUELESS {
            unsafe { <S as SumList>::drop(self.data.assume_init_mut(), tag) }
        }
    }

    unsafe fn repr(&self) -> &Repr<S> {
        unsafe { self.data.assume_init_ref() }
    }

    unsafe fn repr_mut(&mut self) -> &mut Repr<S> {
        unsafe { self.data.assume_init_mut() }
    }

    fn bad_access<T>(&self) -> BadVariantAccess {
        BadVariantAccess::new::<T>(self.type_name())
    }
}

impl<S: SumList> Variant<S> {
    /// Creates a variant holding `value`.
    ///
    /// The alternative is the one whose type is exactly `T`. If `T` occurs
    /// more than once in the list, name the index `U` explicitly.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::{Variant, index::U2};
    ///
    /// let v: Variant![i32, String, i32] = Variant::new(String::new());
    /// assert_eq!(v.index(), Some(1));
    ///
    /// let v: Variant![i32, String, i32] = Variant::new::<_, U2>(5);
    /// assert_eq!(v.index(), Some(2));
    /// ```
    pub fn new<T, U>(value: T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        Self::from_repr(S::from_data(value), U::TAG)
    }

    /// Creates a variant holding the value built by `f`.
    pub fn new_with<T, U>(f: impl FnOnce() -> T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        Self::new::<T, U>(f())
    }

    /// Creates a variant holding `value` converted into the one alternative
    /// it converts [`Into`].
    ///
    /// An alternative of type `V` itself counts as one more match, so
    /// `Variant![i64, i32]::convert(1i32)` is ambiguous and fails to build.
    /// Use [`new`](Variant::new) when `V` is itself one of the alternatives.
    pub fn convert<V, U>(value: V) -> Self
    where
        S: Convert<V, U>,
        U: Index,
    {
        Self::from_repr(S::convert(value), U::TAG)
    }

    /// The position of the active alternative, or `None` if valueless.
    pub fn index(&self) -> Option<usize> {
        (self.tag != VALUELESS).then_some(self.tag as usize)
    }

    /// Checks whether the variant holds no value.
    pub fn is_valueless(&self) -> bool {
        self.tag == VALUELESS
    }

    /// Checks whether the active alternative is `T` (at `U`).
    pub fn holds<T, U>(&self) -> bool
    where
        S: Split<T, U>,
        U: Index,
    {
        self.tag == U::TAG
    }

    /// The type name of the active alternative, or `None` if valueless.
    pub fn type_name(&self) -> Option<&'static str> {
        S::type_name(self.tag)
    }

    /// Returns the value if it is of type `T`.
    pub fn get<T, U>(&self) -> Option<&T>
    where
        S: Split<T, U>,
        U: Index,
    {
        (self.tag == U::TAG).then(|| unsafe { S::get_unchecked(self.repr()) })
    }

    /// Returns the value mutably if it is of type `T`.
    pub fn get_mut<T, U>(&mut self) -> Option<&mut T>
    where
        S: Split<T, U>,
        U: Index,
    {
        (self.tag == U::TAG).then(|| unsafe { S::get_unchecked_mut(self.repr_mut()) })
    }

    /// Returns the value if it is of type `T`, or describes what was found
    /// instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let v: Variant![i32, String] = Variant::new(1i32);
    /// let err = v.try_get::<String, _>().unwrap_err();
    /// assert_eq!(err.found, Some("i32"));
    /// ```
    pub fn try_get<T, U>(&self) -> Result<&T, BadVariantAccess>
    where
        S: Split<T, U>,
        U: Index,
    {
        self.get::<T, U>().ok_or_else(|| self.bad_access::<T>())
    }

    /// Like [`try_get`](Variant::try_get), returning the value mutably.
    pub fn try_get_mut<T, U>(&mut self) -> Result<&mut T, BadVariantAccess>
    where
        S: Split<T, U>,
        U: Index,
    {
        if self.tag == U::TAG {
            Ok(unsafe { S::get_unchecked_mut(self.repr_mut()) })
        } else {
            Err(self.bad_access::<T>())
        }
    }

    /// Moves the value out if it is of type `T`; otherwise the variant is
    /// dropped and the error describes what it held.
    pub fn try_into_inner<T, U>(self) -> Result<T, BadVariantAccess>
    where
        S: Split<T, U>,
        U: Index,
    {
        let found = self.type_name();
        self.try_unwrap::<T, U>()
            .map_err(|_| BadVariantAccess::new::<T>(found))
    }

    /// Moves the value out if it is of type `T`, or returns the variant
    /// re-typed over the remaining alternatives.
    ///
    /// A valueless variant stays valueless.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let v: Variant![i32, String, f64] = Variant::new(2.5f64);
    /// let rem: Variant![i32, f64] = v.try_unwrap::<String, _>().unwrap_err();
    /// assert_eq!(rem.try_unwrap::<f64, _>().ok(), Some(2.5));
    /// ```
    pub fn try_unwrap<T, U>(self) -> Result<T, Variant<Rem<S, T, U>>>
    where
        S: Split<T, U>,
        U: Index,
    {
        let (tag, data) = self.into_raw();
        if tag == VALUELESS {
            return Err(Variant::valueless());
        }
        match S::try_unwrap(tag) {
            Ok(()) => Ok(unsafe { S::into_data_unchecked(data.assume_init()) }),
            Err(tag) => Err(Variant {
                tag,
                data: unsafe { mem::transmute_copy(&data) },
            }),
        }
    }
}

impl<S: SumList> Variant<S> {
    /// Stores `value` as alternative `T`.
    ///
    /// If `T` is already active, the value is assigned in place. Otherwise
    /// the old value is moved aside, the new one is stored, and only then
    /// is the old one dropped.
    pub fn assign<T, U>(&mut self, value: T)
    where
        S: Split<T, U>,
        U: Index,
    {
        if self.tag == U::TAG {
            *unsafe { S::get_unchecked_mut(self.repr_mut()) } = value;
        } else {
            let scratch = self.relocate();
            self.construct(S::from_data(value), U::TAG);
            drop(scratch);
        }
    }

    /// Like [`assign`](Variant::assign), converting `value` into the one
    /// alternative it converts [`Into`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let mut v: Variant![i32, String] = Variant::new(1i32);
    /// v.set("text");
    /// assert_eq!(v.get::<String, _>().map(String::as_str), Some("text"));
    /// ```
    pub fn set<V, U>(&mut self, value: V)
    where
        S: Convert<V, U>,
        U: Index,
    {
        if self.tag == U::TAG {
            unsafe { S::convert_assign(self.repr_mut(), value) }
        } else {
            let scratch = self.relocate();
            self.construct(S::convert(value), U::TAG);
            drop(scratch);
        }
    }

    /// Drops the current value and stores `value` as alternative `T`.
    pub fn emplace<T, U>(&mut self, value: T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        self.emplace_with::<T, U>(|| value)
    }

    /// Drops the current value, then stores the value built by `f`.
    ///
    /// If `f` panics, the variant is left valueless.
    pub fn emplace_with<T, U>(&mut self, f: impl FnOnce() -> T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        match self.try_emplace_with::<T, U, Infallible>(|| Ok(f())) {
            Ok(value) => value,
            Err(err) => match err {},
        }
    }

    /// Drops the current value, then stores the value built by `f`.
    ///
    /// If `f` fails, the variant is left valueless and the error is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::Variant;
    ///
    /// let mut v: Variant![i32, String] = Variant::new(1i32);
    /// let res = v.try_emplace_with::<String, _, _>(|| Err("no memory"));
    /// assert_eq!(res, Err("no memory"));
    /// assert!(v.is_valueless());
    /// ```
    pub fn try_emplace_with<T, U, E>(&mut self, f: impl FnOnce() -> Result<T, E>) -> Result<&mut T, E>
    where
        S: Split<T, U>,
        U: Index,
    {
        self.destroy();
        match f() {
            Ok(value) => {
                self.construct(S::from_data(value), U::TAG);
                Ok(unsafe { S::get_unchecked_mut(self.repr_mut()) })
            }
            Err(err) => {
                tracing::debug!(
                    alternative = any::type_name::<T>(),
                    "in-place construction failed, variant left valueless"
                );
                Err(err)
            }
        }
    }

    /// Moves the value out, leaving this variant valueless.
    pub fn take(&mut self) -> Self {
        let taken = self.relocate();
        if let Some(name) = taken.type_name() {
            tracing::debug!(alternative = name, "value taken, variant left valueless");
        }
        taken
    }

    /// Stores `other`, returning the previous contents.
    pub fn replace(&mut self, other: Self) -> Self {
        mem::replace(self, other)
    }

    /// Passes a valued variant through, and panics with
    /// [`EmptyVariantAccess`] on a valueless one.
    #[track_caller]
    pub fn ensure_valued(self) -> Self {
        if self.is_valueless() {
            tracing::error!("accessed a valueless variant");
            panic!("{EmptyVariantAccess}");
        }
        self
    }
}

impl<S: SumList> Variant<S> {
    /// Calls `visitor` with a reference to the active alternative.
    ///
    /// See the [`visit`](crate::visit) module for how visitors are written.
    pub fn visit<'a, 'v, V, R>(&'a self, visitor: &'v mut V) -> Result<R, EmptyVariantAccess>
    where
        S: VisitRef<'a, &'v mut V, R>,
        V: ?Sized,
    {
        self.visit_once(visitor)
    }

    /// Calls `visitor` with a mutable reference to the active alternative.
    pub fn visit_mut<'a, 'v, V, R>(&'a mut self, visitor: &'v mut V) -> Result<R, EmptyVariantAccess>
    where
        S: VisitMut<'a, &'v mut V, R>,
        V: ?Sized,
    {
        self.visit_once_mut(visitor)
    }

    /// Like [`visit`](Variant::visit), consuming the visitor.
    pub fn visit_once<'a, V, R>(&'a self, visitor: V) -> Result<R, EmptyVariantAccess>
    where
        S: VisitRef<'a, V, R>,
    {
        if self.is_valueless() {
            return Err(EmptyVariantAccess);
        }
        Ok(unsafe { S::visit_ref(self.repr(), self.tag, visitor) })
    }

    /// Like [`visit_mut`](Variant::visit_mut), consuming the visitor.
    pub fn visit_once_mut<'a, V, R>(&'a mut self, visitor: V) -> Result<R, EmptyVariantAccess>
    where
        S: VisitMut<'a, V, R>,
    {
        if self.is_valueless() {
            return Err(EmptyVariantAccess);
        }
        let tag = self.tag;
        Ok(unsafe { S::visit_mut(self.repr_mut(), tag, visitor) })
    }

    /// Calls `visitor` with the active alternative followed by the elements
    /// of the tuple list `extra`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tvariant::{Variant, Visitor, t};
    ///
    /// struct Pad;
    ///
    /// impl Visitor<(&i32, (usize, ()))> for Pad {
    ///     type Output = String;
    ///
    ///     fn visit(&mut self, (n, (width, ())): (&i32, (usize, ()))) -> String {
    ///         format!("{n:>width$}")
    ///     }
    /// }
    ///
    /// impl Visitor<(&String, (usize, ()))> for Pad {
    ///     type Output = String;
    ///
    ///     fn visit(&mut self, (s, (width, ())): (&String, (usize, ()))) -> String {
    ///         format!("{s:>width$}")
    ///     }
    /// }
    ///
    /// let v: Variant![i32, String] = Variant::new(42i32);
    /// assert_eq!(v.visit_with(t![4usize], &mut Pad).as_deref(), Ok("  42"));
    /// ```
    pub fn visit_with<'a, 'v, E, V, R>(&'a self, extra: E, visitor: &'v mut V) -> Result<R, EmptyVariantAccess>
    where
        (&'a Self, ()): Dispatch<(), WithExtra<E, &'v mut V>, R>,
        V: ?Sized,
    {
        visit_all_with((self, ()), extra, visitor)
    }

    /// Like [`visit_with`](Variant::visit_with), passing a mutable reference.
    pub fn visit_mut_with<'a, 'v, E, V, R>(
        &'a mut self,
        extra: E,
        visitor: &'v mut V,
    ) -> Result<R, EmptyVariantAccess>
    where
        (&'a mut Self, ()): Dispatch<(), WithExtra<E, &'v mut V>, R>,
        V: ?Sized,
    {
        visit_all_with((self, ()), extra, visitor)
    }
}

impl<S: SumList> Variant<S> {
    /// Re-types the variant over the sub-list `S2` if one of its
    /// alternatives is active, or over the rest of the list otherwise.
    ///
    /// The value is not moved.
    pub fn narrow<S2, UMap>(self) -> Result<Variant<S2>, Variant<NarrowRem<S, S2, UMap>>>
    where
        S: SplitList<S2, UMap>,
        S2: SumList,
    {
        let (tag, data) = self.into_raw();
        if tag == VALUELESS {
            return Err(Variant::valueless());
        }
        match <S as SplitList<S2, UMap>>::narrow_tag(tag) {
            Ok(tag) => Ok(Variant {
                tag,
                data: unsafe { mem::transmute_copy(&data) },
            }),
            Err(tag) => Err(Variant {
                tag,
                data: unsafe { mem::transmute_copy(&data) },
            }),
        }
    }

    /// Re-types the variant over the super-list `S2`.
    pub fn broaden<S2, UMap>(self) -> Variant<S2>
    where
        S2: SplitList<S, UMap>,
    {
        let (tag, data) = self.into_raw();
        if tag == VALUELESS {
            return Variant::valueless();
        }
        let tag = <S2 as SplitList<S, UMap>>::broaden_tag(tag);
        let mut wide = MaybeUninit::<Repr<S2>>::uninit();
        unsafe { wide.as_mut_ptr().cast::<MaybeUninit<Repr<S>>>().write(data) };
        Variant { tag, data: wide }
    }
}

impl<S: SumDebug> fmt::Debug for Variant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valueless() {
            return f.write_str("<valueless>");
        }
        unsafe { <S as SumDebug>::fmt(self.repr(), self.tag, f) }
    }
}

impl<S: SumDisplay> fmt::Display for Variant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valueless() {
            return f.write_str("<valueless>");
        }
        unsafe { <S as SumDisplay>::fmt(self.repr(), self.tag, f) }
    }
}

impl<S: SumList> Drop for Variant<S> {
    fn drop(&mut self) {
        self.destroy()
    }
}

impl<S: SumClone> Clone for Variant<S> {
    fn clone(&self) -> Self {
        if self.is_valueless() {
            return Variant::valueless();
        }
        Variant::from_repr(unsafe { <S as SumClone>::clone(self.repr(), self.tag) }, self.tag)
    }

    /// Clones in place when both sides hold the same alternative.
    ///
    /// Otherwise the source is cloned first, so a panicking clone leaves
    /// `self` untouched.
    fn clone_from(&mut self, source: &Self) {
        let tag = source.tag;
        if tag == VALUELESS {
            self.destroy();
        } else if self.tag == tag {
            unsafe { <S as SumClone>::clone_from(self.repr_mut(), source.repr(), tag) }
        } else {
            let repr = unsafe { <S as SumClone>::clone(source.repr(), tag) };
            self.destroy();
            self.construct(repr, tag);
        }
    }
}

impl<S: SumPartialEq> PartialEq for Variant<S> {
    /// Valueless variants are unequal to everything, themselves included.
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && !self.is_valueless()
            && unsafe { <S as SumPartialEq>::eq(self.repr(), other.repr(), self.tag) }
    }
}

impl<S: SumPartialOrd> PartialOrd for Variant<S> {
    /// Orders by alternative index first, then by value.
    ///
    /// A valueless variant sorts before every valued one, and two valueless
    /// variants are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.tag != other.tag {
            return Some(self.index().cmp(&other.index()));
        }
        if self.is_valueless() {
            return None;
        }
        unsafe { <S as SumPartialOrd>::partial_cmp(self.repr(), other.repr(), self.tag) }
    }
}
