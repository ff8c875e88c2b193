//! Type-level alternative indices.
//!
//! An index is a Peano number: [`UTerm`] is the first alternative and
//! `UInt<U>` the one after `U`. They only exist at the type level and are
//! usually inferred, but can be named to pick an alternative by position:
//!
//! ```rust
//! use tvariant::{Variant, index::U1};
//!
//! let v: Variant![u8, u8] = Variant::new::<_, U1>(7);
//! assert_eq!(v.index(), Some(1));
//! ```
#![allow(missing_docs)]

use core::marker::PhantomData;

pub struct UTerm;

pub struct UInt<U>(PhantomData<U>);

pub trait Index {
    const TAG: u8;
}

impl Index for UTerm {
    const TAG: u8 = 0;
}

impl<U: Index> Index for UInt<U> {
    const TAG: u8 = 1 + U::TAG;
}

pub type U0 = UTerm;
pub type U1 = UInt<U0>;
pub type U2 = UInt<U1>;
pub type U3 = UInt<U2>;
pub type U4 = UInt<U3>;
pub type U5 = UInt<U4>;
pub type U6 = UInt<U5>;
pub type U7 = UInt<U6>;
pub type U8 = UInt<U7>;
pub type U9 = UInt<U8>;

pub type U10 = UInt<U9>;
pub type U11 = UInt<U10>;
pub type U12 = UInt<U11>;
pub type U13 = UInt<U12>;
pub type U14 = UInt<U13>;
pub type U15 = UInt<U14>;
