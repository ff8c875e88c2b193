/// Constructs a [`struct@Variant`] type from a list of alternative types.
///
/// Prefix an alternative with `rec` when it contains the variant itself; it is
/// then stored behind an [`Indirection`](crate::Indirection), which keeps the
/// variant finitely sized.
///
/// # Examples
///
/// ```rust
/// use tvariant::{Blank, Variant};
///
/// type Number = Variant![i32, u32, f64];
/// let n: Number = Variant::new(42u32);
/// assert_eq!(n.index(), Some(1));
///
/// struct Pair(Tree, Tree);
/// type Tree = Variant![Blank, i32, rec Pair];
///
/// let leaf = |n: i32| -> Tree { Variant::new(n) };
/// let tree: Tree = Variant::new(Pair(leaf(1), leaf(2)));
/// assert!(tree.holds::<Pair, _>());
/// ```
#[macro_export]
macro_rules! Variant {
    [$($t:tt)*] => [$crate::Variant::<$crate::T![$($t)*]>];
}

/// Constructs a tuple list (heterogeneous list) type from a list of types.
///
/// `rec T` entries become [`Rec`](crate::repr::Rec) nodes. The value version
/// of the macro is [`t`].
///
/// # Examples
///
/// ```rust
/// use tvariant::T;
///
/// type MyList = T![i32, u32, f64];
/// let list: MyList = (42i32, (42u32, (42.0f64, ())));
/// ```
#[macro_export]
macro_rules! T {
    [] => [()];
    [rec $head:ty $(, $($rest:tt)*)?] => [$crate::repr::Rec<$head, $crate::T![$($($rest)*)?]>];
    [$head:ty $(, $($rest:tt)*)?] => [($head, $crate::T![$($($rest)*)?])];
}

/// Constructs a tuple list (heterogeneous list) value from a list of values.
///
/// The type version of the macro is [`T`]. [`visit_all`](crate::visit_all)
/// takes its variants as such a list.
///
/// # Examples
///
/// ```rust
/// use tvariant::t;
///
/// type MyList = (i32, (u32, (f64, ())));
/// let list: MyList = t![42i32, 42u32, 42.0f64];
/// ```
#[macro_export]
macro_rules! t {
    [] => [()];
    [$head:expr $(, $t:expr)* $(,)?] => [($head, $crate::t!($($t,)*))];
}
