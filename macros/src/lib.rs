use proc_macro::TokenStream;

mod pat;

/// Matches a variant by value, one arm per alternative.
///
/// The alternative an arm handles is read off its pattern: a struct,
/// tuple-struct or unit path (`Point { x, .. }`, `Pair(l, r)`, `Blank`), a
/// suffixed literal (`0i32`, `'c'`, `"text"`), or an explicitly typed binding
/// (`n: i32`). Arms may have guards, and `_` handles every remaining
/// alternative. Leaving an alternative unhandled does not build.
///
/// The matched expression is consumed. Matching a valueless variant panics
/// with `EmptyVariantAccess`.
///
/// ```rust
/// use tvariant::{Blank, Variant, match_variant};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let v: Variant![Blank, i32, Point] = Variant::new(Point { x: 1, y: 2 });
/// let n = match_variant!(v {
///     Blank => 0,
///     n: i32 if n < 0 => -n,
///     n: i32 => n,
///     Point { x, y } => x + y,
/// });
/// assert_eq!(n, 3);
/// ```
#[proc_macro]
pub fn match_variant(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as pat::VariantMatch);
    pat::expand_match(input).into()
}
