use core::any;

use thiserror::Error;

/// A typed access named an alternative other than the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bad variant access: expected `{expected}`, found `{}`", .found.unwrap_or("<valueless>"))]
pub struct BadVariantAccess {
    /// The alternative that was asked for.
    pub expected: &'static str,
    /// The alternative that was active, or `None` if the variant was valueless.
    pub found: Option<&'static str>,
}

impl BadVariantAccess {
    pub(crate) fn new<T>(found: Option<&'static str>) -> Self {
        BadVariantAccess {
            expected: any::type_name::<T>(),
            found,
        }
    }
}

/// A valueless variant was visited.
///
/// A variant only becomes valueless when an in-place construction fails after
/// the previous alternative was destroyed, or when its value is explicitly
/// [`take`](crate::Variant::take)n.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("visited a valueless variant")]
pub struct EmptyVariantAccess;
