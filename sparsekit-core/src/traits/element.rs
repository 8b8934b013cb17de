//! Matrix element type constraints
//!
//! This module defines the trait that constrains what types can be
//! stored as matrix elements in any of the storage engines.

/// Trait for types that can be stored as matrix elements
///
/// All matrix element types must be:
/// - Copy: values are handed out by value, never by long-lived reference
/// - PartialEq: stored values can be compared
/// - Debug: assertion messages can print them
///
/// Every element type has an additive identity, which is the value reported
/// for any position without a stored entry.
pub trait MatrixElement: Copy + PartialEq + core::fmt::Debug + Sized {
    /// The additive identity (implicit zero)
    fn zero() -> Self;

    /// Whether this value equals the additive identity
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

macro_rules! impl_matrix_element {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl MatrixElement for $ty {
                fn zero() -> Self {
                    $zero
                }
            }
        )*
    };
}

impl_matrix_element! {
    f32 => 0.0,
    f64 => 0.0,
    i32 => 0,
    i64 => 0,
    u32 => 0,
    u64 => 0,
    usize => 0,
}
