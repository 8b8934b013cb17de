//! Error types for sparse storage operations

/// Errors reported by the storage engines
///
/// Every variant is a caller-contract violation. Internal invariant breaches
/// are engine defects and are asserted in debug builds instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseError {
    /// Row or column outside the declared extents
    IndexOutOfBounds,
    /// `push_back` key not strictly greater than the last appended key
    OrderViolation,
    /// `pop_back` on a structure with no stored entries
    Underflow,
    /// `resize` asked to keep existing entries
    PreserveUnsupported,
    /// Direct element access to an entry that is not stored
    MissingElement,
}

/// Coarse grouping of [`SparseError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Index arithmetic on the caller side went wrong
    Bounds,
    /// A precondition of a fast path was not met
    Contract,
    /// The operation is not implemented by this core
    Unsupported,
}

impl SparseError {
    /// Category this error belongs to
    pub const fn category(&self) -> ErrorCategory {
        match self {
            SparseError::IndexOutOfBounds => ErrorCategory::Bounds,
            SparseError::OrderViolation
            | SparseError::Underflow
            | SparseError::MissingElement => ErrorCategory::Contract,
            SparseError::PreserveUnsupported => ErrorCategory::Unsupported,
        }
    }
}

impl core::fmt::Display for SparseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            SparseError::IndexOutOfBounds => "Index out of bounds",
            SparseError::OrderViolation => "push_back key is not strictly ascending",
            SparseError::Underflow => "pop_back on an empty structure",
            SparseError::PreserveUnsupported => "resize with preserve is not supported",
            SparseError::MissingElement => "element is not stored",
        };
        write!(f, "{msg}")
    }
}

/// Result type for sparse storage operations
pub type Result<T> = core::result::Result<T, SparseError>;
