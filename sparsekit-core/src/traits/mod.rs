//! Abstract interfaces for sparse storage
//!
//! This module defines the trait abstractions shared by every storage engine.
//! Traits are pure interfaces - no concrete engines.

pub mod element;
pub mod element_ref;
pub mod matrix;

pub use element::MatrixElement;
pub use element_ref::ElementRef;
#[cfg(feature = "alloc")]
pub use matrix::MatrixOperations;
pub use matrix::{SparseMatrix, SparseMatrixMut};
