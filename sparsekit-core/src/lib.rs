#![no_std]

//! Sparsekit Core - sparse matrix storage contracts
//!
//! This crate provides the layout policies, element and matrix traits, and
//! the dual cursor traversal protocol shared by every sparse storage engine.
//! It performs no allocation unless the `alloc` feature is enabled.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod layout;
pub mod traits;
pub mod traverse;
pub mod validation;

pub use error::*;
pub use layout::{Axis, ColumnMajor, Layout, Orientation, RowMajor};
pub use traits::*;
pub use traverse::{Cursor, Direction, Entries, Line, Located, Rank, Traverse};
