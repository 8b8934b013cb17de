//! Index and capacity validation utilities
//!
//! Pure functions with no storage dependencies, shared by every engine.

pub mod bounds;

pub use bounds::{check_index, checked_area, grown_capacity, max_nonzeros};
