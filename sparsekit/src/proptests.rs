//! Property-based tests for the storage engines.
