//! Collection types used across trellis.
//!
//! Re-exports AHash-backed hash collections so every crate hashes the same way.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
