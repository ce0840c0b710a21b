//! # sparsell
//!
//! **Sparse rank-N array storage backed by a recursive tree of key-ordered
//! linked lists.**
//!
//! A `ListStorage` holds an n-dimensional array where most coordinates share
//! one repeated fill value. Each dimension is a singly linked list of
//! (coordinate, value) entries; outer dimensions hold nested lists, the
//! innermost dimension holds leaf elements. Only coordinates whose value
//! differs in principle from the default are materialized, so memory scales
//! with the number of explicit entries, not with the shape.
//!
//! ## Features
//!
//! - **Point access**: get, insert and remove at a single coordinate path,
//!   with intermediate levels created on demand and pruned on removal
//! - **Structural equality**: two storages compare equal when they denote
//!   the same dense array, even with different defaults and different sets
//!   of materialized entries
//! - **Conversions**: deep copy, element-type cast, dense-to-sparse and
//!   sparse-to-dense
//! - **Multiple dtypes**: f64, f32, integers; f16/bf16 behind the `f16`
//!   feature
//!
//! ## Quick Start
//!
//! ```
//! use sparsell::prelude::*;
//!
//! let mut s = ListStorage::new([100, 100], 0.0f64)?;
//! s.insert(&Slice::point(&[3, 7]), 1.25)?;
//!
//! assert_eq!(*s.get(&Slice::point(&[3, 7]))?, 1.25);
//! assert_eq!(*s.get(&Slice::point(&[50, 50]))?, 0.0);
//! assert_eq!(s.nnz(), 1);
//!
//! s.remove(&Slice::point(&[3, 7]))?;
//! assert!(s.is_empty());
//! # Ok::<(), sparsell::error::Error>(())
//! ```
//!
//! ## Scope
//!
//! This crate is the list-of-lists storage core only: single-coordinate
//! point access, no ranged slicing, no arithmetic, no compressed sibling
//! formats. Storages are single-threaded values; share one across threads
//! behind external synchronization.
//!
//! ## Feature Flags
//!
//! - `f16`: half-precision float elements (`half::f16`, `half::bf16`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
mod list;
pub mod shape;
pub mod slice;
pub mod storage;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::shape::Shape;
    pub use crate::slice::Slice;
    pub use crate::storage::ListStorage;
}
