//! High-level entry points of the library.
//!
//! - [`compare`] scores one model file against one target file.
//! - [`batch`] scores many model files against a shared target and applies the failure policy.

pub mod batch;
pub mod compare;
