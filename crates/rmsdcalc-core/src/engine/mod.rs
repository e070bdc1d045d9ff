//! # Engine Module
//!
//! Shared plumbing for the comparison workflows.
//!
//! - **Configuration** ([`config`]) - Selections per side, failure policy and batch inputs
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - The error type returned by every workflow

pub mod config;
pub mod error;
pub mod progress;
