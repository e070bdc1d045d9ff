//! # rmsdcalc Core Library
//!
//! Optimal rigid-body superposition (Kabsch) and RMSD of candidate molecular models against a
//! reference structure, as used to score predicted RNA and protein models.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `CoordinateSet`), the
//!   PDB coordinate extractor, selection parsing, and the pure geometry routines (centroid,
//!   Kabsch rotation, RMSD).
//!
//! - **[`engine`]: Shared Plumbing.** Error types, batch configuration and progress reporting
//!   used by the workflows.
//!
//! - **[`workflows`]: The Public API.** Pairwise comparison of two structure files and the
//!   batch driver that scores a naturally-sorted list of models against one target.

pub mod core;
pub mod engine;
pub mod workflows;
