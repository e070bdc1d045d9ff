//! # Core Module
//!
//! Building blocks for structure comparison.
//!
//! - **Molecular Representation** ([`models`]) - Parsed atom records and ordered coordinate sets
//! - **File I/O** ([`io`]) - PDB reading/writing, coordinate extraction and the CSV report
//! - **Selections** ([`selection`]) - Residue and ignored-atom selection strings
//! - **Geometry** ([`geometry`]) - Centroids, Kabsch superposition and RMSD
//! - **Utilities** ([`utils`]) - Natural ordering of file names

pub mod geometry;
pub mod io;
pub mod models;
pub mod selection;
pub mod utils;
