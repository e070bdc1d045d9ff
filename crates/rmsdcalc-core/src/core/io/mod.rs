//! Provides input/output functionality for structure files and reports.
//!
//! Structure files are read through the [`traits::StructureFile`] interface (currently
//! implemented for PDB), turned into coordinate sets by a [`extract::CoordinateExtractor`],
//! and batch results are written out as CSV by [`report`].

pub mod extract;
pub mod pdb;
pub mod report;
pub mod traits;
