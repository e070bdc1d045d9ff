//! # Core Models Module
//!
//! Data structures describing the atoms read from a structure file and the ordered,
//! filtered coordinates handed to the geometry routines.
//!
//! - [`atom`] - A single `ATOM`/`HETATM` record and the label carried alongside each point
//! - [`structure`] - The atoms of one model, with selection into a [`coordinates::CoordinateSet`]
//! - [`coordinates`] - Ordered points paired 1:1 with their atom labels
//!
//! ```ignore
//! use rmsdcalc::core::io::{pdb::PdbFile, traits::StructureFile};
//! use rmsdcalc::core::selection::{IgnoreSelection, ResidueSelection};
//!
//! let structure = PdbFile::read_from_path("model_1.pdb")?;
//! let selection = ResidueSelection::parse("A:1-20")?;
//! let coords = structure.select(&selection, &IgnoreSelection::default());
//! ```

pub mod atom;
pub mod coordinates;
pub mod structure;
