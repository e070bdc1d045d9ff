use super::pdb::{PdbError, PdbFile};
use super::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use crate::core::models::coordinates::CoordinateSet;
use crate::core::selection::{IgnoreSelection, ResidueSelection};
use std::path::Path;
use tracing::debug;

/// Produces the ordered, filtered coordinates of a structure file.
///
/// This is the seam between file handling and the geometry: workflows only ever see
/// [`CoordinateSet`]s obtained through an extractor.
pub trait CoordinateExtractor: Sync {
    /// Reads `path` and returns the coordinates of the atoms in `selection` that are not
    /// listed in `ignore`, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn extract(
        &self,
        path: &Path,
        selection: &ResidueSelection,
        ignore: &IgnoreSelection,
    ) -> Result<CoordinateSet, PdbError>;
}

/// Extracts coordinates from PDB files on disk.
///
/// By default only heavy atoms from `ATOM` records take part: `HETATM` records (ions,
/// ligands, waters) and hydrogens are dropped before the selection is applied. Either can
/// be opted back in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PdbExtractor {
    include_hetero: bool,
    include_hydrogens: bool,
}

impl PdbExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `HETATM` records.
    pub fn include_hetero(mut self, include: bool) -> Self {
        self.include_hetero = include;
        self
    }

    /// Keeps hydrogen atoms.
    pub fn include_hydrogens(mut self, include: bool) -> Self {
        self.include_hydrogens = include;
        self
    }

    fn keeps(&self, atom: &AtomRecord) -> bool {
        (self.include_hetero || !atom.is_hetero) && (self.include_hydrogens || !atom.is_hydrogen())
    }
}

impl CoordinateExtractor for PdbExtractor {
    fn extract(
        &self,
        path: &Path,
        selection: &ResidueSelection,
        ignore: &IgnoreSelection,
    ) -> Result<CoordinateSet, PdbError> {
        let mut structure = PdbFile::read_from_path(path)?;
        let atoms_in_file = structure.atom_count();
        structure.retain_atoms(|atom| self.keeps(atom));
        let coords = structure.select(selection, ignore);
        debug!(
            path = %path.display(),
            atoms_in_file,
            atoms_considered = structure.atom_count(),
            atoms_selected = coords.len(),
            "Extracted coordinates."
        );
        Ok(coords)
    }
}
