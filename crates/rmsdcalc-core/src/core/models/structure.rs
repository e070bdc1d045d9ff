use super::atom::AtomRecord;
use super::coordinates::CoordinateSet;
use crate::core::selection::{IgnoreSelection, ResidueSelection};

/// The atoms of a single structure model, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    atoms: Vec<AtomRecord>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: AtomRecord) {
        self.atoms.push(atom);
    }

    #[inline]
    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Extracts the ordered coordinates of the selected, non-ignored atoms.
    ///
    /// Atoms keep their order of appearance in the structure, which is what pairs the
    /// points of two structures during comparison.
    pub fn select(&self, selection: &ResidueSelection, ignore: &IgnoreSelection) -> CoordinateSet {
        self.atoms
            .iter()
            .filter(|atom| selection.contains(atom.chain_id, atom.residue_number))
            .filter(|atom| !ignore.contains(atom.chain_id, atom.residue_number, &atom.name))
            .map(|atom| (atom.label(), atom.position))
            .collect()
    }

    /// Keeps only the atoms for which `keep` returns `true`, preserving their order.
    pub fn retain_atoms(&mut self, keep: impl FnMut(&AtomRecord) -> bool) {
        self.atoms.retain(keep);
    }

    /// Builds a structure from a coordinate set, reusing its labels.
    pub fn from_coordinates(coords: &CoordinateSet) -> Self {
        let atoms = coords
            .iter()
            .map(|(label, point)| AtomRecord::from_label(label, *point))
            .collect();
        Self { atoms }
    }
}
