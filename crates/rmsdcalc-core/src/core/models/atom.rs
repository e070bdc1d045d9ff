use nalgebra::Point3;
use std::fmt;

/// A single atom record read from a structure file.
///
/// Holds the identifying columns of an `ATOM`/`HETATM` line together with the
/// coordinates. Records are kept in file order by [`super::structure::Structure`].
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// The atom serial number.
    pub serial: usize,
    /// The atom name (e.g., "P", "C4'", "O2'").
    pub name: String,
    /// The alternate location indicator, if present.
    pub alt_loc: Option<char>,
    /// The residue name (e.g., "G", "ALA").
    pub residue_name: String,
    /// The chain identifier.
    pub chain_id: char,
    /// The residue sequence number.
    pub residue_number: isize,
    /// The insertion code, if present.
    pub insertion_code: Option<char>,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Whether the record came from a `HETATM` line.
    pub is_hetero: bool,
    /// The element symbol from columns 77-78, if the file gives one.
    pub element: Option<String>,
}

impl AtomRecord {
    /// Creates a new `AtomRecord` with no alternate location or insertion code.
    pub fn new(
        serial: usize,
        name: &str,
        residue_name: &str,
        chain_id: char,
        residue_number: isize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            serial,
            name: name.to_string(),
            alt_loc: None,
            residue_name: residue_name.to_string(),
            chain_id,
            residue_number,
            insertion_code: None,
            position,
            is_hetero: false,
            element: None,
        }
    }

    /// Rebuilds a record from a label and a (possibly moved) position.
    pub fn from_label(label: &AtomLabel, position: Point3<f64>) -> Self {
        Self {
            serial: label.serial,
            name: label.name.clone(),
            alt_loc: label.alt_loc,
            residue_name: label.residue_name.clone(),
            chain_id: label.chain_id,
            residue_number: label.residue_number,
            insertion_code: label.insertion_code,
            position,
            is_hetero: label.is_hetero,
            element: label.element.clone(),
        }
    }

    /// Whether this atom is a hydrogen (or deuterium).
    ///
    /// Uses the element column when present. Otherwise the first letter of the atom name
    /// decides, after any leading digits (`1H5'`, `H4'`, `HO2'`).
    pub fn is_hydrogen(&self) -> bool {
        match &self.element {
            Some(element) => {
                let element = element.trim();
                element.eq_ignore_ascii_case("H") || element.eq_ignore_ascii_case("D")
            }
            None => matches!(
                self.name
                    .trim_start_matches(|c: char| c.is_ascii_digit())
                    .chars()
                    .next(),
                Some('H' | 'D')
            ),
        }
    }

    /// Returns the label identifying this atom in a [`super::coordinates::CoordinateSet`].
    pub fn label(&self) -> AtomLabel {
        AtomLabel {
            serial: self.serial,
            name: self.name.clone(),
            residue_name: self.residue_name.clone(),
            chain_id: self.chain_id,
            residue_number: self.residue_number,
            alt_loc: self.alt_loc,
            insertion_code: self.insertion_code,
            is_hetero: self.is_hetero,
            element: self.element.clone(),
        }
    }
}

/// Identifies the atom behind one point of a coordinate set.
///
/// Labels never take part in the geometry; they are carried for diagnostics and for
/// writing superposed coordinates back out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomLabel {
    pub serial: usize,
    pub name: String,
    pub residue_name: String,
    pub chain_id: char,
    pub residue_number: isize,
    pub alt_loc: Option<char>,
    pub insertion_code: Option<char>,
    pub is_hetero: bool,
    pub element: Option<String>,
}

impl fmt::Display for AtomLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.chain_id, self.residue_number, self.name)
    }
}
