use crate::core::io::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

// Coordinates end at column 54; later columns (occupancy, B-factor, element) are optional.
const MIN_ATOM_LINE_LEN: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Fixed-column PDB format, restricted to the coordinate records.
///
/// Only the first model is read: parsing stops at the first `ENDMDL` or `END`. Alternate
/// locations other than blank or `A` are dropped so that every atom appears once.
pub struct PdbFile;

impl PdbFile {
    fn parse_atom_line(line: &str, line_num: usize, is_hetero: bool) -> Result<AtomRecord, PdbError> {
        if line.len() < MIN_ATOM_LINE_LEN {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort,
            });
        }

        let name = slice_and_trim(line, 12, 16);
        if name.is_empty() {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::MissingRequiredField {
                    columns: "13-16".into(),
                },
            });
        }

        let serial: usize = parse_int(line, line_num, 6, 11)?;
        let residue_number: isize = parse_int(line, line_num, 22, 26)?;
        let x = parse_float(line, line_num, 30, 38)?;
        let y = parse_float(line, line_num, 38, 46)?;
        let z = parse_float(line, line_num, 46, 54)?;

        Ok(AtomRecord {
            serial,
            name: name.to_string(),
            alt_loc: column_char(line, 16),
            residue_name: slice_and_trim(line, 17, 20).to_string(),
            chain_id: column_char(line, 21).unwrap_or(' '),
            residue_number,
            insertion_code: column_char(line, 26),
            position: Point3::new(x, y, z),
            is_hetero,
            element: Some(slice_and_trim(line, 76, 78))
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        })
    }

    fn format_atom_name(name: &str) -> String {
        // Names shorter than four characters start in column 14 by convention.
        if name.len() < 4 {
            format!(" {:<3}", name)
        } else {
            format!("{:<4}", name)
        }
    }
}

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut structure = Structure::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                record @ ("ATOM" | "HETATM") => {
                    let atom = Self::parse_atom_line(&line, line_num, record == "HETATM")?;
                    if matches!(atom.alt_loc, None | Some('A')) {
                        structure.add_atom(atom);
                    }
                }
                "ENDMDL" | "END" => break,
                _ => {}
            }
        }

        if structure.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok(structure)
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        for atom in structure.atoms() {
            let record_type = if atom.is_hetero { "HETATM" } else { "ATOM" };
            let element = match &atom.element {
                Some(element) => element.clone(),
                None => atom
                    .name
                    .chars()
                    .find(|c| c.is_ascii_alphabetic())
                    .map(String::from)
                    .unwrap_or_default(),
            };
            writeln!(
                writer,
                "{:<6}{:>5} {}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                record_type,
                atom.serial % 100_000,
                Self::format_atom_name(&atom.name),
                atom.alt_loc.unwrap_or(' '),
                atom.residue_name,
                atom.chain_id,
                atom.residue_number,
                atom.insertion_code.unwrap_or(' '),
                atom.position.x,
                atom.position.y,
                atom.position.z,
                1.0,
                0.0,
                element,
            )?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}
