//! Parsing of residue selections and ignored-atom selections.
//!
//! Two small string formats are understood:
//!
//! - Residue selection: `Chain:start-end+single,...`, e.g. `A:10-16+20,B:1-3`. Ranges are
//!   half-open, so `10-16` covers residues 10 through 15. An empty string selects every atom.
//! - Ignore selection: `Chain/ResidueNumber/AtomName`, several joined by `,`, e.g.
//!   `A/10/O2',A/11/O2'`. An empty string ignores nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SelectionError {
    #[error("Empty item in selection '{input}'")]
    EmptyItem { input: String },

    #[error("Missing ':' between chain and residues in '{item}'. Expected e.g. 'A:10-16+20'.")]
    MissingChainSeparator { item: String },

    #[error("Invalid chain identifier '{chain}' in '{item}'. Expected a single character.")]
    InvalidChain { chain: String, item: String },

    #[error("Invalid residue number '{value}' in '{item}'")]
    InvalidResidueNumber { value: String, item: String },

    #[error("Empty residue range {start}-{end} in '{item}' (the end is excluded)")]
    EmptyRange {
        start: isize,
        end: isize,
        item: String,
    },

    #[error("Invalid ignore selection '{item}'. Expected 'Chain/ResidueNumber/AtomName', e.g. \"A/10/O2'\".")]
    InvalidAtomSpecifier { item: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomSpecifier {
    pub chain_id: char,
    pub residue_number: isize,
    pub atom_name: String,
}

/// The residues taking part in a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResidueSelection {
    /// Every atom of the structure.
    #[default]
    All,
    /// Only atoms belonging to the listed residues, kept per chain as sorted, disjoint and
    /// non-adjacent inclusive spans.
    Residues(BTreeMap<char, Vec<RangeInclusive<isize>>>),
}

impl ResidueSelection {
    /// Parses a selection such as `A:10-16+20,B:1-3`.
    ///
    /// Whitespace-only input yields [`ResidueSelection::All`]. A chain named more than once
    /// accumulates residues from every occurrence.
    pub fn parse(input: &str) -> Result<Self, SelectionError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::All);
        }

        let mut chains: BTreeMap<char, Vec<RangeInclusive<isize>>> = BTreeMap::new();
        for item in input.split(',').map(str::trim) {
            if item.is_empty() {
                return Err(SelectionError::EmptyItem {
                    input: input.to_string(),
                });
            }
            let (chain_str, ranges) =
                item.split_once(':')
                    .ok_or_else(|| SelectionError::MissingChainSeparator {
                        item: item.to_string(),
                    })?;
            let chain_id = parse_chain(chain_str.trim(), item)?;
            let spans = chains.entry(chain_id).or_default();

            for part in ranges.split('+').map(str::trim) {
                if part.is_empty() {
                    return Err(SelectionError::EmptyItem {
                        input: input.to_string(),
                    });
                }
                match split_range(part) {
                    Some((start_str, end_str)) => {
                        let start = parse_residue_number(start_str, item)?;
                        let end = parse_residue_number(end_str, item)?;
                        if end <= start {
                            return Err(SelectionError::EmptyRange {
                                start,
                                end,
                                item: item.to_string(),
                            });
                        }
                        // `end > start`, so `end - 1` cannot underflow.
                        spans.push(start..=end - 1);
                    }
                    None => {
                        let number = parse_residue_number(part, item)?;
                        spans.push(number..=number);
                    }
                }
            }
        }

        for spans in chains.values_mut() {
            merge_spans(spans);
        }
        Ok(Self::Residues(chains))
    }

    pub fn contains(&self, chain_id: char, residue_number: isize) -> bool {
        match self {
            Self::All => true,
            Self::Residues(chains) => chains.get(&chain_id).is_some_and(|spans| {
                let idx = spans.partition_point(|span| *span.start() <= residue_number);
                idx > 0 && residue_number <= *spans[idx - 1].end()
            }),
        }
    }

    /// The selected spans of one chain, sorted and merged. Empty for chains that are not
    /// selected and for [`ResidueSelection::All`].
    pub fn spans(&self, chain_id: char) -> &[RangeInclusive<isize>] {
        match self {
            Self::All => &[],
            Self::Residues(chains) => chains.get(&chain_id).map(Vec::as_slice).unwrap_or(&[]),
        }
    }
}

impl fmt::Display for ResidueSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Residues(chains) => {
                let parts: Vec<String> = chains
                    .iter()
                    .map(|(chain, spans)| format!("{}:{}", chain, format_spans(spans)))
                    .collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

/// Atoms excluded from a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSelection {
    atoms: BTreeSet<AtomSpecifier>,
}

impl IgnoreSelection {
    /// Parses an ignore selection such as `A/10/O2',A/11/O2'`.
    pub fn parse(input: &str) -> Result<Self, SelectionError> {
        let input = input.trim();
        let mut atoms = BTreeSet::new();
        if input.is_empty() {
            return Ok(Self { atoms });
        }

        for item in input.split(',').map(str::trim) {
            if item.is_empty() {
                return Err(SelectionError::EmptyItem {
                    input: input.to_string(),
                });
            }
            let parts: Vec<&str> = item.split('/').map(str::trim).collect();
            let [chain_str, residue_str, atom_name] = parts.as_slice() else {
                return Err(SelectionError::InvalidAtomSpecifier {
                    item: item.to_string(),
                });
            };
            if atom_name.is_empty() {
                return Err(SelectionError::InvalidAtomSpecifier {
                    item: item.to_string(),
                });
            }
            atoms.insert(AtomSpecifier {
                chain_id: parse_chain(chain_str, item)?,
                residue_number: parse_residue_number(residue_str, item)?,
                atom_name: atom_name.to_string(),
            });
        }
        Ok(Self { atoms })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn contains(&self, chain_id: char, residue_number: isize, atom_name: &str) -> bool {
        if self.atoms.is_empty() {
            return false;
        }
        self.atoms.contains(&AtomSpecifier {
            chain_id,
            residue_number,
            atom_name: atom_name.to_string(),
        })
    }
}

impl fmt::Display for IgnoreSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.atoms.is_empty() {
            return write!(f, "none");
        }
        let parts: Vec<String> = self
            .atoms
            .iter()
            .map(|a| format!("{}/{}/{}", a.chain_id, a.residue_number, a.atom_name))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

fn parse_chain(chain_str: &str, item: &str) -> Result<char, SelectionError> {
    let mut chars = chain_str.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(SelectionError::InvalidChain {
            chain: chain_str.to_string(),
            item: item.to_string(),
        }),
    }
}

fn parse_residue_number(value: &str, item: &str) -> Result<isize, SelectionError> {
    value
        .trim()
        .parse()
        .map_err(|_| SelectionError::InvalidResidueNumber {
            value: value.to_string(),
            item: item.to_string(),
        })
}

// The separating '-' is the first one after position 0, so a negative start like "-3-2" works.
fn split_range(part: &str) -> Option<(&str, &str)> {
    let idx = part.get(1..)?.find('-')? + 1;
    Some((&part[..idx], &part[idx + 1..]))
}

fn merge_spans(spans: &mut Vec<RangeInclusive<isize>>) {
    spans.sort_by_key(|span| *span.start());
    let mut merged: Vec<RangeInclusive<isize>> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        match merged.last_mut() {
            Some(last) if *span.start() <= last.end().saturating_add(1) => {
                if span.end() > last.end() {
                    *last = *last.start()..=*span.end();
                }
            }
            _ => merged.push(span),
        }
    }
    *spans = merged;
}

// Spans print back in the half-open input syntax. A span reaching `isize::MAX` has no
// exclusive end, so its last residue is printed as a single.
fn format_spans(spans: &[RangeInclusive<isize>]) -> String {
    let mut parts = Vec::with_capacity(spans.len());
    for span in spans {
        let (start, end) = (*span.start(), *span.end());
        if start == end {
            parts.push(start.to_string());
            continue;
        }
        match end.checked_add(1) {
            Some(exclusive) => parts.push(format!("{}-{}", start, exclusive)),
            None if end - start == 1 => {
                parts.push(start.to_string());
                parts.push(end.to_string());
            }
            None => {
                parts.push(format!("{}-{}", start, end));
                parts.push(end.to_string());
            }
        }
    }
    parts.join("+")
}
