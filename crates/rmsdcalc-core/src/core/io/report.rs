use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of decimals written for each RMSD value.
pub const RMSD_DECIMALS: usize = 3;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// The RMSD of one model against the target.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScore {
    /// Path of the model file as given.
    pub path: PathBuf,
    /// File name used as the row key in the report.
    pub name: String,
    /// RMSD after optimal superposition, in Angstroms.
    pub rmsd: f64,
    /// Number of atom pairs the RMSD was computed over.
    pub atom_count: usize,
}

impl ModelScore {
    pub fn new(path: impl Into<PathBuf>, rmsd: f64, atom_count: usize) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path,
            name,
            rmsd,
            atom_count,
        }
    }
}

#[derive(Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "fn")]
    name: &'a str,
    rmsd_all: String,
}

/// Writes the `fn,rmsd_all` table, one row per score, in the given order.
pub fn write_report<W: Write>(scores: &[ModelScore], writer: W) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if scores.is_empty() {
        csv_writer.write_record(["fn", "rmsd_all"])?;
    }
    for score in scores {
        csv_writer.serialize(ReportRow {
            name: &score.name,
            rmsd_all: format!("{:.*}", RMSD_DECIMALS, score.rmsd),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders the report as a string, e.g. for echoing to the terminal.
pub fn render_report(scores: &[ModelScore]) -> Result<String, ReportError> {
    let mut buffer = Vec::new();
    write_report(scores, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn write_report_to_path<P: AsRef<Path>>(
    scores: &[ModelScore],
    path: P,
) -> Result<(), ReportError> {
    let file = File::create(path)?;
    write_report(scores, file)
}
