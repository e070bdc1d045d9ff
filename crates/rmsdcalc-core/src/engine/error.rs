use crate::core::geometry::GeometryError;
use crate::core::io::pdb::PdbError;
use crate::core::io::report::ReportError;
use crate::core::selection::SelectionError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which structure of a comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Target,
    Model,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Target => write!(f, "target"),
            Side::Model => write!(f, "model"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "Number of atoms is not equal: target has {target_atoms} ({target}) vs model has {model_atoms} ({model})",
        target = target.display(),
        model = model.display()
    )]
    AtomCountMismatch {
        target: PathBuf,
        target_atoms: usize,
        model: PathBuf,
        model_atoms: usize,
    },

    #[error("Selection for the {side} matched no atoms in '{path}'", path = path.display())]
    EmptySelection { side: Side, path: PathBuf },

    #[error("Invalid selection: {0}")]
    Selection(#[from] SelectionError),

    #[error("Failed to read {side} structure '{path}': {source}", path = path.display())]
    Structure {
        side: Side,
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Geometry computation failed: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Failed to write output '{path}': {message}", path = path.display())]
    Output { path: PathBuf, message: String },

    #[error("Failed to write report: {0}")]
    Report(#[from] ReportError),
}

impl EngineError {
    /// Whether the error concerns a single model and could be skipped in a batch.
    pub fn is_model_specific(&self) -> bool {
        match self {
            EngineError::AtomCountMismatch { .. } => true,
            EngineError::EmptySelection { side, .. } | EngineError::Structure { side, .. } => {
                *side == Side::Model
            }
            EngineError::Geometry(_) => true,
            EngineError::Selection(_) | EngineError::Output { .. } | EngineError::Report(_) => {
                false
            }
        }
    }
}
