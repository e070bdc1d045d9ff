use crate::core::geometry::{self, Superposition};
use crate::core::io::extract::CoordinateExtractor;
use crate::core::models::coordinates::CoordinateSet;
use crate::engine::config::{ComparisonConfig, SelectionConfig};
use crate::engine::error::{EngineError, Side};
use std::path::Path;
use tracing::{debug, instrument};

/// RMSD after optimal superposition, with the number of atom pairs it was computed over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RmsdResult {
    pub rmsd: f64,
    pub atom_count: usize,
}

/// Extracts the coordinates of one side of a comparison, rejecting empty selections.
pub fn extract_side<E>(
    extractor: &E,
    path: &Path,
    selection: &SelectionConfig,
    side: Side,
) -> Result<CoordinateSet, EngineError>
where
    E: CoordinateExtractor + ?Sized,
{
    let coords = extractor
        .extract(path, &selection.residues, &selection.ignore)
        .map_err(|source| EngineError::Structure {
            side,
            path: path.to_path_buf(),
            source,
        })?;
    if coords.is_empty() {
        return Err(EngineError::EmptySelection {
            side,
            path: path.to_path_buf(),
        });
    }
    Ok(coords)
}

fn ensure_same_atom_count(
    target_path: &Path,
    target: &CoordinateSet,
    model_path: &Path,
    model: &CoordinateSet,
) -> Result<usize, EngineError> {
    if target.len() != model.len() {
        return Err(EngineError::AtomCountMismatch {
            target: target_path.to_path_buf(),
            target_atoms: target.len(),
            model: model_path.to_path_buf(),
            model_atoms: model.len(),
        });
    }
    Ok(target.len())
}

/// Computes the RMSD of `model` against `target` after superposition.
///
/// Atom counts are checked before any geometry; the model is rotated onto the target.
pub fn compare_sets(
    target_path: &Path,
    target: &CoordinateSet,
    model_path: &Path,
    model: &CoordinateSet,
) -> Result<RmsdResult, EngineError> {
    let atom_count = ensure_same_atom_count(target_path, target, model_path, model)?;

    let (model_centered, _) = geometry::center(model.points())?;
    let (target_centered, _) = geometry::center(target.points())?;
    let rmsd = geometry::kabsch_rmsd(&model_centered, &target_centered)?;

    debug!(
        model = %model_path.display(),
        atoms = atom_count,
        rmsd,
        "Compared model against target."
    );
    Ok(RmsdResult { rmsd, atom_count })
}

/// Like [`compare_sets`], but also returns the model coordinates moved into the target frame.
pub fn superpose_sets(
    target_path: &Path,
    target: &CoordinateSet,
    model_path: &Path,
    model: &CoordinateSet,
) -> Result<(RmsdResult, CoordinateSet), EngineError> {
    let atom_count = ensure_same_atom_count(target_path, target, model_path, model)?;

    let Superposition {
        rmsd, transformed, ..
    } = geometry::superpose(model.points(), target.points())?;
    let moved = model.labels().iter().cloned().zip(transformed).collect();

    Ok((RmsdResult { rmsd, atom_count }, moved))
}

/// Compares two structure files under the given selections.
///
/// Both sides are extracted through `extractor`; the model file is superposed onto the target.
#[instrument(skip_all, fields(target_file = %target_path.display(), model_file = %model_path.display()))]
pub fn compare<E>(
    extractor: &E,
    target_path: &Path,
    model_path: &Path,
    config: &ComparisonConfig,
) -> Result<RmsdResult, EngineError>
where
    E: CoordinateExtractor + ?Sized,
{
    let target = extract_side(extractor, target_path, &config.target, Side::Target)?;
    let model = extract_side(extractor, model_path, &config.model, Side::Model)?;
    compare_sets(target_path, &target, model_path, &model)
}
