use super::compare::{self, RmsdResult};
use crate::core::io::extract::CoordinateExtractor;
use crate::core::io::pdb::PdbFile;
use crate::core::io::report::ModelScore;
use crate::core::io::traits::StructureFile;
use crate::core::models::coordinates::CoordinateSet;
use crate::core::models::structure::Structure;
use crate::core::utils::natural_sort::sort_paths_naturally;
use crate::engine::config::{BatchConfig, FailurePolicy};
use crate::engine::error::{EngineError, Side};
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A model left out of the report under [`FailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedModel {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// One score per successfully compared model, in natural order of the model paths.
    pub scores: Vec<ModelScore>,
    pub skipped: Vec<SkippedModel>,
    /// Number of atoms selected from the target, which every scored model matched.
    pub atom_count: usize,
    /// Files written to the superposed-output directory, if one was configured.
    pub superposed_files: Vec<PathBuf>,
}

struct ScoredModel {
    score: ModelScore,
    superposed: Option<CoordinateSet>,
}

/// Scores every model of `config` against its target.
///
/// Models are processed in natural order of their paths and the scores come back in that
/// order, regardless of whether the comparisons ran in parallel. Under
/// [`FailurePolicy::FailFast`] the first failing model in that order aborts the batch and
/// nothing is written; under [`FailurePolicy::Skip`] model-specific failures are recorded in
/// [`BatchReport::skipped`]. Failures concerning the target always abort.
#[instrument(skip_all, name = "batch_workflow")]
pub fn run<E>(
    config: &BatchConfig,
    extractor: &E,
    reporter: &ProgressReporter,
) -> Result<BatchReport, EngineError>
where
    E: CoordinateExtractor,
{
    info!(
        target_path = %config.target_path.display(),
        models = config.model_paths.len(),
        policy = %config.failure_policy,
        "Starting batch comparison."
    );

    reporter.phase_start("Loading target");
    reporter.report(Progress::StatusUpdate {
        text: config.target_path.display().to_string(),
    });
    let target = compare::extract_side(
        extractor,
        &config.target_path,
        &config.comparison.target,
        Side::Target,
    )?;
    info!(atoms = target.len(), "Target coordinates extracted.");
    reporter.report(Progress::PhaseFinish);

    let mut model_paths = config.model_paths.clone();
    sort_paths_naturally(&mut model_paths);

    let superposed_outputs = match &config.superposed_dir {
        Some(dir) => Some(plan_superposed_paths(dir, &model_paths)?),
        None => None,
    };

    let write_superposed = superposed_outputs.is_some();
    let score_one = |path: &PathBuf| -> Result<ScoredModel, EngineError> {
        let result = score_model(config, extractor, &target, path, write_superposed);
        reporter.report(Progress::TaskIncrement { amount: 1 });
        result
    };

    reporter.phase_start("Scoring models");
    reporter.report(Progress::TaskStart {
        total: model_paths.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Result<ScoredModel, EngineError>> = model_paths.iter().map(score_one).collect();

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Result<ScoredModel, EngineError>> =
        model_paths.par_iter().map(score_one).collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let mut report = BatchReport {
        atom_count: target.len(),
        ..BatchReport::default()
    };
    let mut superposed = Vec::new();

    for (index, (path, outcome)) in model_paths.iter().zip(outcomes).enumerate() {
        match outcome {
            Ok(scored) => {
                if let (Some(outputs), Some(coords)) = (&superposed_outputs, scored.superposed) {
                    superposed.push((outputs[index].clone(), coords));
                }
                report.scores.push(scored.score);
            }
            Err(e) if config.failure_policy == FailurePolicy::Skip && e.is_model_specific() => {
                warn!(model = %path.display(), "Skipping model: {}", e);
                reporter.message(format!("Skipped {}: {}", path.display(), e));
                report.skipped.push(SkippedModel {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                error!(model = %path.display(), "Batch aborted: {}", e);
                return Err(e);
            }
        }
    }

    if let Some(dir) = &config.superposed_dir {
        reporter.phase_start("Writing superposed models");
        report.superposed_files = write_superposed_models(dir, &superposed)?;
        reporter.report(Progress::PhaseFinish);
    }

    info!(
        scored = report.scores.len(),
        skipped = report.skipped.len(),
        "Batch comparison finished."
    );
    Ok(report)
}

fn score_model<E>(
    config: &BatchConfig,
    extractor: &E,
    target: &CoordinateSet,
    path: &Path,
    keep_superposed: bool,
) -> Result<ScoredModel, EngineError>
where
    E: CoordinateExtractor,
{
    let model = compare::extract_side(extractor, path, &config.comparison.model, Side::Model)?;

    let (RmsdResult { rmsd, atom_count }, superposed) = if keep_superposed {
        let (result, moved) =
            compare::superpose_sets(&config.target_path, target, path, &model)?;
        (result, Some(moved))
    } else {
        (
            compare::compare_sets(&config.target_path, target, path, &model)?,
            None,
        )
    };

    Ok(ScoredModel {
        score: ModelScore::new(path, rmsd, atom_count),
        superposed,
    })
}

/// Path of the superposed copy of `model` inside `dir`: `<dir>/<stem>_superposed.pdb`.
pub fn superposed_path(dir: &Path, model: &Path) -> PathBuf {
    let stem = model
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    dir.join(format!("{}_superposed.pdb", stem))
}

/// Maps every model to its superposed output path, failing when two models would share one
/// (e.g. `run1/model.pdb` and `run2/model.pdb`).
fn plan_superposed_paths(dir: &Path, models: &[PathBuf]) -> Result<Vec<PathBuf>, EngineError> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::with_capacity(models.len());
    let mut outputs = Vec::with_capacity(models.len());
    for model in models {
        let out = superposed_path(dir, model);
        if let Some(previous) = claimed.insert(out.clone(), model) {
            return Err(EngineError::Output {
                path: out,
                message: format!(
                    "superposed copies of '{}' and '{}' would overwrite each other",
                    previous.display(),
                    model.display()
                ),
            });
        }
        outputs.push(out);
    }
    Ok(outputs)
}

fn write_superposed_models(
    dir: &Path,
    models: &[(PathBuf, CoordinateSet)],
) -> Result<Vec<PathBuf>, EngineError> {
    fs::create_dir_all(dir).map_err(|e| EngineError::Output {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut written = Vec::with_capacity(models.len());
    for (out, coords) in models {
        PdbFile::write_to_path(&Structure::from_coordinates(coords), out).map_err(|e| {
            EngineError::Output {
                path: out.clone(),
                message: e.to_string(),
            }
        })?;
        written.push(out.clone());
    }
    info!(count = written.len(), dir = %dir.display(), "Wrote superposed models.");
    Ok(written)
}
