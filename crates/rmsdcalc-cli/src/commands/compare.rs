use crate::cli::Cli;
use crate::config::{AppConfig, build_config};
use crate::error::Result;
use crate::ui::{CliProgressHandler, UiEvent};
use rmsdcalc::{
    core::io::report::{render_report, write_report_to_path},
    engine::progress::ProgressReporter,
    workflows::batch::{self, BatchReport},
};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn run(cli: &Cli, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    info!("Resolving configuration from defaults, file, --set values and flags...");
    let app_config = build_config(cli)?;
    let comparison = &app_config.batch.comparison;

    println!(
        "target selection: {} (ignoring: {})",
        comparison.target.residues, comparison.target.ignore
    );
    println!(
        "model selection:  {} (ignoring: {})",
        comparison.model.residues, comparison.model.ignore
    );

    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the batch comparison workflow...");
    let report = tokio::task::block_in_place(|| execute(&app_config, &reporter))?;

    print!("{}", render_report(&report.scores)?);
    println!("# of atoms used: {}", report.atom_count);
    println!("✓ Report written to: {}", app_config.output_path.display());

    if !report.skipped.is_empty() {
        warn!("{} model(s) were skipped.", report.skipped.len());
        println!("⚠ Skipped {} model(s):", report.skipped.len());
        for skipped in &report.skipped {
            println!("  {}: {}", skipped.path.display(), skipped.reason);
        }
    }
    if let Some(dir) = &app_config.batch.superposed_dir {
        println!(
            "✓ {} superposed model(s) written to: {}",
            report.superposed_files.len(),
            dir.display()
        );
    }

    Ok(())
}

fn execute(app_config: &AppConfig, reporter: &ProgressReporter) -> Result<BatchReport> {
    let report = batch::run(&app_config.batch, &app_config.extractor, reporter)?;
    info!(
        "Writing {} row(s) to {:?}",
        report.scores.len(),
        &app_config.output_path
    );
    write_report_to_path(&report.scores, &app_config.output_path)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use clap::Parser;
    use nalgebra::Point3;
    use rmsdcalc::core::io::{pdb::PdbFile, traits::StructureFile};
    use rmsdcalc::core::models::{atom::AtomRecord, structure::Structure};
    use rmsdcalc::engine::error::EngineError;
    use std::fs;
    use std::path::Path;

    fn write_structure(path: &Path, points: &[[f64; 3]]) {
        let mut structure = Structure::new();
        for (i, p) in points.iter().enumerate() {
            structure.add_atom(AtomRecord::new(
                i + 1,
                "P",
                "A",
                'A',
                i as isize + 1,
                Point3::new(p[0], p[1], p[2]),
            ));
        }
        PdbFile::write_to_path(&structure, path).unwrap();
    }

    const TARGET: [[f64; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.5, 0.0, 0.0],
        [0.0, 2.0, 0.0],
        [0.5, 0.5, 1.0],
    ];

    fn cli(args: Vec<String>) -> Cli {
        let mut full = vec!["rmsdcalc".to_string()];
        full.extend(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn writes_report_in_natural_order() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target.pdb");
        write_structure(&target, &TARGET);
        let shifted: Vec<[f64; 3]> = TARGET.iter().map(|p| [p[0] + 3.0, p[1], p[2]]).collect();
        for name in ["model_10.pdb", "model_2.pdb", "model_1.pdb"] {
            write_structure(&dir.path().join(name), &shifted);
        }
        let output = dir.path().join("rmsds.csv");

        let cli = cli(vec![
            "-t".into(),
            target.to_string_lossy().into_owned(),
            "-o".into(),
            output.to_string_lossy().into_owned(),
            dir.path().join("model_10.pdb").to_string_lossy().into_owned(),
            dir.path().join("model_2.pdb").to_string_lossy().into_owned(),
            dir.path().join("model_1.pdb").to_string_lossy().into_owned(),
        ]);
        let (sender, _receiver) = mpsc::channel(1024);

        run(&cli, sender).await.unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(
            content,
            "fn,rmsd_all\nmodel_1.pdb,0.000\nmodel_2.pdb,0.000\nmodel_10.pdb,0.000\n"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn atom_count_mismatch_fails_without_writing_a_report() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target.pdb");
        write_structure(&target, &TARGET);
        let model = dir.path().join("model_1.pdb");
        write_structure(&model, &TARGET[..3]);
        let output = dir.path().join("rmsds.csv");

        let cli = cli(vec![
            "-t".into(),
            target.to_string_lossy().into_owned(),
            "-o".into(),
            output.to_string_lossy().into_owned(),
            model.to_string_lossy().into_owned(),
        ]);
        let (sender, _receiver) = mpsc::channel(1024);

        let err = run(&cli, sender).await.unwrap_err();

        assert!(matches!(
            err,
            CliError::Core(EngineError::AtomCountMismatch {
                target_atoms: 4,
                model_atoms: 3,
                ..
            })
        ));
        assert!(!output.exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn skip_failed_reports_remaining_models() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target.pdb");
        write_structure(&target, &TARGET);
        let good = dir.path().join("good.pdb");
        write_structure(&good, &TARGET);
        let bad = dir.path().join("bad.pdb");
        fs::write(&bad, "not a structure\n").unwrap();
        let output = dir.path().join("rmsds.csv");

        let cli = cli(vec![
            "--skip-failed".into(),
            "-t".into(),
            target.to_string_lossy().into_owned(),
            "-o".into(),
            output.to_string_lossy().into_owned(),
            bad.to_string_lossy().into_owned(),
            good.to_string_lossy().into_owned(),
        ]);
        let (sender, _receiver) = mpsc::channel(1024);

        run(&cli, sender).await.unwrap();

        let content = fs::read_to_string(&output).unwrap();
        assert_eq!(content, "fn,rmsd_all\ngood.pdb,0.000\n");
    }
}
