use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "rmsdcalc - Superpose candidate models onto a target structure and report their RMSDs.",
    help_template = HELP_TEMPLATE,
    arg_required_else_help = true,
)]
pub struct Cli {
    // --- Core Arguments ---
    /// Model structure files (PDB) to compare against the target.
    /// They are processed and reported in natural order of their names.
    #[arg(value_name = "MODEL", required = true, num_args = 1..)]
    pub models: Vec<PathBuf>,

    /// Path to the target (reference) structure file.
    #[arg(short, long, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// Path of the CSV report. Defaults to 'rmsds.csv'.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Selections ---
    /// Residues of the target to compare, e.g. 'A:1-10+12,B:3-5'. Ranges exclude their end.
    #[arg(long, value_name = "SELECTION")]
    pub target_selection: Option<String>,

    /// Atoms of the target to leave out, e.g. "A/10/O2',A/11/O2'".
    #[arg(long, value_name = "ATOMS")]
    pub target_ignore_selection: Option<String>,

    /// Residues of each model to compare, in the same format as --target-selection.
    #[arg(long, value_name = "SELECTION")]
    pub model_selection: Option<String>,

    /// Atoms of each model to leave out, in the same format as --target-ignore-selection.
    #[arg(long, value_name = "ATOMS")]
    pub model_ignore_selection: Option<String>,

    /// Also compare atoms from HETATM records (ions, ligands, waters).
    #[arg(long)]
    pub include_hetatm: bool,

    /// Also compare hydrogen atoms.
    #[arg(long)]
    pub include_hydrogens: bool,

    // --- Batch Behavior ---
    /// Leave models that cannot be compared out of the report instead of aborting.
    #[arg(long)]
    pub skip_failed: bool,

    /// Write every model, superposed onto the target, into this directory.
    #[arg(long, value_name = "DIR")]
    pub superposed_dir: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S model.selection=A:1-20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    // --- Global Options ---
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_target_models_and_selections() {
        let cli = Cli::try_parse_from([
            "rmsdcalc",
            "-t",
            "target.pdb",
            "--target-selection",
            "A:1-10",
            "--model-ignore-selection",
            "A/5/O2'",
            "model_2.pdb",
            "model_1.pdb",
        ])
        .unwrap();

        assert_eq!(cli.target, Some(PathBuf::from("target.pdb")));
        assert_eq!(
            cli.models,
            vec![PathBuf::from("model_2.pdb"), PathBuf::from("model_1.pdb")]
        );
        assert_eq!(cli.target_selection.as_deref(), Some("A:1-10"));
        assert_eq!(cli.model_ignore_selection.as_deref(), Some("A/5/O2'"));
        assert!(cli.output.is_none());
        assert!(!cli.skip_failed);
        assert!(!cli.include_hetatm);
        assert!(!cli.include_hydrogens);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from(["rmsdcalc", "-v", "-q", "-t", "t.pdb", "m.pdb"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_arguments_prints_help() {
        let err = Cli::try_parse_from(["rmsdcalc"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn set_values_accumulate() {
        let cli = Cli::try_parse_from([
            "rmsdcalc",
            "-S",
            "output=out.csv",
            "-S",
            "failure-policy=skip",
            "m.pdb",
        ])
        .unwrap();
        assert_eq!(cli.set_values, vec!["output=out.csv", "failure-policy=skip"]);
    }
}
