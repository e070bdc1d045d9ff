use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The `[model]` table.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSelectionConfig {
    pub selection: Option<String>,
    pub ignore_selection: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileTargetConfig {
    pub path: Option<PathBuf>,
    pub selection: Option<String>,
    pub ignore_selection: Option<String>,
}

/// The contents of a TOML configuration file. Every key is optional.
///
/// ```toml
/// output = "rmsds.csv"
/// failure-policy = "skip"
/// superposed-dir = "superposed"
/// include-hetatm = false
/// include-hydrogens = false
///
/// [target]
/// path = "target.pdb"
/// selection = "A:1-20"
/// ignore-selection = "A/10/O2'"
///
/// [model]
/// selection = "A:5-25"
/// ```
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub output: Option<PathBuf>,
    pub failure_policy: Option<String>,
    pub superposed_dir: Option<PathBuf>,
    pub include_hetatm: Option<bool>,
    pub include_hydrogens: Option<bool>,
    pub target: Option<FileTargetConfig>,
    pub model: Option<FileSelectionConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::parse(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
