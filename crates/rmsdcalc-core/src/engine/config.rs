use crate::core::selection::{IgnoreSelection, ResidueSelection, SelectionError};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("No model files were given")]
    NoModels,

    #[error("Unknown failure policy '{0}'. Expected 'fail-fast' or 'skip'.")]
    UnknownFailurePolicy(String),
}

/// The atoms of one side of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionConfig {
    pub residues: ResidueSelection,
    pub ignore: IgnoreSelection,
}

impl SelectionConfig {
    /// Parses a residue selection string and an ignore-selection string.
    pub fn parse(selection: &str, ignore: &str) -> Result<Self, SelectionError> {
        Ok(Self {
            residues: ResidueSelection::parse(selection)?,
            ignore: IgnoreSelection::parse(ignore)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonConfig {
    pub target: SelectionConfig,
    pub model: SelectionConfig,
}

/// What a batch does when a single model cannot be compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole batch on the first failing model.
    #[default]
    FailFast,
    /// Leave failing models out of the report and keep going.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" | "failfast" | "abort" => Ok(FailurePolicy::FailFast),
            "skip" | "skip-and-continue" => Ok(FailurePolicy::Skip),
            other => Err(ConfigError::UnknownFailurePolicy(other.to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::FailFast => write!(f, "fail-fast"),
            FailurePolicy::Skip => write!(f, "skip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub target_path: PathBuf,
    pub model_paths: Vec<PathBuf>,
    pub comparison: ComparisonConfig,
    pub failure_policy: FailurePolicy,
    pub superposed_dir: Option<PathBuf>,
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    target_path: Option<PathBuf>,
    model_paths: Vec<PathBuf>,
    target_selection: Option<SelectionConfig>,
    model_selection: Option<SelectionConfig>,
    failure_policy: Option<FailurePolicy>,
    superposed_dir: Option<PathBuf>,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_path(mut self, path: PathBuf) -> Self {
        self.target_path = Some(path);
        self
    }
    pub fn model_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.model_paths = paths;
        self
    }
    pub fn add_model_path(mut self, path: PathBuf) -> Self {
        self.model_paths.push(path);
        self
    }
    pub fn target_selection(mut self, selection: SelectionConfig) -> Self {
        self.target_selection = Some(selection);
        self
    }
    pub fn model_selection(mut self, selection: SelectionConfig) -> Self {
        self.model_selection = Some(selection);
        self
    }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }
    pub fn superposed_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.superposed_dir = dir;
        self
    }

    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        let target_path = self
            .target_path
            .ok_or(ConfigError::MissingParameter("target_path"))?;
        if self.model_paths.is_empty() {
            return Err(ConfigError::NoModels);
        }
        Ok(BatchConfig {
            target_path,
            model_paths: self.model_paths,
            comparison: ComparisonConfig {
                target: self.target_selection.unwrap_or_default(),
                model: self.model_selection.unwrap_or_default(),
            },
            failure_policy: self.failure_policy.unwrap_or_default(),
            superposed_dir: self.superposed_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_succeeds_with_target_and_models() {
        let config = BatchConfigBuilder::new()
            .target_path(PathBuf::from("target.pdb"))
            .add_model_path(PathBuf::from("m1.pdb"))
            .add_model_path(PathBuf::from("m2.pdb"))
            .target_selection(SelectionConfig::parse("A:1-10", "").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.target_path, PathBuf::from("target.pdb"));
        assert_eq!(config.model_paths.len(), 2);
        assert!(config.comparison.target.residues.contains('A', 9));
        assert_eq!(config.comparison.model, SelectionConfig::default());
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert!(config.superposed_dir.is_none());
    }

    #[test]
    fn builder_fails_without_target() {
        let result = BatchConfigBuilder::new()
            .model_paths(vec![PathBuf::from("m1.pdb")])
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::MissingParameter("target_path"));
    }

    #[test]
    fn builder_fails_without_models() {
        let result = BatchConfigBuilder::new()
            .target_path(PathBuf::from("target.pdb"))
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::NoModels);
    }

    #[test]
    fn failure_policy_parses_and_displays() {
        assert_eq!("fail-fast".parse::<FailurePolicy>(), Ok(FailurePolicy::FailFast));
        assert_eq!("SKIP".parse::<FailurePolicy>(), Ok(FailurePolicy::Skip));
        assert_eq!(
            "retry".parse::<FailurePolicy>(),
            Err(ConfigError::UnknownFailurePolicy("retry".to_string()))
        );
        assert_eq!(FailurePolicy::Skip.to_string(), "skip");
    }

    #[test]
    fn selection_config_propagates_parse_errors() {
        assert!(SelectionConfig::parse("A:1-3", "A/1").is_err());
        assert!(SelectionConfig::parse("A1-3", "").is_err());
    }
}
