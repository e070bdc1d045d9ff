use rmsdcalc::engine::config::FailurePolicy;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub output: PathBuf,
    pub failure_policy: FailurePolicy,
    pub selection: String,
    pub ignore_selection: String,
    pub include_hetatm: bool,
    pub include_hydrogens: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("rmsds.csv"),
            failure_policy: FailurePolicy::FailFast,
            selection: String::new(),
            ignore_selection: String::new(),
            include_hetatm: false,
            include_hydrogens: false,
        }
    }
}
