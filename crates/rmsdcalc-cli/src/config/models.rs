use rmsdcalc::core::io::extract::PdbExtractor;
use rmsdcalc::engine::config::BatchConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub output_path: PathBuf,
    pub batch: BatchConfig,
    pub extractor: PdbExtractor,
}
