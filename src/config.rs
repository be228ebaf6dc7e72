//! Analysis Settings
//! Fixed input/output locations and chart presentation constants.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dataset read on every run.
pub const DEFAULT_INPUT_PATH: &str = "data/Titanic-Dataset.csv";

/// Report written on every run (overwritten).
pub const DEFAULT_OUTPUT_PATH: &str = "titanic_survival_analysis.html";

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub page_title: String,
    /// Height of each chart in pixels.
    pub chart_height: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            page_title: "Titanic Survival Analysis".to_string(),
            chart_height: 350,
        }
    }
}

impl AnalysisSettings {
    /// Same defaults, different files. Used when running the pipeline on a
    /// scratch dataset.
    #[allow(dead_code)]
    pub fn with_paths(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }
}
