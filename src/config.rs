//! Run configuration.
//!
//! A [`RunConfig`] is read from JSON (every field optional), then adjusted by
//! command-line flags, and is not modified after the run starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::discovery::DEFAULT_FILE_FILTER;
use crate::data::layout::ExportLayout;
use crate::error::{PamError, Result};

/// Directory, relative to the working directory, that receives all outputs.
pub const DEFAULT_RESULTS_DIR: &str = "myPAMresults";

/// What to draw and how samples are grouped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSettings {
    #[serde(default = "default_x_axis")]
    pub x_axis_columns: Vec<String>,

    #[serde(default = "default_y_axis")]
    pub y_axis_columns: Vec<String>,

    /// Substrings that group samples; a sample may match several.
    #[serde(default = "default_sample_tags")]
    pub sample_tags: Vec<String>,

    /// Substring shared by all wildtype samples.
    #[serde(default = "default_wildtype_tag")]
    pub wildtype_tag: String,
}

fn default_x_axis() -> Vec<String> {
    vec!["t".to_string()]
}

fn default_y_axis() -> Vec<String> {
    vec!["NPQown".to_string(), "rETR".to_string()]
}

fn default_sample_tags() -> Vec<String> {
    vec!["LHCX1g1".to_string(), "LHCX1g2".to_string()]
}

fn default_wildtype_tag() -> String {
    "WT".to_string()
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            x_axis_columns: default_x_axis(),
            y_axis_columns: default_y_axis(),
            sample_tags: default_sample_tags(),
            wildtype_tag: default_wildtype_tag(),
        }
    }
}

/// Custom names for the two CSV outputs. Unset names fall back to defaults
/// derived from the experiment directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvNames {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
}

/// Which artifacts to write, and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub save_workbook: bool,

    #[serde(default)]
    pub save_csv: bool,

    #[serde(default)]
    pub save_parquet: bool,

    #[serde(default)]
    pub workbook_name: Option<String>,

    #[serde(default)]
    pub csv_names: CsvNames,

    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

fn default_results_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RESULTS_DIR)
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            save_workbook: false,
            save_csv: false,
            save_parquet: false,
            workbook_name: None,
            csv_names: CsvNames::default(),
            results_dir: default_results_dir(),
        }
    }
}

impl OutputSettings {
    pub fn any(&self) -> bool {
        self.save_workbook || self.save_csv || self.save_parquet
    }
}

/// What happens when a single file cannot be processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the file as skipped and continue with the next one.
    #[default]
    Skip,
    /// Abort the whole run on the first failing file.
    Abort,
}

/// Everything a run needs besides the experiment directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub make_plot: bool,

    #[serde(default)]
    pub plot: PlotSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default = "default_file_filter")]
    pub file_filter: String,

    #[serde(default)]
    pub layout: ExportLayout,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_file_filter() -> String {
    DEFAULT_FILE_FILTER.to_string()
}

impl RunConfig {
    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PamError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write configuration to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| PamError::io(path, e))
    }
}
