use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::figure::Figure;
use crate::pipeline::{run_experiment, RunOutcome};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    /// Settings used when (re)running an experiment from the viewer.
    pub config: RunConfig,

    /// Directory of the run currently shown.
    pub experiment_dir: Option<PathBuf>,

    /// Result of the last successful run.
    pub outcome: Option<RunOutcome>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a run is in progress.
    pub loading: bool,
}

impl ViewerState {
    pub fn new(mut config: RunConfig) -> Self {
        config.make_plot = true;
        Self {
            config,
            experiment_dir: None,
            outcome: None,
            status_message: None,
            loading: false,
        }
    }

    /// Show the result of a run that already happened.
    pub fn set_outcome(&mut self, dir: PathBuf, outcome: RunOutcome) {
        self.status_message = (!outcome.summary.skipped.is_empty())
            .then(|| format!("{} files skipped", outcome.summary.skipped.len()));
        self.experiment_dir = Some(dir);
        self.outcome = Some(outcome);
        self.loading = false;
    }

    /// Run the pipeline on `dir` and show the result, keeping the previous
    /// run on failure.
    pub fn open_experiment(&mut self, dir: &Path) {
        self.loading = true;
        match run_experiment(dir, &self.config) {
            Ok(outcome) => {
                log::info!(
                    "Loaded {} samples from {}",
                    outcome.summary.processed.len(),
                    dir.display()
                );
                self.set_outcome(dir.to_path_buf(), outcome);
            }
            Err(e) => {
                log::error!("Failed to process experiment: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.loading = false;
            }
        }
    }

    pub fn figure(&self) -> Option<&Figure> {
        self.outcome.as_ref().and_then(|o| o.figure.as_ref())
    }
}
