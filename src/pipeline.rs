//! Batch driver: discovery → per-file processing → aggregation.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{FailurePolicy, RunConfig};
use crate::data::aggregate::{AggregatedResults, Aggregator};
use crate::data::discovery::discover_files;
use crate::data::layout::ExportLayout;
use crate::data::loader::{load_measurements, read_identity};
use crate::data::metrics::{compute_derived, SampleMaxima};
use crate::data::model::{DerivedTable, SampleIdentity};
use crate::error::{PamError, Result};
use crate::figure::Figure;

/// A file that made it into the aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedFile {
    pub path: PathBuf,
    pub sample_name: String,
    pub rows: usize,
}

/// A file left out of the aggregates, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub processed: Vec<ProcessedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.processed.iter().map(|p| p.rows).sum()
    }
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Name of the experiment directory, used for default output names.
    pub experiment: String,
    pub results: AggregatedResults,
    /// Present when the run was asked to plot.
    pub figure: Option<Figure>,
    pub summary: RunSummary,
}

/// One file through identity extraction, cleaning and derived metrics.
pub fn process_file(path: &Path, layout: &ExportLayout) -> Result<(DerivedTable, SampleMaxima, SampleIdentity)> {
    let identity = read_identity(path, layout.identity_separator)?;
    let table = load_measurements(path, layout)?;
    let (derived, maxima) = compute_derived(table, &identity)?;
    Ok((derived, maxima, identity))
}

/// The experiment name is the last component of its directory path.
pub fn experiment_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "experiment".to_string())
}

/// Process every matching file of `dir` in discovery order.
///
/// A missing directory always fails the run. Per-file errors follow
/// `config.failure_policy`.
pub fn run_experiment(dir: &Path, config: &RunConfig) -> Result<RunOutcome> {
    let files = discover_files(dir, &config.file_filter)?;
    log::info!(
        "Found {} files matching '{}' in {}",
        files.len(),
        config.file_filter,
        dir.display()
    );

    let mut aggregator = Aggregator::new();
    let mut figure = config.make_plot.then(|| Figure::new(config.plot.clone()));
    let mut summary = RunSummary::default();

    for path in files {
        let (derived, maxima, identity) = match process_file(&path, &config.layout) {
            Ok(processed) => processed,
            Err(e) => match config.failure_policy {
                FailurePolicy::Abort => return Err(PamError::in_file(path, e)),
                FailurePolicy::Skip => {
                    log::warn!("Skipping {}: {e}", path.display());
                    summary.skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            },
        };

        if let Some(fig) = figure.as_mut() {
            if let Err(e) = fig.add_sample(&derived, &identity) {
                log::warn!("Not plotting {}: {e}", path.display());
            }
        }

        let rows = derived.n_rows();
        log::info!("Processed {} ({identity}, {rows} rows)", path.display());
        summary.processed.push(ProcessedFile {
            path,
            sample_name: identity.joined(),
            rows,
        });
        aggregator.append(derived, maxima, &identity);
    }

    Ok(RunOutcome {
        experiment: experiment_name(dir),
        results: aggregator.finalize(),
        figure,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experiment_name() {
        assert_eq!(experiment_name(Path::new("data/20230314")), "20230314");
        assert_eq!(experiment_name(Path::new("20230314/")), "20230314");
        assert_eq!(experiment_name(Path::new("/")), "experiment");
    }

    #[test]
    fn test_missing_directory_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_experiment(&dir.path().join("nope"), &RunConfig::default()).unwrap_err();
        assert!(matches!(err, PamError::DirectoryNotFound(_)));
    }
}
