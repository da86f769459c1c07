use std::fs;
use std::path::Path;

use pam_collate::config::{FailurePolicy, RunConfig};
use pam_collate::data::aggregate::SAMPLE_NAME;
use pam_collate::data::discovery::{discover_files, DEFAULT_FILE_FILTER};
use pam_collate::data::model::CellValue;
use pam_collate::export::export_results;
use pam_collate::pipeline::{process_file, run_experiment};
use pam_collate::PamError;
use tempfile::tempdir;

const HEADER: &str = "t;ML;Temp.;PAR;F;Fo';Fm';~Fo';Y(II);NPQ;qP;ETR;";

fn export_text(labels: &str, rows: &[(f64, f64, f64)]) -> String {
    let mut text = format!("{labels}\n{HEADER}\n");
    for meta in ["Device;X", "Date;2023-03-14", "Mode;LC", "Unit;s"] {
        text.push_str(meta);
        text.push('\n');
    }
    for (i, (par, fm, fo)) in rows.iter().enumerate() {
        let measured_fo = if i == 0 { format!("{fo}") } else { String::new() };
        text.push_str(&format!(
            "{};on;20.0;{par};{};{measured_fo};{fm};{fo};0.5;0.1;0.9;1.0;\n",
            i * 30,
            fo + 20.0
        ));
    }
    text.push_str("End;;;;;;;;;;;;\n");
    text
}

fn write_export(dir: &Path, name: &str, labels: &str, rows: &[(f64, f64, f64)]) {
    fs::write(dir.join(name), export_text(labels, rows)).unwrap();
}

fn reference_rows() -> Vec<(f64, f64, f64)> {
    vec![(0.0, 500.0, 100.0), (100.0, 480.0, 100.0), (200.0, 450.0, 100.0)]
}

#[test]
fn test_reference_file_through_pipeline() {
    let dir = tempdir().unwrap();
    write_export(dir.path(), "lc_(1).CSV", "WT1,LHCX1g1", &reference_rows());

    let (table, maxima, identity) =
        process_file(&dir.path().join("lc_(1).CSV"), &Default::default()).unwrap();

    assert_eq!(identity.joined(), "WT1, LHCX1g1");
    assert_eq!(table.n_rows(), 3);
    assert!(table.column("Fo'").is_none(), "incomplete column must be dropped");
    assert!(table.columns().iter().all(|c| !c.has_missing()));
    assert_eq!(maxima.max_fm, 500.0);
    assert_eq!(maxima.max_fo, 100.0);

    let retr = table.numeric_column("rETR").unwrap();
    assert!((retr[1] - 79.1667).abs() < 1e-3);
    assert!((retr[2] - 155.5556).abs() < 1e-3);
}

#[test]
fn test_two_files_aggregate() {
    let dir = tempdir().unwrap();
    write_export(dir.path(), "b_(2).CSV", "LHCX1g1", &reference_rows()[..2]);
    write_export(dir.path(), "a_(1).CSV", "WT1", &reference_rows());
    fs::write(dir.path().join("readme.txt"), "x").unwrap();

    let outcome = run_experiment(dir.path(), &RunConfig::default()).unwrap();
    let main = &outcome.results.main;

    assert_eq!(main.n_rows(), 5);
    assert_eq!(main.n_rows(), outcome.summary.total_rows());
    assert_eq!(main.column_names()[0], SAMPLE_NAME);
    assert_eq!(outcome.results.maxima.len(), 2);
    assert_eq!(outcome.results.sample_names(), vec!["WT1", "LHCX1g1"]);

    let names = &main.column(SAMPLE_NAME).unwrap().values;
    assert_eq!(names[0], CellValue::Text("WT1".into()));
    assert_eq!(names[3], CellValue::Text("LHCX1g1".into()));
    assert!(outcome.figure.is_none());
}

#[test]
fn test_maxima_count_matches_discovery() {
    let dir = tempdir().unwrap();
    for i in 0..3 {
        write_export(dir.path(), &format!("s{i}_({i}).CSV"), &format!("S{i}"), &reference_rows());
    }
    fs::write(dir.path().join("other.csv"), "x").unwrap();
    fs::write(dir.path().join("log.txt"), "x").unwrap();

    let discovered = discover_files(dir.path(), DEFAULT_FILE_FILTER).unwrap();
    assert_eq!(discovered.len(), 3);

    let outcome = run_experiment(dir.path(), &RunConfig::default()).unwrap();
    assert_eq!(outcome.results.maxima.len(), discovered.len());
    assert_eq!(outcome.results.main.n_rows(), 9);
}

#[test]
fn test_failing_file_is_skipped() {
    let dir = tempdir().unwrap();
    write_export(dir.path(), "a_(1).CSV", "WT1", &reference_rows());
    fs::write(dir.path().join("b_(2).CSV"), "\nt;PAR\n").unwrap();
    fs::write(
        dir.path().join("c_(3).CSV"),
        export_text("WT2", &reference_rows()).replace("~Fo'", "Fo2"),
    )
    .unwrap();

    let outcome = run_experiment(dir.path(), &RunConfig::default()).unwrap();
    assert_eq!(outcome.summary.processed.len(), 1);
    assert_eq!(outcome.summary.skipped.len(), 2);
    assert!(outcome.summary.skipped[1].reason.contains("~Fo'"));
    assert_eq!(outcome.results.maxima.len(), 1);
}

#[test]
fn test_abort_policy_stops_run() {
    let dir = tempdir().unwrap();
    write_export(dir.path(), "a_(1).CSV", "WT1", &reference_rows());
    fs::write(dir.path().join("b_(2).CSV"), "\nt;PAR\n").unwrap();

    let config = RunConfig {
        failure_policy: FailurePolicy::Abort,
        ..Default::default()
    };
    match run_experiment(dir.path(), &config) {
        Err(PamError::InFile { path, source }) => {
            assert!(path.ends_with("b_(2).CSV"));
            assert!(matches!(*source, PamError::EmptyIdentity(_)));
        }
        other => panic!("expected a per-file error, got {other:?}"),
    }
}

#[test]
fn test_plot_and_export() {
    let dir = tempdir().unwrap();
    let experiment = dir.path().join("20230314");
    fs::create_dir(&experiment).unwrap();
    write_export(&experiment, "a_(1).CSV", "WT1", &reference_rows());
    write_export(&experiment, "b_(2).CSV", "LHCX1g1,LHCX1g2", &reference_rows());

    let mut config = RunConfig::default();
    config.make_plot = true;
    config.output.save_workbook = true;
    config.output.save_csv = true;
    config.output.save_parquet = true;
    config.output.results_dir = dir.path().join("results");

    let outcome = run_experiment(&experiment, &config).unwrap();
    let figure = outcome.figure.as_ref().unwrap();
    let labels: Vec<_> = figure.legend().iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["WT", "LHCX1g1", "LHCX1g2"]);
    assert_eq!(figure.panel(0, 1).unwrap().series.len(), 3);

    let written = export_results(&outcome.results, &config.output, &outcome.experiment).unwrap();
    assert_eq!(written.len(), 5);
    for path in &written {
        assert!(path.exists(), "{} missing", path.display());
    }

    let main_csv = fs::read_to_string(dir.path().join("results/20230314_mainData.CSV")).unwrap();
    let header = main_csv.lines().next().unwrap();
    assert!(header.starts_with(",sampleName,t,"));
    assert!(header.ends_with("NPQown,PSII',rETR"));
    assert_eq!(main_csv.lines().count(), 7);

    let max_csv = fs::read_to_string(dir.path().join("results/20230314_maxData.CSV")).unwrap();
    assert_eq!(max_csv.lines().count(), 3);
}
