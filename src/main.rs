use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use pam_collate::app::run_viewer;
use pam_collate::cli::Cli;
use pam_collate::config::RunConfig;
use pam_collate::export::export_results;
use pam_collate::pipeline::{run_experiment, RunOutcome};
use pam_collate::prompt::Questionnaire;
use pam_collate::state::ViewerState;

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level())).init();

    let mut config = match &cli.config {
        Some(path) => RunConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    cli.apply(&mut config);

    let experiment_dir = if cli.interactive {
        let stdin = io::stdin();
        Questionnaire::new(stdin.lock(), io::stdout())
            .run(&mut config)
            .context("reading answers")?
    } else {
        match &cli.experiment_dir {
            Some(dir) => dir.clone(),
            None => pick_experiment_dir()?,
        }
    };

    if let Some(path) = &cli.save_config {
        config
            .to_json_file(path)
            .with_context(|| format!("writing config {}", path.display()))?;
    }

    if !config.make_plot && !config.output.any() {
        bail!("nothing to do: pass --plot and/or one of --xlsx, --csv, --parquet");
    }

    let outcome = run_experiment(&experiment_dir, &config)
        .with_context(|| format!("processing {}", experiment_dir.display()))?;
    print_summary(&outcome);

    export_results(&outcome.results, &config.output, &outcome.experiment).context("writing outputs")?;

    if config.make_plot {
        let mut state = ViewerState::new(config);
        state.set_outcome(experiment_dir, outcome);
        run_viewer(state).map_err(|e| anyhow::anyhow!("viewer failed: {e}"))?;
    }
    Ok(())
}

fn pick_experiment_dir() -> Result<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose the PAM experiment folder")
        .pick_folder()
        .context("no experiment directory given")
}

fn print_summary(outcome: &RunOutcome) {
    let summary = &outcome.summary;
    println!();
    println!("Experiment {}", outcome.experiment);
    println!(
        "  processed: {} files, {} rows",
        summary.processed.len(),
        summary.total_rows()
    );
    for file in &summary.processed {
        println!("    {:<40} {:>6} rows  {}", file.sample_name, file.rows, file.path.display());
    }
    if !summary.skipped.is_empty() {
        println!("  skipped: {} files", summary.skipped.len());
        for file in &summary.skipped {
            println!("    {}: {}", file.path.display(), file.reason);
        }
    }
}
