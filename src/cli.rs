//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{FailurePolicy, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "pam-collate")]
#[command(about = "Collate PAM fluorometry exports into merged tables and figures", version)]
pub struct Cli {
    /// Experiment directory holding the instrument exports (a folder dialog
    /// opens when omitted)
    pub experiment_dir: Option<PathBuf>,

    /// Path to a JSON run configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Open the figure viewer after processing
    #[arg(long)]
    pub plot: bool,

    /// Column plotted on an x-axis (repeatable)
    #[arg(short = 'x', long = "x-axis")]
    pub x_axis: Vec<String>,

    /// Column plotted on a y-axis (repeatable)
    #[arg(short = 'y', long = "y-axis")]
    pub y_axis: Vec<String>,

    /// Substring grouping samples in the figure (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Substring shared by all wildtype samples
    #[arg(long)]
    pub wildtype: Option<String>,

    /// Write the merged tables to an .xlsx workbook
    #[arg(long)]
    pub xlsx: bool,

    /// Write the merged tables to two CSV files
    #[arg(long)]
    pub csv: bool,

    /// Write the merged tables to two Parquet files
    #[arg(long)]
    pub parquet: bool,

    /// Workbook file name (".xlsx" appended when missing)
    #[arg(long)]
    pub workbook_name: Option<String>,

    /// File name of the main-data CSV (".CSV" appended when missing)
    #[arg(long)]
    pub main_csv_name: Option<String>,

    /// File name of the maxima CSV (".CSV" appended when missing)
    #[arg(long)]
    pub max_csv_name: Option<String>,

    /// Directory receiving all outputs
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Substring selecting export files in the experiment directory
    #[arg(long)]
    pub filter: Option<String>,

    /// Abort on the first file that cannot be processed
    #[arg(long)]
    pub fail_fast: bool,

    /// Answer the setup questions on the console instead of using flags
    #[arg(short, long)]
    pub interactive: bool,

    /// Write the effective configuration to this JSON file
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut RunConfig) {
        config.make_plot |= self.plot;
        if !self.x_axis.is_empty() {
            config.plot.x_axis_columns = self.x_axis.clone();
        }
        if !self.y_axis.is_empty() {
            config.plot.y_axis_columns = self.y_axis.clone();
        }
        if !self.tags.is_empty() {
            config.plot.sample_tags = self.tags.clone();
        }
        if let Some(wildtype) = &self.wildtype {
            config.plot.wildtype_tag = wildtype.clone();
        }

        let output = &mut config.output;
        output.save_workbook |= self.xlsx;
        output.save_csv |= self.csv;
        output.save_parquet |= self.parquet;
        if self.workbook_name.is_some() {
            output.workbook_name = self.workbook_name.clone();
        }
        if self.main_csv_name.is_some() {
            output.csv_names.main = self.main_csv_name.clone();
        }
        if self.max_csv_name.is_some() {
            output.csv_names.max = self.max_csv_name.clone();
        }
        if let Some(dir) = &self.results_dir {
            output.results_dir = dir.clone();
        }

        if let Some(filter) = &self.filter {
            config.file_filter = filter.clone();
        }
        if self.fail_fast {
            config.failure_policy = FailurePolicy::Abort;
        }
    }

    /// Log filter implied by `-v` flags.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
