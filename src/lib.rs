//! PAM fluorometry export collation.
//!
//! Reads every instrument export of an experiment directory, derives
//! `NPQown`, `PSII'`, `qP` and `rETR` per sample, and merges all samples into
//! a main table and a per-sample maxima table.
//!
//! ```no_run
//! use std::path::Path;
//! use pam_collate::config::RunConfig;
//! use pam_collate::pipeline::run_experiment;
//!
//! let outcome = run_experiment(Path::new("20230314"), &RunConfig::default()).unwrap();
//! println!("{} rows", outcome.results.main.n_rows());
//! ```

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod figure;
pub mod pipeline;
pub mod prompt;
pub mod state;
pub mod ui;

pub use error::{PamError, Result};
