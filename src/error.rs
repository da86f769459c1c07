use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy shared by the pipeline and the exporters
// ---------------------------------------------------------------------------

/// Everything the library layer can fail with.
#[derive(Error, Debug)]
pub enum PamError {
    #[error("experiment directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("no sample labels on the first line of {}", .0.display())]
    EmptyIdentity(PathBuf),

    #[error("required column '{column}' is missing after cleaning")]
    MissingColumn { column: String },

    #[error("column '{column}' holds non-numeric value '{value}' at row {row}")]
    NonNumericColumn {
        column: String,
        row: usize,
        value: String,
    },

    #[error("{}: {reason}", .path.display())]
    Layout { path: PathBuf, reason: String },

    #[error("{}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<PamError>,
    },

    #[error("{tables} tables were given but {names} names")]
    NameCountMismatch { tables: usize, names: usize },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PamError {
    /// Wrap an IO error together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PamError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the file a per-file error came from.
    pub fn in_file(path: impl Into<PathBuf>, source: PamError) -> Self {
        PamError::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Shorthand for [`PamError::MissingColumn`].
    pub fn missing_column(column: &str) -> Self {
        PamError::MissingColumn {
            column: column.to_string(),
        }
    }
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, PamError>;
