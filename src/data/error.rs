use std::path::PathBuf;

use thiserror::Error;

/// Failure to load one of the source tables. Fatal for the admissions table,
/// recoverable (empty index) for the university metadata.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read spreadsheet {}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' not found in {} (available: {available:?})", path.display())]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet file")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },
}
