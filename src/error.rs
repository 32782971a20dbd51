//! Errors raised while reading a simulation output file.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read header line")]
    Header(#[source] std::io::Error),

    #[error("line {line}: expected 11 fields, found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("line {line}: column `{column}` is not a number: {value:?}")]
    NotNumeric {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("malformed CSV input")]
    Csv(#[from] csv::Error),
}
