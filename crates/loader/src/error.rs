use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{column}' is missing from the {file} file")]
    MissingColumn { file: &'static str, column: &'static str },

    #[error("Data integrity violation in the {file} file at line {line}: {reason}")]
    DataIntegrity {
        file: &'static str,
        line: u64,
        reason: String,
    },
}
