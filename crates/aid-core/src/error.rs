use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the assistance summary pipeline.
///
/// Every variant here aborts the run. Missing required columns are not an
/// error in this sense: they are reported as an error-shaped document by the
/// analysis entry point.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input bytes are not valid UTF-8.
    #[error("Input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The input could not be parsed as delimited tabular data.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The input has no header row at all.
    #[error("No columns to parse from input")]
    EmptyInput,

    /// The zip-to-city reference table is unusable.
    #[error("Invalid zip-city mapping: {0}")]
    ZipMap(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the summary crates.
pub type Result<T> = std::result::Result<T, SummaryError>;
