//! Error types for the dashboard.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which selection control a column name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x-axis"),
            Axis::Y => f.write_str("y-axis"),
        }
    }
}

/// Errors that can occur while running the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dataset could not be fetched or parsed. Fatal at startup.
    #[error("failed to load dataset: {0}")]
    DataLoad(#[from] LoadError),

    /// A column name outside the whitelist of its control.
    #[error("'{name}' is not a valid {axis} feature")]
    InvalidSelection {
        /// The control the name was submitted for.
        axis: Axis,
        /// The rejected name.
        name: String,
    },

    /// Chart rendering failed.
    #[error("chart rendering failed: {0}")]
    Render(String),

    /// Spreadsheet export failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Export(err.to_string())
    }
}

/// Failures while acquiring and decoding the survey file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Remote fetch failed.
    #[cfg(feature = "web")]
    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// I/O error while reading a local copy.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited data.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required raw column is absent from the header.
    #[error("column '{name}' not found in header")]
    MissingColumn { name: String },

    /// A value that should be numeric is not.
    #[error("row {row}: cannot convert '{value}' in column '{column}' to a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// A respondent without an identifier.
    #[error("row {row}: missing respondent id")]
    MissingId { row: usize },

    /// Two respondents share an identifier.
    #[error("row {row}: duplicate respondent id {id}")]
    DuplicateId { row: usize, id: u64 },
}
