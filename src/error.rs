use thiserror::Error;

/// Failure of a whole fill operation.
///
/// Every variant aborts the upload before any cell is written. Problems that
/// only concern a single row are never raised; they travel as
/// [`RowNote`](crate::extract::RowNote)s next to the derived values instead.
#[derive(Error, Debug)]
pub enum FillError {
    /// The spec and/or identifier header is absent from the first row.
    #[error("missing source columns: {}", .0.join(", "))]
    MissingSourceColumns(Vec<String>),

    /// One or more of the five target headers is absent from the first row.
    #[error("missing target columns: {}", .0.join(", "))]
    MissingTargetColumns(Vec<String>),

    /// The upload is not a readable workbook, or has no sheet / header row.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<calamine::XlsxError> for FillError {
    fn from(e: calamine::XlsxError) -> Self {
        FillError::MalformedInput(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for FillError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        FillError::Unexpected(e.to_string())
    }
}

impl From<std::io::Error> for FillError {
    fn from(e: std::io::Error) -> Self {
        FillError::Unexpected(e.to_string())
    }
}

/// Errors raised while loading the JSON configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
