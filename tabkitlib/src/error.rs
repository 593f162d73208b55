//! Error types for tabkitlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, validating or rendering tables
#[derive(Error, Debug)]
pub enum TabkitError {
    /// Failed to open or read an input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed delimited input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A raw field could not be converted to its column type
    #[error("cannot convert {value:?} in column '{column}': {reason}")]
    Conversion {
        column: String,
        value: String,
        reason: String,
    },

    /// Same as `Conversion`, annotated with the 1-based input line
    #[error("line {line}: {source}")]
    AtLine {
        line: u64,
        #[source]
        source: Box<TabkitError>,
    },

    /// A row did not have one field per column
    #[error("row has {found} fields, expected {expected}")]
    RowLength { expected: usize, found: usize },

    /// Input had no header line
    #[error("input is empty, expected a header line")]
    EmptyInput,

    /// A validated field was assigned a negative number
    #[error("{field} must be >= 0")]
    NegativeValue { field: &'static str },

    /// A validated field was assigned a value of the wrong kind
    #[error("expected {expected} for '{field}', got {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A record has no attribute with this name
    #[error("no attribute named '{0}'")]
    UnknownAttribute(String),

    /// Formatter name not recognised
    #[error("unknown table format: {0}")]
    UnknownFormat(String),

    /// Printf-style spec could not be parsed or applied
    #[error("format error: {0}")]
    Format(String),

    /// Slice with a zero step or unparsable bounds
    #[error("invalid slice: {0}")]
    InvalidSlice(String),

    /// IO error while writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TabkitError {
    /// Attach the input line number to this error
    pub(crate) fn at_line(self, line: u64) -> Self {
        TabkitError::AtLine {
            line,
            source: Box::new(self),
        }
    }
}
