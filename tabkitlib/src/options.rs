//! Options controlling how reports are rendered.
//!
//! This module contains the configuration types that pick a table
//! formatter and the decorations wrapped around it.

use serde::{Deserialize, Serialize};

use crate::output::formatter::{create_formatter, FormatKind, TableFormatter};
use crate::Result;

/// Options for rendering a table report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Base encoding
    pub format: FormatKind,
    /// One printf-style spec per column, applied to row values
    pub column_formats: Vec<String>,
    /// Upper-case the heading row
    pub upper_headers: bool,
}

impl ReportOptions {
    /// Plain text output, no decorations (default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the base encoding
    pub fn format(mut self, format: FormatKind) -> Self {
        self.format = format;
        self
    }

    /// Builder: set per-column format specs
    pub fn column_formats<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_formats = specs.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: upper-case the headings
    pub fn upper_headers(mut self, enabled: bool) -> Self {
        self.upper_headers = enabled;
        self
    }

    /// Build the formatter these options describe.
    ///
    /// Fails if any column spec does not parse.
    pub fn build_formatter(&self) -> Result<Box<dyn TableFormatter>> {
        create_formatter(self.format, &self.column_formats, self.upper_headers)
    }
}
