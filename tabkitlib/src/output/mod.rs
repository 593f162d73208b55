//! Output: render records as tables.
//!
//! This module handles the presentation side of the crate. It provides:
//!
//! - **Formatters**: text, CSV and HTML encodings behind [`TableFormatter`],
//!   plus the [`ColumnFormat`] and [`UpperHeaders`] decorators
//! - **Format specs**: printf-style single-value specs ([`FormatSpec`])
//! - **Report driver**: [`print_table`] pulls named attributes from records
//! - **Sink**: a per-thread output target with scoped redirection
//!
//! ## Example
//!
//! ```rust
//! use tabkitlib::output::{create_formatter, print_table_to, FormatKind};
//! use tabkitlib::Stock;
//!
//! let portfolio = vec![Stock::new("AA", 100, 32.2).unwrap()];
//! let formatter = create_formatter(FormatKind::Csv, &["%s", "%d"], false).unwrap();
//! let mut out = Vec::new();
//! print_table_to(&mut out, &portfolio, &["name", "shares"], &formatter).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "name,shares\nAA,100\n");
//! ```

pub mod formatter;
pub mod printf;
pub mod report;
pub mod sink;

pub use formatter::{
    create_formatter, create_formatter_named, ColumnFormat, CsvTableFormatter, FormatKind,
    HtmlTableFormatter, TableFormatter, TextTableFormatter, UpperHeaders,
};
pub use printf::FormatSpec;
pub use report::{print_table, print_table_to, Attributes};
pub use sink::{redirect_output, with_output, CaptureBuffer};
