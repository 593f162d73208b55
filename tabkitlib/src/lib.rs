//! # tabkitlib
//!
//! Load tabular text files into typed in-memory structures and print them
//! back out as tables.
//!
//! ## Overview
//!
//! The crate is split into two stages:
//!
//! - **Data**: CSV readers that produce records, structs or a compact
//!   column store ([`DataCollection`]), each field converted by a
//!   [`ColumnType`]
//! - **Output**: pluggable table formatters (text, CSV, HTML) with
//!   per-column printf-style specs and upper-case headings, driven by
//!   [`print_table`]
//!
//! ## Features
//!
//! - **Typed columns**: integers, floats, strings and interned strings
//! - **Validated records**: [`Stock`] never holds a negative share count or price
//! - **Scoped output redirection**: [`redirect_output`] always restores the
//!   previous sink
//! - **Ride analytics**: route counts and ridership changes over any ride
//!   representation
//! - **Footprint comparison**: rough heap cost of each representation
//!
//! ## Example
//!
//! ```rust
//! use tabkitlib::{print_table_to, read_portfolio, ReportOptions, FormatKind};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let path = dir.path().join("portfolio.csv");
//! fs::write(&path, "name,shares,price\nAA,100,32.20\nIBM,50,91.10\n").unwrap();
//!
//! let portfolio = read_portfolio(&path).unwrap();
//! assert_eq!(portfolio.len(), 2);
//!
//! let formatter = ReportOptions::new()
//!     .format(FormatKind::Csv)
//!     .column_formats(["%s", "%d", "%0.2f"])
//!     .build_formatter()
//!     .unwrap();
//! let mut out = Vec::new();
//! print_table_to(&mut out, &portfolio, &["name", "shares", "price"], &formatter).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "name,shares,price\nAA,100,32.20\nIBM,50,91.10\n"
//! );
//! ```

pub mod data;
pub mod error;
pub mod footprint;
pub mod options;
pub mod output;

pub use data::{
    portfolio_cost, read_csv_as_columns, read_csv_as_dicts, read_csv_as_instances,
    read_portfolio, ColumnType, DataCollection, MutInt, Record, Ride, RideData, SliceSpec, Stock,
    Value,
};
pub use error::TabkitError;
pub use footprint::{compare_footprints, footprint, Footprint, FootprintRow};
pub use options::ReportOptions;
pub use output::{
    create_formatter, print_table, print_table_to, redirect_output, FormatKind, TableFormatter,
};

/// Result type for tabkitlib operations
pub type Result<T> = std::result::Result<T, TabkitError>;
