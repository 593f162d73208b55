//! Generic CSV readers.
//!
//! Every reader skips exactly one header line and converts the remaining
//! rows positionally. The record shape is chosen by the [`CsvParser`]
//! implementation:
//!
//! - [`DictCsvParser`]: one [`Record`] per row, typed by a converter list
//! - [`InstanceCsvParser`]: one `T` per row via [`FromRow`]
//!
//! [`read_csv_as_columns`] skips the per-row record entirely and fills a
//! [`DataCollection`].
//!
//! The first conversion failure aborts the read and is reported with its
//! input line number.

use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;

use tracing::debug;

use super::collection::DataCollection;
use super::record::Record;
use super::value::{ColumnType, Interner};
use crate::error::TabkitError;
use crate::Result;

/// Types that can be built from one row of raw text fields.
pub trait FromRow: Sized {
    fn from_row(row: &[&str]) -> Result<Self>;
}

/// Row-to-record strategy shared by the CSV readers.
pub trait CsvParser {
    type Record;

    /// Build one record from the header names and a raw row.
    fn make_record(&mut self, headers: &[String], row: &[&str]) -> Result<Self::Record>;

    /// Read every data row of the file at `path`.
    fn parse(&mut self, path: impl AsRef<Path>) -> Result<Vec<Self::Record>> {
        let path = path.as_ref();
        let records = self.parse_reader(open_file(path)?)?;
        debug!(path = %path.display(), rows = records.len(), "parsed csv");
        Ok(records)
    }

    /// Read every data row from an already opened source.
    fn parse_reader<R: Read>(&mut self, reader: R) -> Result<Vec<Self::Record>> {
        let (headers, rows) = csv_rows(reader)?;
        let mut records = Vec::new();
        for row in rows {
            let row = row?;
            let line = line_of(&row);
            let fields: Vec<&str> = row.iter().collect();
            let record = self
                .make_record(&headers, &fields)
                .map_err(|e| e.at_line(line))?;
            records.push(record);
        }
        Ok(records)
    }
}

/// Builds a [`Record`] per row using one converter per column.
#[derive(Debug, Clone)]
pub struct DictCsvParser {
    types: Vec<ColumnType>,
    interner: Interner,
}

impl DictCsvParser {
    pub fn new(types: Vec<ColumnType>) -> Self {
        Self {
            types,
            interner: Interner::new(),
        }
    }
}

impl CsvParser for DictCsvParser {
    type Record = Record;

    fn make_record(&mut self, headers: &[String], row: &[&str]) -> Result<Record> {
        if row.len() < self.types.len() {
            return Err(TabkitError::RowLength {
                expected: self.types.len(),
                found: row.len(),
            });
        }
        let mut record = Record::new();
        for ((name, coltype), raw) in headers.iter().zip(&self.types).zip(row) {
            let value = coltype.parse(name, raw, &mut self.interner)?;
            record.insert(name.clone(), value);
        }
        Ok(record)
    }
}

/// Builds a `T` per row through its [`FromRow`] implementation.
#[derive(Debug)]
pub struct InstanceCsvParser<T> {
    _marker: PhantomData<T>,
}

impl<T> InstanceCsvParser<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for InstanceCsvParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FromRow> CsvParser for InstanceCsvParser<T> {
    type Record = T;

    fn make_record(&mut self, _headers: &[String], row: &[&str]) -> Result<T> {
        T::from_row(row)
    }
}

/// Read a CSV file into a list of records typed by `coltypes`.
pub fn read_csv_as_dicts(path: impl AsRef<Path>, coltypes: &[ColumnType]) -> Result<Vec<Record>> {
    DictCsvParser::new(coltypes.to_vec()).parse(path)
}

/// Read a CSV file into a list of `T` instances.
pub fn read_csv_as_instances<T: FromRow>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    InstanceCsvParser::<T>::new().parse(path)
}

/// Read a CSV file into a column store. Headers come from the first line.
pub fn read_csv_as_columns(
    path: impl AsRef<Path>,
    coltypes: &[ColumnType],
) -> Result<DataCollection> {
    let path = path.as_ref();
    let data = columns_from_reader(open_file(path)?, coltypes)?;
    debug!(path = %path.display(), rows = data.len(), "loaded columns");
    Ok(data)
}

/// Same as [`read_csv_as_columns`] for an already opened source.
pub fn columns_from_reader<R: Read>(reader: R, coltypes: &[ColumnType]) -> Result<DataCollection> {
    let (headers, rows) = csv_rows(reader)?;
    let mut data = DataCollection::new(headers, coltypes.to_vec())?;
    for row in rows {
        let row = row?;
        let line = line_of(&row);
        let fields: Vec<&str> = row.iter().collect();
        data.append(&fields).map_err(|e| e.at_line(line))?;
    }
    Ok(data)
}

pub(crate) fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| TabkitError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Split a source into its header names and the remaining raw rows.
pub(crate) fn csv_rows<R: Read>(
    reader: R,
) -> Result<(Vec<String>, csv::StringRecordsIntoIter<R>)> {
    let mut rows = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records();
    let headers = match rows.next() {
        Some(header) => header?.iter().map(str::to_string).collect(),
        None => return Err(TabkitError::EmptyInput),
    };
    Ok((headers, rows))
}

pub(crate) fn line_of(row: &csv::StringRecord) -> u64 {
    row.position().map_or(0, |p| p.line())
}
