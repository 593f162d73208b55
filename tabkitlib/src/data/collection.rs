//! Column-oriented storage for typed CSV data.
//!
//! `DataCollection` keeps one `Vec<Value>` per header instead of one
//! record per row. Conversion happens once on `append`; reading a row
//! back rebuilds a [`Record`] from the parallel columns.
//!
//! The column vectors only ever grow together: `append` converts every
//! field before touching any column, so a bad row leaves the store as it
//! was.

use std::ops::{Bound, RangeBounds};
use std::str::FromStr;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use super::record::Record;
use super::value::{ColumnType, Interner, Value};
use crate::error::TabkitError;
use crate::Result;

/// Parallel-array table with a fixed set of typed columns.
#[derive(Debug, Clone)]
pub struct DataCollection {
    headers: Vec<String>,
    coltypes: Vec<ColumnType>,
    columns: Vec<Vec<Value>>,
    interner: Interner,
}

impl DataCollection {
    /// Create an empty store. `coltypes` must have one entry per header.
    pub fn new(headers: Vec<String>, coltypes: Vec<ColumnType>) -> Result<Self> {
        if headers.len() != coltypes.len() {
            return Err(TabkitError::RowLength {
                expected: headers.len(),
                found: coltypes.len(),
            });
        }
        let columns = vec![Vec::new(); headers.len()];
        Ok(DataCollection {
            headers,
            coltypes,
            columns,
            interner: Interner::new(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn coltypes(&self) -> &[ColumnType] {
        &self.coltypes
    }

    pub fn columns(&self) -> &[Vec<Value>] {
        &self.columns
    }

    /// Values of a single column by header name
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Number of rows stored
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert a raw row and append one value to each column.
    pub fn append<S: AsRef<str>>(&mut self, row: &[S]) -> Result<()> {
        let DataCollection {
            headers,
            coltypes,
            columns,
            interner,
        } = self;

        if row.len() != headers.len() {
            return Err(TabkitError::RowLength {
                expected: headers.len(),
                found: row.len(),
            });
        }

        let converted = coltypes
            .iter()
            .zip(headers.iter())
            .zip(row)
            .map(|((coltype, header), raw)| coltype.parse(header, raw.as_ref(), interner))
            .collect::<Result<Vec<Value>>>()?;

        for (column, value) in columns.iter_mut().zip(converted) {
            column.push(value);
        }
        Ok(())
    }

    /// Rebuild the record at `index`.
    pub fn get(&self, index: usize) -> Option<Record> {
        if index >= self.len() {
            return None;
        }
        Some(Record::from_pairs(
            self.headers
                .iter()
                .zip(&self.columns)
                .map(|(h, col)| (h.clone(), col[index].clone())),
        ))
    }

    /// Copy the selected rows into a new store with the same schema.
    ///
    /// Bounds are clamped to the stored length, the end is exclusive and
    /// `step` must be at least 1. Values are copied as-is, not re-parsed.
    pub fn slice(&self, range: impl RangeBounds<usize>, step: usize) -> Result<DataCollection> {
        let indices = slice_indices(self.len(), range, step)?;
        let mut out = DataCollection {
            headers: self.headers.clone(),
            coltypes: self.coltypes.clone(),
            columns: vec![Vec::new(); self.headers.len()],
            interner: self.interner.clone(),
        };
        for i in indices {
            for (dst, src) in out.columns.iter_mut().zip(&self.columns) {
                dst.push(src[i].clone());
            }
        }
        Ok(out)
    }

    /// Apply a parsed `start:stop:step` spec.
    pub fn slice_spec(&self, spec: &SliceSpec) -> Result<DataCollection> {
        let start = spec.start.map_or(Bound::Unbounded, Bound::Included);
        let stop = spec.stop.map_or(Bound::Unbounded, Bound::Excluded);
        self.slice((start, stop), spec.step)
    }

    /// Iterate over rebuilt records in row order.
    pub fn iter(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    pub(crate) fn interner(&self) -> &Interner {
        &self.interner
    }
}

impl Serialize for DataCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for record in self.iter() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}

/// Resolve a range and step against a sequence of `len` items.
pub(crate) fn slice_indices(
    len: usize,
    range: impl RangeBounds<usize>,
    step: usize,
) -> Result<std::iter::StepBy<std::ops::Range<usize>>> {
    if step == 0 {
        return Err(TabkitError::InvalidSlice("step cannot be zero".to_string()));
    }
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    let end = end.min(len);
    let start = start.min(end);
    Ok((start..end).step_by(step))
}

/// A `start:stop:step` slice with optional parts, e.g. `10:20`, `::2`, `5:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: Option<usize>,
    pub stop: Option<usize>,
    pub step: usize,
}

impl Default for SliceSpec {
    fn default() -> Self {
        Self {
            start: None,
            stop: None,
            step: 1,
        }
    }
}

impl FromStr for SliceSpec {
    type Err = TabkitError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(TabkitError::InvalidSlice(format!(
                "'{}': use start:stop or start:stop:step",
                s
            )));
        }
        let bound = |part: &str| -> Result<Option<usize>> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            part.parse::<usize>()
                .map(Some)
                .map_err(|e| TabkitError::InvalidSlice(format!("'{}': {}", s, e)))
        };
        let step = match parts.get(2) {
            Some(p) => bound(p)?.unwrap_or(1),
            None => 1,
        };
        if step == 0 {
            return Err(TabkitError::InvalidSlice("step cannot be zero".to_string()));
        }
        Ok(SliceSpec {
            start: bound(parts[0])?,
            stop: bound(parts[1])?,
            step,
        })
    }
}
