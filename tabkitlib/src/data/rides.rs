//! Bus ride data in several in-memory representations.
//!
//! The input has four columns: `route,date,daytype,rides`. Each reader
//! loads the same file into a different shape so their memory cost can be
//! compared (see [`crate::footprint`]):
//!
//! | Reader                     | Shape                         |
//! |----------------------------|-------------------------------|
//! | `read_rides_as_tuples`     | `Vec<(String, String, String, i64)>` |
//! | `read_rides_as_dicts`      | `Vec<Record>`                 |
//! | `read_rides_as_structs`    | `Vec<Ride>`                   |
//! | `read_rides_as_columns`    | `RideColumns` (four vectors)  |
//! | `read_rides_as_ridedata`   | `RideData` (indexable store)  |
//!
//! All of them fail on the first unparsable ride count.

use std::io::Read;
use std::ops::RangeBounds;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::collection::slice_indices;
use super::reader::{csv_rows, line_of, open_file, FromRow};
use super::record::Record;
use super::value::Value;
use crate::error::TabkitError;
use crate::Result;

pub const RIDE_FIELDS: [&str; 4] = ["route", "date", "daytype", "rides"];

/// `(route, date, daytype, rides)`
pub type RideTuple = (String, String, String, i64);

/// One day of ridership on one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ride {
    pub route: String,
    pub date: String,
    pub daytype: String,
    pub rides: i64,
}

impl FromRow for Ride {
    fn from_row(row: &[&str]) -> Result<Self> {
        let [route, date, daytype, rides] = split_ride_row(row)?;
        Ok(Ride {
            route: route.to_string(),
            date: date.to_string(),
            daytype: daytype.to_string(),
            rides: parse_rides(rides)?,
        })
    }
}

fn split_ride_row<'a>(row: &[&'a str]) -> Result<[&'a str; 4]> {
    match row {
        [route, date, daytype, rides, ..] => Ok([*route, *date, *daytype, *rides]),
        _ => Err(TabkitError::RowLength {
            expected: RIDE_FIELDS.len(),
            found: row.len(),
        }),
    }
}

fn parse_rides(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| TabkitError::Conversion {
            column: "rides".to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Plain column vectors, no indexing helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RideColumns {
    pub routes: Vec<String>,
    pub dates: Vec<String>,
    pub daytypes: Vec<String>,
    pub numrides: Vec<i64>,
}

/// Column store specialised to the ride schema.
///
/// Reading an index rebuilds a `route/date/daytype/rides` record; slicing
/// copies the selected rows into a new store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RideData {
    columns: RideColumns,
}

impl RideData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.columns.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.routes.is_empty()
    }

    /// Append one ride, growing every column by one.
    pub fn append(&mut self, ride: Ride) {
        self.columns.routes.push(ride.route);
        self.columns.dates.push(ride.date);
        self.columns.daytypes.push(ride.daytype);
        self.columns.numrides.push(ride.rides);
    }

    /// Append from a mapping with `route`, `date`, `daytype` and `rides` keys.
    pub fn append_record(&mut self, record: &Record) -> Result<()> {
        let text = |field: &'static str| -> Result<String> {
            match record.get(field) {
                Some(Value::Str(s)) => Ok(s.to_string()),
                Some(other) => Err(TabkitError::WrongType {
                    field: field.to_string(),
                    expected: "str",
                    found: other.kind(),
                }),
                None => Err(TabkitError::UnknownAttribute(field.to_string())),
            }
        };
        let rides = match record.get("rides") {
            Some(Value::Int(n)) => *n,
            Some(other) => {
                return Err(TabkitError::WrongType {
                    field: "rides".to_string(),
                    expected: "int",
                    found: other.kind(),
                })
            }
            None => return Err(TabkitError::UnknownAttribute("rides".to_string())),
        };
        let ride = Ride {
            route: text("route")?,
            date: text("date")?,
            daytype: text("daytype")?,
            rides,
        };
        self.append(ride);
        Ok(())
    }

    /// Typed view of one row
    pub fn ride(&self, index: usize) -> Option<Ride> {
        if index >= self.len() {
            return None;
        }
        Some(Ride {
            route: self.columns.routes[index].clone(),
            date: self.columns.dates[index].clone(),
            daytype: self.columns.daytypes[index].clone(),
            rides: self.columns.numrides[index],
        })
    }

    /// Mapping view of one row
    pub fn get(&self, index: usize) -> Option<Record> {
        self.ride(index).map(|ride| ride_record(&ride))
    }

    /// Copy the selected rows into a new store, clamped like sequence slicing.
    pub fn slice(&self, range: impl RangeBounds<usize>, step: usize) -> Result<RideData> {
        let mut out = RideData::new();
        for i in slice_indices(self.len(), range, step)? {
            if let Some(ride) = self.ride(i) {
                out.append(ride);
            }
        }
        Ok(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = Ride> + '_ {
        (0..self.len()).filter_map(move |i| self.ride(i))
    }

    pub fn routes(&self) -> &[String] {
        &self.columns.routes
    }

    pub fn dates(&self) -> &[String] {
        &self.columns.dates
    }

    pub fn daytypes(&self) -> &[String] {
        &self.columns.daytypes
    }

    pub fn numrides(&self) -> &[i64] {
        &self.columns.numrides
    }

    /// The underlying column vectors
    pub fn as_columns(&self) -> &RideColumns {
        &self.columns
    }
}

fn ride_record(ride: &Ride) -> Record {
    Record::from_pairs([
        ("route", Value::from(ride.route.as_str())),
        ("date", Value::from(ride.date.as_str())),
        ("daytype", Value::from(ride.daytype.as_str())),
        ("rides", Value::Int(ride.rides)),
    ])
}

/// Drive `f` over every data row of a ride file.
fn for_each_ride<R, F>(reader: R, mut f: F) -> Result<()>
where
    R: Read,
    F: FnMut(Ride),
{
    let (_headers, rows) = csv_rows(reader)?;
    for row in rows {
        let row = row?;
        let fields: Vec<&str> = row.iter().collect();
        let ride = Ride::from_row(&fields).map_err(|e| e.at_line(line_of(&row)))?;
        f(ride);
    }
    Ok(())
}

fn load<T, F>(path: &Path, label: &str, mut init: T, mut push: F) -> Result<T>
where
    F: FnMut(&mut T, Ride),
{
    let mut count = 0usize;
    for_each_ride(open_file(path)?, |ride| {
        count += 1;
        push(&mut init, ride);
    })?;
    debug!(path = %path.display(), rows = count, shape = label, "loaded rides");
    Ok(init)
}

pub fn read_rides_as_tuples(path: impl AsRef<Path>) -> Result<Vec<RideTuple>> {
    load(path.as_ref(), "tuples", Vec::new(), |out, r| {
        out.push((r.route, r.date, r.daytype, r.rides))
    })
}

pub fn read_rides_as_dicts(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    load(path.as_ref(), "dicts", Vec::new(), |out, r| {
        out.push(ride_record(&r))
    })
}

/// One fixed-field `Ride` per row.
pub fn read_rides_as_structs(path: impl AsRef<Path>) -> Result<Vec<Ride>> {
    load(path.as_ref(), "structs", Vec::new(), |out, r| out.push(r))
}

/// Read the ride data into four plain vectors, one per column.
pub fn read_rides_as_columns(path: impl AsRef<Path>) -> Result<RideColumns> {
    load(path.as_ref(), "columns", RideColumns::default(), |out, r| {
        out.routes.push(r.route);
        out.dates.push(r.date);
        out.daytypes.push(r.daytype);
        out.numrides.push(r.rides);
    })
}

pub fn read_rides_as_ridedata(path: impl AsRef<Path>) -> Result<RideData> {
    load(path.as_ref(), "ridedata", RideData::new(), |out, r| {
        out.append(r)
    })
}
