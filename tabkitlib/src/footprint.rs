//! Rough heap footprint of each ride representation.
//!
//! The estimate counts bytes owned on the heap: vector buffers (by
//! capacity), string buffers and shared `Arc<str>` allocations. A shared
//! allocation is counted once no matter how many values point at it,
//! which is what makes interned columns cheap.
//!
//! Allocator overhead and padding are ignored, so the numbers are only
//! useful for comparing representations against each other.

use std::collections::HashSet;
use std::mem::size_of;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::data::collection::DataCollection;
use crate::data::reader::read_csv_as_columns;
use crate::data::record::Record;
use crate::data::rides::{
    read_rides_as_columns, read_rides_as_dicts, read_rides_as_ridedata, read_rides_as_structs,
    read_rides_as_tuples, Ride, RideColumns, RideData, RideTuple,
};
use crate::data::value::{ColumnType, Value};
use crate::Result;

/// Tracks shared allocations already counted.
#[derive(Debug, Default)]
pub struct Tally {
    seen: HashSet<usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    fn shared_str(&mut self, s: &Arc<str>) -> usize {
        let address = Arc::as_ptr(s) as *const u8 as usize;
        if self.seen.insert(address) {
            // strong + weak counters precede the bytes
            2 * size_of::<usize>() + s.len()
        } else {
            0
        }
    }
}

/// Heap bytes owned by a value.
pub trait Footprint {
    fn heap_bytes(&self, tally: &mut Tally) -> usize;
}

/// Heap footprint of `value` with a fresh tally.
pub fn footprint<T: Footprint + ?Sized>(value: &T) -> usize {
    value.heap_bytes(&mut Tally::new())
}

impl Footprint for String {
    fn heap_bytes(&self, _tally: &mut Tally) -> usize {
        self.capacity()
    }
}

impl Footprint for i64 {
    fn heap_bytes(&self, _tally: &mut Tally) -> usize {
        0
    }
}

impl Footprint for Value {
    fn heap_bytes(&self, tally: &mut Tally) -> usize {
        match self {
            Value::Str(s) => tally.shared_str(s),
            Value::Int(_) | Value::Float(_) => 0,
        }
    }
}

impl<T: Footprint> Footprint for Vec<T> {
    fn heap_bytes(&self, tally: &mut Tally) -> usize {
        self.capacity() * size_of::<T>() + self.iter().map(|v| v.heap_bytes(tally)).sum::<usize>()
    }
}

impl Footprint for RideTuple {
    fn heap_bytes(&self, tally: &mut Tally) -> usize {
        self.0.heap_bytes(tally) + self.1.heap_bytes(tally) + self.2.heap_bytes(tally)
    }
}

impl Footprint for Ride {
    fn heap_bytes(&self, tally: &mut Tally) -> usize {
        self.route.heap_bytes(tally) + self.date.heap_bytes(tally) + self.daytype.heap_bytes(tally)
    }
}

impl Footprint for Record {
    fn heap_bytes(&self, tally: &mut Tally) -> usize {
        let slots = self.len() * size_of::<(String, Value)>();
        slots
            + self
                .iter()
                .map(|(k, v)| k.len() + v.heap_bytes(tally))
                .sum::<usize>()
    }
}

impl Footprint for RideColumns {
    fn heap_bytes(&self, tally: &mut Tally) -> usize {
        self.routes.heap_bytes(tally)
            + self.dates.heap_bytes(tally)
            + self.daytypes.heap_bytes(tally)
            + self.numrides.heap_bytes(tally)
    }
}

impl Footprint for RideData {
    fn heap_bytes(&self, tally: &mut Tally) -> usize {
        self.as_columns().heap_bytes(tally)
    }
}

impl Footprint for DataCollection {
    fn heap_bytes(&self, tally: &mut Tally) -> usize {
        let headers = self
            .headers()
            .iter()
            .map(|h| size_of::<String>() + h.capacity())
            .sum::<usize>();
        let columns = self
            .columns()
            .iter()
            .map(|c| size_of::<Vec<Value>>() + c.heap_bytes(tally))
            .sum::<usize>();
        let interner = self.interner().len() * size_of::<Arc<str>>();
        headers + columns + interner
    }
}

/// One line of a footprint comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FootprintRow {
    pub representation: String,
    pub rows: usize,
    pub bytes: usize,
}

impl crate::output::report::Attributes for FootprintRow {
    fn attr(&self, name: &str) -> Option<Value> {
        match name {
            "representation" => Some(Value::from(self.representation.as_str())),
            "rows" => Some(Value::Int(self.rows as i64)),
            "bytes" => Some(Value::Int(self.bytes as i64)),
            _ => None,
        }
    }
}

/// Load the ride file at `path` through every reader and estimate each
/// representation's heap use.
pub fn compare_footprints(path: impl AsRef<Path>) -> Result<Vec<FootprintRow>> {
    let path = path.as_ref();
    let mut report = Vec::new();
    let mut push = |name: &str, rows: usize, bytes: usize| {
        info!(representation = name, rows, bytes, "measured footprint");
        report.push(FootprintRow {
            representation: name.to_string(),
            rows,
            bytes,
        });
    };

    let tuples = read_rides_as_tuples(path)?;
    push("tuples", tuples.len(), footprint(&tuples));
    drop(tuples);

    let dicts = read_rides_as_dicts(path)?;
    push("dicts", dicts.len(), footprint(&dicts));
    drop(dicts);

    let structs = read_rides_as_structs(path)?;
    push("structs", structs.len(), footprint(&structs));
    drop(structs);

    let columns = read_rides_as_columns(path)?;
    push("columns", columns.numrides.len(), footprint(&columns));
    drop(columns);

    let ridedata = read_rides_as_ridedata(path)?;
    push("ridedata", ridedata.len(), footprint(&ridedata));
    drop(ridedata);

    let plain = [ColumnType::Str, ColumnType::Str, ColumnType::Str, ColumnType::Int];
    let collection = read_csv_as_columns(path, &plain)?;
    push("collection", collection.len(), footprint(&collection));
    drop(collection);

    let interned = [
        ColumnType::Interned,
        ColumnType::Interned,
        ColumnType::Str,
        ColumnType::Int,
    ];
    let collection = read_csv_as_columns(path, &interned)?;
    push("collection (interned)", collection.len(), footprint(&collection));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn rides_file(rows: usize) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ctabus.csv");
        let mut contents = String::from("route,date,daytype,rides\n");
        for i in 0..rows {
            let route = ["3", "4", "22"][i % 3];
            contents.push_str(&format!("{},01/0{}/2001,W,{}\n", route, i % 9 + 1, i * 10));
        }
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_shared_strings_counted_once() {
        let shared: Arc<str> = Arc::from("route-22");
        let values = vec![Value::Str(shared.clone()), Value::Str(shared)];
        let separate = vec![Value::from("route-22"), Value::from("route-22")];
        assert!(footprint(&values) < footprint(&separate));
    }

    #[test]
    fn test_ridedata_measured_like_plain_columns() {
        let (_dir, path) = rides_file(45);
        let columns = read_rides_as_columns(&path).unwrap();
        let ridedata = read_rides_as_ridedata(&path).unwrap();
        assert_eq!(ridedata.as_columns(), &columns);
        assert_eq!(footprint(&ridedata), footprint(&columns));
    }

    #[test]
    fn test_compare_footprints_covers_every_reader() {
        let (_dir, path) = rides_file(60);
        let report = compare_footprints(&path).unwrap();
        let names: Vec<&str> = report.iter().map(|r| r.representation.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "tuples",
                "dicts",
                "structs",
                "columns",
                "ridedata",
                "collection",
                "collection (interned)"
            ]
        );
        assert!(report.iter().all(|r| r.rows == 60 && r.bytes > 0));
    }

    #[test]
    fn test_interning_beats_plain_columns() {
        let (_dir, path) = rides_file(300);
        let report = compare_footprints(&path).unwrap();
        let bytes = |name: &str| {
            report
                .iter()
                .find(|r| r.representation == name)
                .map(|r| r.bytes)
                .unwrap()
        };
        assert!(bytes("collection (interned)") < bytes("collection"));
        assert!(bytes("ridedata") < bytes("dicts"));
    }
}
