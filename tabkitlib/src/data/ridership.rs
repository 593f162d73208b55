//! Ridership questions answered over any ride representation.

use std::collections::{BTreeMap, HashSet};

use super::record::Record;
use super::rides::{Ride, RideTuple};
use super::value::Value;
use tracing::warn;

/// Read access to the fields the ridership queries need.
pub trait RideFields {
    fn route(&self) -> &str;
    fn date(&self) -> &str;
    fn rides(&self) -> i64;
}

impl RideFields for Ride {
    fn route(&self) -> &str {
        &self.route
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn rides(&self) -> i64 {
        self.rides
    }
}

impl RideFields for RideTuple {
    fn route(&self) -> &str {
        &self.0
    }

    fn date(&self) -> &str {
        &self.1
    }

    fn rides(&self) -> i64 {
        self.3
    }
}

/// Missing or non-text fields read as empty and a missing or unparsable
/// ride count reads as zero. Both are logged at warn.
impl RideFields for Record {
    fn route(&self) -> &str {
        text_field(self, "route")
    }

    fn date(&self) -> &str {
        text_field(self, "date")
    }

    fn rides(&self) -> i64 {
        match self.get("rides") {
            Some(Value::Int(n)) => *n,
            Some(Value::Str(s)) => s.trim().parse().unwrap_or_else(|e| {
                warn!(value = %s, error = %e, "unparsable ride count, counting 0");
                0
            }),
            other => {
                warn!(found = ?other, "record has no integer ride count, counting 0");
                0
            }
        }
    }
}

fn text_field<'a>(record: &'a Record, name: &str) -> &'a str {
    match record.get(name).and_then(Value::as_str) {
        Some(text) => text,
        None => {
            warn!(field = name, "record has no text field, reading it as empty");
            ""
        }
    }
}

impl<T: RideFields + ?Sized> RideFields for &T {
    fn route(&self) -> &str {
        (**self).route()
    }

    fn date(&self) -> &str {
        (**self).date()
    }

    fn rides(&self) -> i64 {
        (**self).rides()
    }
}

/// Number of distinct routes.
pub fn count_routes<I>(rows: I) -> usize
where
    I: IntoIterator,
    I::Item: RideFields,
{
    rows.into_iter()
        .map(|row| row.route().to_string())
        .collect::<HashSet<_>>()
        .len()
}

/// Riders on `route` on `date`.
pub fn count_passengers<I>(rows: I, route: &str, date: &str) -> i64
where
    I: IntoIterator,
    I::Item: RideFields,
{
    rows.into_iter()
        .filter(|row| row.date() == date && row.route() == route)
        .map(|row| row.rides())
        .sum()
}

/// Total rides per route.
pub fn count_route_rides<I>(rows: I) -> BTreeMap<String, i64>
where
    I: IntoIterator,
    I::Item: RideFields,
{
    let mut totals = BTreeMap::new();
    for row in rows {
        *totals.entry(row.route().to_string()).or_insert(0) += row.rides();
    }
    totals
}

/// Routes whose ridership grew most from 2001 to 2011.
///
/// Only positive increases are kept. Results are sorted by increase,
/// largest first, with ties broken by route name.
pub fn top_increases<I>(rows: I, limit: usize) -> Vec<(String, i64)>
where
    I: IntoIterator,
    I::Item: RideFields,
{
    let mut y2001: BTreeMap<String, i64> = BTreeMap::new();
    let mut y2011: BTreeMap<String, i64> = BTreeMap::new();
    for row in rows {
        if row.date().contains("2001") {
            *y2001.entry(row.route().to_string()).or_insert(0) += row.rides();
        } else if row.date().contains("2011") {
            *y2011.entry(row.route().to_string()).or_insert(0) += row.rides();
        }
    }

    let mut increases: Vec<(String, i64)> = y2011
        .into_iter()
        .map(|(route, total)| {
            let before = y2001.get(&route).copied().unwrap_or(0);
            (route, total - before)
        })
        .filter(|(_, diff)| *diff > 0)
        .collect();
    increases.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    increases.truncate(limit);
    increases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride(route: &str, date: &str, rides: i64) -> Ride {
        Ride {
            route: route.to_string(),
            date: date.to_string(),
            daytype: "W".to_string(),
            rides,
        }
    }

    fn sample() -> Vec<Ride> {
        vec![
            ride("22", "02/02/2011", 5000),
            ride("22", "02/02/2001", 3000),
            ride("22", "02/03/2011", 1000),
            ride("36", "02/02/2011", 700),
            ride("36", "02/02/2001", 900),
            ride("9", "02/02/2011", 400),
            ride("9", "02/02/2001", 100),
        ]
    }

    #[test]
    fn test_count_routes() {
        assert_eq!(count_routes(&sample()), 3);
    }

    #[test]
    fn test_count_passengers() {
        assert_eq!(count_passengers(&sample(), "22", "02/02/2011"), 5000);
        assert_eq!(count_passengers(&sample(), "22", "12/25/1999"), 0);
    }

    #[test]
    fn test_count_route_rides() {
        let totals = count_route_rides(&sample());
        assert_eq!(totals["22"], 9000);
        assert_eq!(totals["36"], 1600);
        assert_eq!(totals["9"], 500);
    }

    #[test]
    fn test_top_increases_drops_declines() {
        let top = top_increases(&sample(), 5);
        assert_eq!(top, vec![("22".to_string(), 3000), ("9".to_string(), 300)]);
        assert_eq!(top_increases(&sample(), 1).len(), 1);
    }

    #[test]
    fn test_works_over_tuples_and_records() {
        let tuples: Vec<RideTuple> = sample()
            .into_iter()
            .map(|r| (r.route, r.date, r.daytype, r.rides))
            .collect();
        assert_eq!(count_passengers(&tuples, "36", "02/02/2001"), 900);

        let records = vec![Record::from_pairs([
            ("route", Value::from("22")),
            ("date", Value::from("02/02/2011")),
            ("rides", Value::from("42")),
        ])];
        assert_eq!(count_passengers(records, "22", "02/02/2011"), 42);
    }

    #[test]
    fn test_malformed_records_count_as_zero() {
        let records = vec![
            Record::from_pairs([
                ("route", Value::from("22")),
                ("date", Value::from("02/02/2011")),
                ("rides", Value::from("lots")),
            ]),
            Record::from_pairs([("route", Value::from("22")), ("date", Value::from("02/02/2011"))]),
            Record::from_pairs([("date", Value::from("02/02/2011")), ("rides", Value::Int(7))]),
            Record::from_pairs([
                ("route", Value::from("22")),
                ("date", Value::from("02/02/2011")),
                ("rides", Value::Int(5)),
            ]),
        ];
        assert_eq!(records[0].rides(), 0);
        assert_eq!(records[1].rides(), 0);
        assert_eq!(records[2].route(), "");
        assert_eq!(count_passengers(&records, "22", "02/02/2011"), 5);
        assert_eq!(count_route_rides(&records)[""], 7);
    }
}
