//! Report driver: pull named attributes out of records and feed them to
//! a formatter.

use std::io::Write;

use super::formatter::TableFormatter;
use super::sink::with_output;
use crate::data::record::Record;
use crate::data::rides::Ride;
use crate::data::value::Value;
use crate::error::TabkitError;
use crate::Result;

/// Named attribute lookup used by [`print_table`].
pub trait Attributes {
    fn attr(&self, name: &str) -> Option<Value>;
}

impl Attributes for Record {
    fn attr(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Attributes for Ride {
    fn attr(&self, name: &str) -> Option<Value> {
        match name {
            "route" => Some(Value::from(self.route.as_str())),
            "date" => Some(Value::from(self.date.as_str())),
            "daytype" => Some(Value::from(self.daytype.as_str())),
            "rides" => Some(Value::Int(self.rides)),
            _ => None,
        }
    }
}

impl<T: Attributes + ?Sized> Attributes for &T {
    fn attr(&self, name: &str) -> Option<Value> {
        (**self).attr(name)
    }
}

/// Print `attr_names` of every record through `formatter` to the current sink.
pub fn print_table<I, S, F>(records: I, attr_names: &[S], formatter: &F) -> Result<()>
where
    I: IntoIterator,
    I::Item: Attributes,
    S: AsRef<str>,
    F: TableFormatter + ?Sized,
{
    let table = extract(records, attr_names)?;
    with_output(|out| emit(out, &table, formatter))
}

/// Same as [`print_table`] with an explicit writer.
pub fn print_table_to<I, S, F>(
    out: &mut dyn Write,
    records: I,
    attr_names: &[S],
    formatter: &F,
) -> Result<()>
where
    I: IntoIterator,
    I::Item: Attributes,
    S: AsRef<str>,
    F: TableFormatter + ?Sized,
{
    let table = extract(records, attr_names)?;
    emit(out, &table, formatter)
}

struct Extracted {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Resolve every attribute up front so a missing one fails before output starts.
fn extract<I, S>(records: I, attr_names: &[S]) -> Result<Extracted>
where
    I: IntoIterator,
    I::Item: Attributes,
    S: AsRef<str>,
{
    let headers: Vec<String> = attr_names.iter().map(|s| s.as_ref().to_string()).collect();
    let rows = records
        .into_iter()
        .map(|record| {
            headers
                .iter()
                .map(|name| {
                    record
                        .attr(name)
                        .ok_or_else(|| TabkitError::UnknownAttribute(name.clone()))
                })
                .collect::<Result<Vec<Value>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Extracted { headers, rows })
}

fn emit<F: TableFormatter + ?Sized>(
    out: &mut dyn Write,
    table: &Extracted,
    formatter: &F,
) -> Result<()> {
    formatter.headings(out, &table.headers)?;
    for row in &table.rows {
        formatter.row(out, row)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stock::Stock;
    use crate::output::formatter::{
        create_formatter, CsvTableFormatter, FormatKind, TextTableFormatter,
    };
    use crate::output::sink::{redirect_output, CaptureBuffer};

    fn portfolio() -> Vec<Stock> {
        vec![
            Stock::new("AA", 100, 32.2).unwrap(),
            Stock::new("IBM", 50, 91.1).unwrap(),
        ]
    }

    #[test]
    fn test_print_table_csv() {
        let mut out = Vec::new();
        print_table_to(&mut out, &portfolio(), &["name", "shares"], &CsvTableFormatter).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,shares\nAA,100\nIBM,50\n"
        );
    }

    #[test]
    fn test_print_table_follows_attribute_order() {
        let mut out = Vec::new();
        print_table_to(
            &mut out,
            &portfolio(),
            &["price", "name"],
            &CsvTableFormatter,
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "price,name\n32.2,AA\n91.1,IBM\n"
        );
    }

    #[test]
    fn test_print_table_to_current_sink() {
        let buf = CaptureBuffer::new();
        let formatter = create_formatter(FormatKind::Text, &["%s", "%d", "%0.2f"], false).unwrap();
        redirect_output(buf.clone(), || {
            print_table(&portfolio(), &["name", "shares", "price"], &formatter)
        })
        .unwrap();
        let text = buf.contents();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "      name     shares      price");
        assert_eq!(lines[2], "        AA        100      32.20");
        assert_eq!(lines[3], "       IBM         50      91.10");
    }

    #[test]
    fn test_unknown_attribute_writes_nothing() {
        let mut out = Vec::new();
        let err = print_table_to(
            &mut out,
            &portfolio(),
            &["name", "owner"],
            &TextTableFormatter,
        )
        .unwrap_err();
        assert!(matches!(err, TabkitError::UnknownAttribute(ref n) if n == "owner"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_records_and_rides() {
        let ride = Ride {
            route: "22".to_string(),
            date: "02/02/2011".to_string(),
            daytype: "W".to_string(),
            rides: 5000,
        };
        let mut out = Vec::new();
        print_table_to(&mut out, [&ride], &["route", "rides"], &CsvTableFormatter).unwrap();
        let record = Record::from_pairs([("route", Value::from("9")), ("rides", Value::Int(1))]);
        print_table_to(&mut out, [record], &["route", "rides"], &CsvTableFormatter).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "route,rides\n22,5000\nroute,rides\n9,1\n"
        );
    }

    #[test]
    fn test_empty_records_still_print_headers() {
        let mut out = Vec::new();
        let none: Vec<Stock> = Vec::new();
        print_table_to(&mut out, &none, &["name"], &CsvTableFormatter).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "name\n");
    }
}
