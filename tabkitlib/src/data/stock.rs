//! Stock holdings with validated share counts and prices.

use std::fmt;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::reader::{read_csv_as_instances, FromRow};
use super::value::{ColumnType, Interner, Value};
use crate::error::TabkitError;
use crate::output::report::Attributes;
use crate::Result;

/// A holding of `shares` units of `name` bought at `price`.
///
/// Shares and price are never negative. Every mutation goes through a
/// validating setter, so a failed update leaves the holding unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stock {
    pub name: String,
    shares: i64,
    price: f64,
}

/// Converters for `from_row`, in field order name, shares, price.
const ROW_TYPES: [(&str, ColumnType); 3] = [
    ("name", ColumnType::Str),
    ("shares", ColumnType::Int),
    ("price", ColumnType::Float),
];

impl Stock {
    pub fn new(name: impl Into<String>, shares: i64, price: f64) -> Result<Self> {
        let mut stock = Stock {
            name: name.into(),
            shares: 0,
            price: 0.0,
        };
        stock.set_shares(shares)?;
        stock.set_price(price)?;
        Ok(stock)
    }

    pub fn shares(&self) -> i64 {
        self.shares
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_shares(&mut self, shares: i64) -> Result<()> {
        if shares < 0 {
            return Err(TabkitError::NegativeValue { field: "shares" });
        }
        self.shares = shares;
        Ok(())
    }

    pub fn set_price(&mut self, price: f64) -> Result<()> {
        // NaN fails this comparison too
        if !(price >= 0.0) {
            return Err(TabkitError::NegativeValue { field: "price" });
        }
        self.price = price;
        Ok(())
    }

    /// Assign a dynamically typed value to a named attribute.
    ///
    /// `shares` only accepts integers and `price` only floats; anything
    /// else is a `WrongType` error.
    pub fn set_attr(&mut self, name: &str, value: Value) -> Result<()> {
        let wrong = |expected: &'static str, value: &Value| TabkitError::WrongType {
            field: name.to_string(),
            expected,
            found: value.kind(),
        };
        match (name, value) {
            ("name", Value::Str(s)) => {
                self.name = s.to_string();
                Ok(())
            }
            ("shares", Value::Int(n)) => self.set_shares(n),
            ("price", Value::Float(p)) => self.set_price(p),
            ("name", other) => Err(wrong("str", &other)),
            ("shares", other) => Err(wrong("int", &other)),
            ("price", other) => Err(wrong("float", &other)),
            (other, _) => Err(TabkitError::UnknownAttribute(other.to_string())),
        }
    }

    /// Market cost of the holding
    pub fn cost(&self) -> f64 {
        self.shares as f64 * self.price
    }

    /// Reduce the holding by `nshares`.
    pub fn sell(&mut self, nshares: i64) -> Result<()> {
        self.set_shares(self.shares.saturating_sub(nshares))
    }
}

impl FromRow for Stock {
    fn from_row(row: &[&str]) -> Result<Self> {
        if row.len() < ROW_TYPES.len() {
            return Err(TabkitError::RowLength {
                expected: ROW_TYPES.len(),
                found: row.len(),
            });
        }
        let mut interner = Interner::new();
        let mut values = ROW_TYPES
            .iter()
            .zip(row)
            .map(|((column, coltype), raw)| coltype.parse(column, raw, &mut interner));

        let name = values.next().transpose()?;
        let shares = values.next().transpose()?;
        let price = values.next().transpose()?;
        match (name, shares, price) {
            (Some(Value::Str(name)), Some(Value::Int(shares)), Some(Value::Float(price))) => {
                Stock::new(name.to_string(), shares, price)
            }
            _ => Err(TabkitError::RowLength {
                expected: ROW_TYPES.len(),
                found: row.len(),
            }),
        }
    }
}

impl Attributes for Stock {
    fn attr(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::from(self.name.as_str())),
            "shares" => Some(Value::Int(self.shares)),
            "price" => Some(Value::Float(self.price)),
            "cost" => Some(Value::Float(self.cost())),
            _ => None,
        }
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stock({}, {}, {})",
            self.name,
            self.shares,
            Value::Float(self.price)
        )
    }
}

/// Read a `name,shares,price` CSV file.
pub fn read_portfolio(path: impl AsRef<Path>) -> Result<Vec<Stock>> {
    read_csv_as_instances(path)
}

/// Print holdings in fixed-width columns: name, shares, price with two decimals.
pub fn print_portfolio<W: Write + ?Sized>(out: &mut W, portfolio: &[Stock]) -> Result<()> {
    writeln!(out, "{:>10} {:>10} {:>10}", "name", "shares", "price")?;
    writeln!(out, "{}", "---------- ".repeat(3))?;
    for stock in portfolio {
        writeln!(
            out,
            "{:>10} {:>10} {:>10.2}",
            stock.name, stock.shares, stock.price
        )?;
    }
    Ok(())
}
