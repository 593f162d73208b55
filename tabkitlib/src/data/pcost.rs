//! Portfolio cost from a whitespace-separated holdings file.
//!
//! Unlike the CSV readers this one tolerates bad input: a line whose
//! share count or price does not parse is logged and skipped, and the
//! remaining lines are still summed. Reading stops at end of file or at
//! the first blank line.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::reader::open_file;
use crate::Result;

/// Sum of shares × price over the file at `path`, computed exactly.
pub fn portfolio_cost(path: impl AsRef<Path>) -> Result<Decimal> {
    let path = path.as_ref();
    let total = portfolio_cost_from_reader(open_file(path)?)?;
    debug!(path = %path.display(), %total, "computed portfolio cost");
    Ok(total)
}

/// Same as [`portfolio_cost`] over an already opened source.
pub fn portfolio_cost_from_reader<R: Read>(reader: R) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.is_empty() {
            break;
        }
        match line_cost(&values).and_then(|cost| {
            total
                .checked_add(cost)
                .ok_or_else(|| "running total overflows".to_string())
        }) {
            Ok(sum) => total = sum,
            Err(reason) => {
                warn!(line = index + 1, values = ?values, %reason, "could not parse line");
            }
        }
    }
    Ok(total)
}

fn line_cost(values: &[&str]) -> std::result::Result<Decimal, String> {
    let (shares, price) = match values {
        [_, shares, price, ..] => (shares, price),
        _ => return Err(format!("expected 3 fields, found {}", values.len())),
    };
    let shares: i64 = shares
        .parse()
        .map_err(|e| format!("invalid share count {:?}: {}", shares, e))?;
    let price: Decimal = price
        .parse()
        .map_err(|e| format!("invalid price {:?}: {}", price, e))?;
    Decimal::from(shares)
        .checked_mul(price)
        .ok_or_else(|| format!("cost of {} x {} overflows", shares, price))
}
