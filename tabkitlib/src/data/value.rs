//! Typed scalar values and the per-column converters that produce them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::TabkitError;
use crate::Result;

/// A single typed cell.
///
/// Strings are reference counted so interned columns can share one
/// allocation between every row holding the same text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(Arc<str>),
}

impl Value {
    /// Short kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers widen to float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&display_float(*x)),
            Value::Str(s) => f.write_str(s),
        }
    }
}

/// Render a float the way a plain `str()` of a number would: integral
/// values keep a trailing `.0`, everything else uses the shortest
/// round-trip form.
pub(crate) fn display_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        let sign = if x > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<Arc<str>> for Value {
    fn from(v: Arc<str>) -> Self {
        Value::Str(v)
    }
}

/// Deduplicates strings so repeated text shares one allocation.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    strings: HashSet<Arc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared copy of `s`, allocating it on first sight.
    pub fn intern(&mut self, s: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Arc::clone(existing);
        }
        let shared: Arc<str> = Arc::from(s);
        self.strings.insert(Arc::clone(&shared));
        shared
    }

    /// Number of distinct strings seen
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Converter applied to one raw text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Signed integer
    Int,
    /// Floating point number
    Float,
    /// Text, one allocation per cell
    Str,
    /// Text shared through an [`Interner`]
    Interned,
}

impl ColumnType {
    /// Convert `raw` into a typed value for the column named `column`.
    pub fn parse(&self, column: &str, raw: &str, interner: &mut Interner) -> Result<Value> {
        let conversion_error = |reason: String| TabkitError::Conversion {
            column: column.to_string(),
            value: raw.to_string(),
            reason,
        };

        match self {
            ColumnType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| conversion_error(e.to_string())),
            ColumnType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| conversion_error(e.to_string())),
            ColumnType::Str => Ok(Value::from(raw)),
            ColumnType::Interned => Ok(Value::Str(interner.intern(raw))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Str => "str",
            ColumnType::Interned => "intern",
        }
    }

    /// Parse a comma-separated list such as `"intern,intern,str,int"`.
    pub fn parse_list(spec: &str) -> Result<Vec<ColumnType>> {
        spec.split(',')
            .map(|s| s.trim().parse::<ColumnType>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TabkitError::Conversion {
                column: "types".to_string(),
                value: spec.to_string(),
                reason: e,
            })
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int" | "integer" => Ok(ColumnType::Int),
            "float" | "real" => Ok(ColumnType::Float),
            "str" | "string" | "text" => Ok(ColumnType::Str),
            "intern" | "interned" => Ok(ColumnType::Interned),
            _ => Err(format!("Unknown column type: {}", s)),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
