//! Printf-style format specs for column formatting.
//!
//! A spec holds exactly one conversion, optionally surrounded by literal
//! text: `%10.2f`, `%-8s`, `$%d`, `%05d%%`. Supported conversions are
//! `s r d i u f F e E x X o`, with the flags `- + 0 #` and space, an
//! optional width and an optional precision.

use std::fmt;
use std::str::FromStr;

use crate::data::value::{display_float, Value};
use crate::error::TabkitError;
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alternate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Conversion {
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    kind: char,
}

/// A parsed single-value format spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    source: String,
    prefix: String,
    conversion: Conversion,
    suffix: String,
}

impl FormatSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let err = |msg: &str| TabkitError::Format(format!("{:?}: {}", spec, msg));

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut conversion = None;
        let mut chars = spec.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                match conversion {
                    None => prefix.push(c),
                    Some(_) => suffix.push(c),
                }
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                match conversion {
                    None => prefix.push('%'),
                    Some(_) => suffix.push('%'),
                }
                continue;
            }
            if conversion.is_some() {
                return Err(err("more than one conversion"));
            }

            let mut flags = Flags::default();
            while let Some(&f) = chars.peek() {
                match f {
                    '-' => flags.left = true,
                    '+' => flags.plus = true,
                    ' ' => flags.space = true,
                    '0' => flags.zero = true,
                    '#' => flags.alternate = true,
                    _ => break,
                }
                chars.next();
            }

            let width = take_number(&mut chars);
            let precision = if chars.peek() == Some(&'.') {
                chars.next();
                Some(take_number(&mut chars).unwrap_or(0))
            } else {
                None
            };

            let kind = chars.next().ok_or_else(|| err("incomplete conversion"))?;
            if !"srdiufFeExXo".contains(kind) {
                return Err(err(&format!("unsupported conversion '{}'", kind)));
            }
            conversion = Some(Conversion {
                flags,
                width,
                precision,
                kind,
            });
        }

        let conversion = conversion.ok_or_else(|| err("no conversion"))?;
        Ok(FormatSpec {
            source: spec.to_string(),
            prefix,
            conversion,
            suffix,
        })
    }

    /// Render `value` through this spec.
    pub fn apply(&self, value: &Value) -> Result<String> {
        let body = self.conversion.render(value).map_err(|reason| {
            TabkitError::Format(format!("{:?} with {}: {}", self.source, value.kind(), reason))
        })?;
        Ok(format!("{}{}{}", self.prefix, body, self.suffix))
    }
}

impl FromStr for FormatSpec {
    type Err = TabkitError;

    fn from_str(s: &str) -> Result<Self> {
        FormatSpec::parse(s)
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits.parse().ok()
}

impl Conversion {
    fn render(&self, value: &Value) -> std::result::Result<String, String> {
        let flags = self.flags;
        let (negative, prefix, digits) = match self.kind {
            's' => return Ok(self.pad_text(self.truncate(value.to_string()))),
            'r' => {
                let repr = match value {
                    Value::Str(s) => format!("'{}'", s),
                    other => other.to_string(),
                };
                return Ok(self.pad_text(self.truncate(repr)));
            }
            'd' | 'i' | 'u' => {
                let n = integer_of(value)?;
                (n < 0, "", n.unsigned_abs().to_string())
            }
            'x' | 'X' | 'o' => {
                let n = match value {
                    Value::Int(n) => *n,
                    other => return Err(format!("an integer is required, not {}", other.kind())),
                };
                let abs = n.unsigned_abs();
                let (prefix, digits) = match self.kind {
                    'x' => ("0x", format!("{:x}", abs)),
                    'X' => ("0X", format!("{:X}", abs)),
                    _ => ("0o", format!("{:o}", abs)),
                };
                (n < 0, if flags.alternate { prefix } else { "" }, digits)
            }
            'f' | 'F' => {
                let x = float_of(value)?;
                let precision = self.precision.unwrap_or(6);
                let digits = if x.is_finite() {
                    format!("{:.*}", precision, x.abs())
                } else {
                    non_finite(x, self.kind == 'F')
                };
                (x.is_sign_negative() && !x.is_nan(), "", digits)
            }
            'e' | 'E' => {
                let x = float_of(value)?;
                let precision = self.precision.unwrap_or(6);
                let digits = if x.is_finite() {
                    exponent_form(x.abs(), precision, self.kind == 'E')
                } else {
                    non_finite(x, self.kind == 'E')
                };
                (x.is_sign_negative() && !x.is_nan(), "", digits)
            }
            other => return Err(format!("unsupported conversion '{}'", other)),
        };

        let sign = if negative {
            "-"
        } else if flags.plus {
            "+"
        } else if flags.space {
            " "
        } else {
            ""
        };
        Ok(self.pad_number(sign, prefix, &digits))
    }

    fn truncate(&self, text: String) -> String {
        match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text,
        }
    }

    fn pad_text(&self, text: String) -> String {
        let width = self.width.unwrap_or(0);
        if self.flags.left {
            format!("{:<width$}", text, width = width)
        } else {
            format!("{:>width$}", text, width = width)
        }
    }

    fn pad_number(&self, sign: &str, prefix: &str, digits: &str) -> String {
        let width = self.width.unwrap_or(0);
        let len = sign.len() + prefix.len() + digits.chars().count();
        if self.flags.left {
            format!("{:<width$}", format!("{}{}{}", sign, prefix, digits), width = width)
        } else if self.flags.zero && len < width {
            format!("{}{}{}{}", sign, prefix, "0".repeat(width - len), digits)
        } else {
            format!("{:>width$}", format!("{}{}{}", sign, prefix, digits), width = width)
        }
    }
}

fn integer_of(value: &Value) -> std::result::Result<i64, String> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::Float(x) => {
            let t = x.trunc();
            // [-2^63, 2^63) is exactly the i64 range
            if t >= -9_223_372_036_854_775_808.0 && t < 9_223_372_036_854_775_808.0 {
                Ok(t as i64)
            } else {
                Err(format!("cannot convert {} to integer", display_float(*x)))
            }
        }
        Value::Str(_) => Err("a number is required, not str".to_string()),
    }
}

fn float_of(value: &Value) -> std::result::Result<f64, String> {
    value
        .as_float()
        .ok_or_else(|| format!("a number is required, not {}", value.kind()))
}

fn non_finite(x: f64, upper: bool) -> String {
    let text = if x.is_nan() { "nan" } else { "inf" };
    if upper {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

/// `1.5e3` → `1.500000e+03`: signed exponent, at least two digits.
fn exponent_form(x: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, x);
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let marker = if upper { 'E' } else { 'e' };
    format!("{}{}{}{:02}", mantissa, marker, sign, exponent.abs())
}
