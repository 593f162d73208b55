//! A mutable integer wrapper.
//!
//! `MutInt` adds and compares against other wrappers and raw `i64`s through
//! the std operator traits. When the operand type is only known at runtime
//! (a [`Value`]), the `try_*` methods return [`Dispatch::NotImplemented`]
//! for unsupported operands instead of failing, leaving the caller to try
//! the reflected operation or report a type error.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Outcome of an operation against a dynamically typed operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<T> {
    Done(T),
    NotImplemented,
}

impl<T> Dispatch<T> {
    pub fn is_implemented(&self) -> bool {
        matches!(self, Dispatch::Done(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Dispatch::Done(v) => Some(v),
            Dispatch::NotImplemented => None,
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutInt {
    pub value: i64,
}

impl MutInt {
    pub fn new(value: i64) -> Self {
        Self { value }
    }

    pub fn as_f64(&self) -> f64 {
        self.value as f64
    }

    fn operand(other: &Value) -> Option<i64> {
        match other {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// `self + other`, or `None` when the sum leaves the `i64` range.
    pub fn checked_add(&self, other: i64) -> Option<MutInt> {
        self.value.checked_add(other).map(MutInt::new)
    }

    /// `self + other` for a runtime-typed operand.
    ///
    /// A sum outside the `i64` range is not implemented.
    pub fn try_add(&self, other: &Value) -> Dispatch<MutInt> {
        match Self::operand(other).and_then(|i| self.checked_add(i)) {
            Some(sum) => Dispatch::Done(sum),
            None => Dispatch::NotImplemented,
        }
    }

    /// `self += other` for a runtime-typed operand. Returns `self` on success
    /// and leaves it unchanged otherwise.
    pub fn try_add_assign(&mut self, other: &Value) -> Dispatch<&mut MutInt> {
        match Self::operand(other).and_then(|i| self.checked_add(i)) {
            Some(sum) => {
                *self = sum;
                Dispatch::Done(self)
            }
            None => Dispatch::NotImplemented,
        }
    }

    pub fn try_eq(&self, other: &Value) -> Dispatch<bool> {
        match Self::operand(other) {
            Some(i) => Dispatch::Done(self.value == i),
            None => Dispatch::NotImplemented,
        }
    }

    pub fn try_cmp(&self, other: &Value) -> Dispatch<Ordering> {
        match Self::operand(other) {
            Some(i) => Dispatch::Done(self.value.cmp(&i)),
            None => Dispatch::NotImplemented,
        }
    }
}

impl From<i64> for MutInt {
    fn from(value: i64) -> Self {
        MutInt { value }
    }
}

impl From<MutInt> for i64 {
    fn from(m: MutInt) -> Self {
        m.value
    }
}

impl From<MutInt> for f64 {
    fn from(m: MutInt) -> Self {
        m.value as f64
    }
}

impl From<MutInt> for Value {
    fn from(m: MutInt) -> Self {
        Value::Int(m.value)
    }
}

/// Format specs (`{:>5}`, `{:+}`, ...) apply to the inner integer.
impl fmt::Display for MutInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl fmt::Debug for MutInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MutInt({})", self.value)
    }
}

/// Operator arithmetic is plain `i64` arithmetic and overflows the same way;
/// use [`MutInt::checked_add`] or the `try_*` methods for unbounded input.
impl Add for MutInt {
    type Output = MutInt;

    fn add(self, other: MutInt) -> MutInt {
        MutInt::new(self.value + other.value)
    }
}

impl Add<i64> for MutInt {
    type Output = MutInt;

    fn add(self, other: i64) -> MutInt {
        MutInt::new(self.value + other)
    }
}

impl Add<MutInt> for i64 {
    type Output = MutInt;

    fn add(self, other: MutInt) -> MutInt {
        other + self
    }
}

impl AddAssign for MutInt {
    fn add_assign(&mut self, other: MutInt) {
        self.value += other.value;
    }
}

impl AddAssign<i64> for MutInt {
    fn add_assign(&mut self, other: i64) {
        self.value += other;
    }
}

impl PartialEq<i64> for MutInt {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl PartialEq<MutInt> for i64 {
    fn eq(&self, other: &MutInt) -> bool {
        *self == other.value
    }
}

impl PartialOrd<i64> for MutInt {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.value.cmp(other))
    }
}

impl PartialOrd<MutInt> for i64 {
    fn partial_cmp(&self, other: &MutInt) -> Option<Ordering> {
        Some(self.cmp(&other.value))
    }
}
