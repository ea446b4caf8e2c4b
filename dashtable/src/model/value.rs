//! Value enum for dynamic cell values

use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value extracted from a row by a column accessor.
///
/// Values are what the engine sorts, filters and searches on. Rows are never
/// inspected directly; every column resolves a row to a `Value` first.
///
/// # Ordering
///
/// [`Value::compare`] is type-aware:
///
/// | Variants | Comparison |
/// |----------|------------|
/// | `Int`, `Float`, `Decimal` | numeric, across variants |
/// | `Date`, `DateTime` | chronological (a date is midnight UTC) |
/// | `String` | ordinal (byte order, no locale rules) |
/// | `Bool` | `false < true` |
/// | `Null` | after everything else |
///
/// Values of unrelated kinds order by kind: bool, number, temporal, string.
///
/// # Example
///
/// ```
/// use dashtable::Value;
///
/// let a = Value::from(2);
/// let b = Value::from(10.5);
/// assert!(a.compare(&b).is_lt());
/// assert!(Value::Null.compare(&a).is_gt());
/// ```
///
/// # Serialization
///
/// Null, booleans, numbers and strings use their plain JSON form. Dates,
/// timestamps and decimals are wrapped in a single-key object
/// (`{"date": "2024-01-31"}`, `{"decimal": "3.50"}`) so they read back as the
/// same variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ValueRepr", into = "ValueRepr")]
pub enum Value {
    /// Null/missing value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Calendar date without time.
    Date(NaiveDate),
    /// Date and time in UTC.
    DateTime(DateTime<Utc>),
    /// String value.
    String(String),
    /// Arbitrary precision decimal.
    Decimal(Decimal),
}

/// Wire form of [`Value`].
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Tagged(TaggedValue),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TaggedValue {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Decimal(Decimal),
}

impl From<ValueRepr> for Value {
    fn from(repr: ValueRepr) -> Self {
        match repr {
            ValueRepr::Null => Value::Null,
            ValueRepr::Bool(v) => Value::Bool(v),
            ValueRepr::Int(v) => Value::Int(v),
            ValueRepr::Float(v) => Value::Float(v),
            ValueRepr::String(v) => Value::String(v),
            ValueRepr::Tagged(TaggedValue::Date(v)) => Value::Date(v),
            ValueRepr::Tagged(TaggedValue::DateTime(v)) => Value::DateTime(v),
            ValueRepr::Tagged(TaggedValue::Decimal(v)) => Value::Decimal(v),
        }
    }
}

impl From<Value> for ValueRepr {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ValueRepr::Null,
            Value::Bool(v) => ValueRepr::Bool(v),
            Value::Int(v) => ValueRepr::Int(v),
            Value::Float(v) => ValueRepr::Float(v),
            Value::String(v) => ValueRepr::String(v),
            Value::Date(v) => ValueRepr::Tagged(TaggedValue::Date(v)),
            Value::DateTime(v) => ValueRepr::Tagged(TaggedValue::DateTime(v)),
            Value::Decimal(v) => ValueRepr::Tagged(TaggedValue::Decimal(v)),
        }
    }
}

/// Coarse value kind used to order values of unrelated types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
    Bool,
    Number,
    Temporal,
    Text,
    Null,
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Returns the string content if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) | Value::Float(_) | Value::Decimal(_) => Kind::Number,
            Value::Date(_) | Value::DateTime(_) => Kind::Temporal,
            Value::String(_) => Kind::Text,
        }
    }

    fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(v) => Some(*v),
            Value::Date(d) => Some(d.and_time(NaiveTime::MIN).and_utc()),
            _ => None,
        }
    }

    /// Type-aware total ordering. `Null` sorts after every other value.
    pub fn compare(&self, other: &Value) -> Ordering {
        let (left, right) = (self.kind(), other.kind());
        if left != right {
            return left.cmp(&right);
        }

        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            (Value::Int(a), Value::Decimal(b)) => Decimal::from(*a).cmp(b),
            (Value::Decimal(a), Value::Int(b)) => a.cmp(&Decimal::from(*b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b)),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Value::Decimal(a), Value::Float(b)) => cmp_decimal_float(a, *b),
            (Value::Float(a), Value::Decimal(b)) => cmp_decimal_float(b, *a).reverse(),
            (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            _ if left == Kind::Temporal => self.as_datetime().cmp(&other.as_datetime()),
            _ => Ordering::Equal,
        }
    }

    /// Returns `true` if both values are of a kind that compares meaningfully
    /// (both numbers, both temporal, ...). `Null` is comparable with nothing.
    pub fn same_kind(&self, other: &Value) -> bool {
        let kind = self.kind();
        kind != Kind::Null && kind == other.kind()
    }

    /// Equality under [`compare`](Self::compare), so `Int(5)` equals `Float(5.0)`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// Converts a JSON value.
    ///
    /// Strings holding an ISO-8601 date or RFC 3339 timestamp become temporal
    /// values. Arrays and objects are kept as their JSON text.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::parse_text(s),
            other => Value::String(other.to_string()),
        }
    }

    /// Parses text, recognizing dates and timestamps.
    pub fn parse_text(text: &str) -> Self {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Value::Date(date);
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Value::DateTime(ts.with_timezone(&Utc));
        }
        Value::String(text.to_string())
    }
}

/// Orders an integer against a float exactly. NaN sorts after every number,
/// or before if its sign bit is set, as in [`f64::total_cmp`].
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    // 2^63: every float strictly inside (-LIMIT, LIMIT) truncates into i64 range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= LIMIT {
        return Ordering::Less;
    }
    if float < -LIMIT {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0f64
            .partial_cmp(&(float - whole))
            .unwrap_or(Ordering::Equal),
        ord => ord,
    }
}

/// Orders a decimal against a float, exactly whenever the float fits a decimal.
fn cmp_decimal_float(decimal: &Decimal, float: f64) -> Ordering {
    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    match Decimal::from_f64_retain(float) {
        Some(exact) => decimal.cmp(&exact),
        // Out of decimal range: magnitudes are far enough apart for f64.
        None => decimal.to_f64().unwrap_or_default().total_cmp(&float),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::DateTime(v) => f.write_str(&v.to_rfc3339()),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        Value::from_json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
