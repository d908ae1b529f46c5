use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use uuid::Uuid;

/// Dynamically typed column value exchanged between row sources, the type
/// registry, and entity records.
///
/// Every driver adapter normalizes its raw column data into this enum; the
/// registry coerces it further into the canonical variant for a field's
/// logical type tag before it is written into a record.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Lossy text rendering, `None` only for `Null`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
            Value::Uuid(u) => Some(u.to_string()),
            Value::Timestamp(t) => Some(t.format(TIMESTAMP_FORMAT).to_string()),
            Value::Date(d) => Some(d.format(DATE_FORMAT).to_string()),
        }
    }

    /// Permissive integer cast: numbers, numeric strings and booleans.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
            _ => None,
        }
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "t" | "true" => Some(true),
                "0" | "f" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn to_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(u) => Some(*u),
            Value::Text(s) => Uuid::parse_str(s.trim()).ok(),
            Value::Bytes(b) => Uuid::from_slice(b).ok(),
            _ => None,
        }
    }

    /// Accepts a native instant or one of the common textual layouts.
    pub fn to_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(t) => Some(*t),
            Value::Text(s) => parse_timestamp(s.trim()),
            _ => None,
        }
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Timestamp(t) => Some(t.date_naive()),
            Value::Text(s) => {
                let s = s.trim();
                NaiveDate::parse_from_str(s, DATE_FORMAT)
                    .ok()
                    .or_else(|| parse_timestamp(s).map(|t| t.date_naive()))
            }
            _ => None,
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for format in [TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Conversion out of a canonical [`Value`] into a concrete field type.
///
/// Implemented for every field type the registry can target; the derive
/// macro calls this in generated `Record::set` bodies. `None` leaves the
/// field untouched.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

/// Conversion of a concrete field into its dynamic [`Value`] form, used by
/// generated `Record::get` bodies for key canonicalization and join
/// equality.
pub trait IntoValue {
    fn into_value(&self) -> Value;
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Option<Self> {
        value.to_uuid()
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        value.to_text()
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Option<Self> {
        value.to_i64().and_then(|i| i32::try_from(i).ok())
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Option<Self> {
        value.to_i64()
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Option<Self> {
        value.to_f64().map(|f| f as f32)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        value.to_f64()
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        value.to_bool()
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Option<Self> {
        value.to_timestamp()
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Option<Self> {
        value.to_date()
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b),
            Value::Text(s) => Some(s.into_bytes()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl IntoValue for Uuid {
    fn into_value(&self) -> Value {
        Value::Uuid(*self)
    }
}

impl IntoValue for String {
    fn into_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl IntoValue for i32 {
    fn into_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl IntoValue for i64 {
    fn into_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl IntoValue for f32 {
    fn into_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl IntoValue for f64 {
    fn into_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl IntoValue for bool {
    fn into_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl IntoValue for DateTime<Utc> {
    fn into_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl IntoValue for NaiveDate {
    fn into_value(&self) -> Value {
        Value::Date(*self)
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(&self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}
