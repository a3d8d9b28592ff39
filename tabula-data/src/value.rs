use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A bind argument, independent of any SQL dialect or driver.
///
/// Every variant wraps an `Option`: `None` means the field is unset and binds
/// as a typed `NULL`. Sparse inserts skip unset values entirely, updates bind
/// them as `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(Option<bool>),
    Int(Option<i32>),
    BigInt(Option<i64>),
    Double(Option<f64>),
    Text(Option<String>),
    Uuid(Option<Uuid>),
    Timestamp(Option<DateTime<Utc>>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Bool(v) => v.is_none(),
            Value::Int(v) => v.is_none(),
            Value::BigInt(v) => v.is_none(),
            Value::Double(v) => v.is_none(),
            Value::Text(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(Some(v)) => write!(f, "{v}"),
            Value::Int(Some(v)) => write!(f, "{v}"),
            Value::BigInt(Some(v)) => write!(f, "{v}"),
            Value::Double(Some(v)) => write!(f, "{v}"),
            Value::Text(Some(v)) => write!(f, "{v}"),
            Value::Uuid(Some(v)) => write!(f, "{v}"),
            Value::Timestamp(Some(v)) => write!(f, "{}", v.to_rfc3339()),
            _ => f.write_str("NULL"),
        }
    }
}

macro_rules! impl_from_value {
    ($ty:ty => $variant:ident) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(Some(value))
            }
        }

        impl From<Option<$ty>> for Value {
            fn from(value: Option<$ty>) -> Self {
                Value::$variant(value)
            }
        }
    };
}

impl_from_value!(bool => Bool);
impl_from_value!(i32 => Int);
impl_from_value!(i64 => BigInt);
impl_from_value!(f64 => Double);
impl_from_value!(String => Text);
impl_from_value!(Uuid => Uuid);
impl_from_value!(DateTime<Utc> => Timestamp);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Some(value.to_string()))
    }
}

impl From<Option<&str>> for Value {
    fn from(value: Option<&str>) -> Self {
        Value::Text(value.map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_is_distinct_from_zero() {
        assert!(Value::from(None::<i64>).is_null());
        assert!(!Value::from(0i64).is_null());
        assert!(!Value::from(false).is_null());
        assert!(!Value::from("").is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(42i64).to_string(), "42");
        assert_eq!(Value::from("rw------").to_string(), "rw------");
        assert_eq!(Value::Uuid(None).to_string(), "NULL");
    }
}
