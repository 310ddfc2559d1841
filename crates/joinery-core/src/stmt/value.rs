use crate::{schema::Type, Error, Result};

use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::I64(_) => "I64",
            Value::String(_) => "String",
            Value::Timestamp(_) => "Timestamp",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Checks that the value can be stored in a column of type `ty`.
    pub fn check_type(&self, ty: Type) -> Result<()> {
        let ok = matches!(
            (self, ty),
            (Value::Null, _)
                | (Value::Bool(_), Type::Boolean)
                | (Value::I64(_), Type::Integer)
                | (Value::String(_), Type::Text)
                | (Value::Timestamp(_), Type::Date)
        );

        if ok {
            Ok(())
        } else {
            Err(Error::type_conversion(self.clone(), ty_name(ty)))
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::I64(v) => serde_json::Value::from(*v),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::Timestamp(v) => {
                serde_json::Value::String(v.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }
}

fn ty_name(ty: Type) -> &'static str {
    match ty {
        Type::Text => "Text",
        Type::Integer => "Integer",
        Type::Boolean => "Boolean",
        Type::Date => "Date",
    }
}

/// Renders the value the way it appears in statement logs.
impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{}'", v.replace('\'', "''")),
            Value::Timestamp(v) => write!(
                f,
                "'{}'",
                v.format("%Y-%m-%d %H:%M:%S%.3f %:z")
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::I64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::I64(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Value {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Value {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<i64> {
        match value {
            Value::I64(v) => Ok(v),
            other => Err(Error::type_conversion(other, "i64")),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<String> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(Error::type_conversion(other, "String")),
        }
    }
}
