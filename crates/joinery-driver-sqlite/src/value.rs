use chrono::{DateTime, Utc};
use joinery_core::{
    schema::Type,
    stmt::{self, Value as CoreValue},
    Error, Result,
};
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Reads column `index` of `row` as a value of type `ty`.
    pub fn from_sql(row: &Row<'_>, index: usize, ty: Type) -> Result<Self> {
        if ty == Type::Date {
            let value: Option<DateTime<Utc>> =
                row.get(index).map_err(Error::driver_operation_failed)?;
            return Ok(Value(value.into()));
        }

        let value: SqlValue = row.get(index).map_err(Error::driver_operation_failed)?;

        let core_value = match (value, ty) {
            (SqlValue::Null, _) => CoreValue::Null,
            (SqlValue::Integer(value), Type::Boolean) => CoreValue::Bool(value != 0),
            (SqlValue::Integer(value), Type::Text) => CoreValue::String(value.to_string()),
            (SqlValue::Integer(value), _) => CoreValue::I64(value),
            (SqlValue::Real(value), Type::Integer) => CoreValue::I64(value as i64),
            (SqlValue::Text(value), _) => CoreValue::String(value),
            (value, ty) => {
                return Err(joinery_core::err!(
                    "cannot read SQLite value {value:?} as {ty}"
                ))
            }
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match &self.0 {
            stmt::Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            stmt::Value::Bool(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            stmt::Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            stmt::Value::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            stmt::Value::Timestamp(v) => v.to_sql(),
        }
    }
}
