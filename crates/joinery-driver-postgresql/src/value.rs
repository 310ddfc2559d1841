use chrono::{DateTime, Utc};
use joinery_core::{
    schema,
    stmt::{self, Value as CoreValue},
    Error, Result,
};
use postgres_types::{accepts, private::BytesMut, to_sql_checked, IsNull, ToSql, Type};
use tokio_postgres::Row;

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Reads column `index` of `row` into a core value.
    pub fn from_row(row: &Row, index: usize) -> Result<CoreValue> {
        let ty = row.columns()[index].type_().clone();

        macro_rules! get {
            ($t:ty) => {
                row.try_get::<usize, Option<$t>>(index)
                    .map_err(Error::driver_operation_failed)?
            };
        }

        let value: CoreValue = if ty == Type::TEXT || ty == Type::VARCHAR || ty == Type::BPCHAR {
            get!(String).into()
        } else if ty == Type::BOOL {
            get!(bool).into()
        } else if ty == Type::INT2 {
            get!(i16).map(i64::from).into()
        } else if ty == Type::INT4 {
            get!(i32).into()
        } else if ty == Type::INT8 {
            get!(i64).into()
        } else if ty == Type::TIMESTAMPTZ {
            get!(DateTime<Utc>).into()
        } else {
            return Err(joinery_core::err!(
                "cannot read PostgreSQL column of type `{ty}`"
            ));
        };

        Ok(value)
    }
}

/// The wire type a parameter bound to a column of type `ty` is sent as.
pub fn postgres_ty(ty: schema::Type) -> Type {
    match ty {
        schema::Type::Text => Type::TEXT,
        schema::Type::Integer => Type::INT4,
        schema::Type::Boolean => Type::BOOL,
        schema::Type::Date => Type::TIMESTAMPTZ,
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>>
    where
        Self: Sized,
    {
        match &self.0 {
            stmt::Value::Null => Ok(IsNull::Yes),
            stmt::Value::Bool(value) => value.to_sql(ty, out),
            stmt::Value::I64(value) if *ty == Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
            stmt::Value::I64(value) if *ty == Type::INT4 => i32::try_from(*value)?.to_sql(ty, out),
            stmt::Value::I64(value) => value.to_sql(ty, out),
            stmt::Value::String(value) => value.to_sql(ty, out),
            stmt::Value::Timestamp(value) => value.to_sql(ty, out),
        }
    }

    accepts!(BOOL, INT2, INT4, INT8, TEXT, VARCHAR, BPCHAR, TIMESTAMPTZ);
    to_sql_checked!();
}
