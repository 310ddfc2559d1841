use super::{Flavor, Formatter, ToSql};

use joinery_core::{
    schema::Type,
    stmt::{TypedValue, Value},
};

pub trait Params {
    fn push(&mut self, value: &Value, ty: Type) -> Placeholder;
}

/// 1-based position of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

impl Params for Vec<TypedValue> {
    fn push(&mut self, value: &Value, ty: Type) -> Placeholder {
        self.push(TypedValue {
            value: value.clone(),
            ty,
        });
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: super::Params>(self, f: &mut Formatter<'_, P>) {
        let placeholder = match f.serializer.flavor {
            Flavor::Mysql => "?".to_string(),
            Flavor::Postgresql => format!("${}", self.0),
            Flavor::Sqlite => format!("?{}", self.0),
            Flavor::Mssql => format!("@p{}", self.0),
        };
        f.dst.push_str(&placeholder);
    }
}
