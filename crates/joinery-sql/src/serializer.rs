#[macro_use]
mod fmt;
use fmt::ToSql;

mod column_def;
use column_def::ColumnDef;

mod delim;
use delim::Comma;

mod expr;

mod flavor;
use flavor::Flavor;

mod ident;
use ident::{Ident, ObjectName};

mod params;
pub use params::{Params, Placeholder};

mod statement;

use joinery_core::{
    driver::Capability,
    schema::{Model, ModelId, Schema},
    stmt::Statement,
};

/// Serialize a statement to a SQL string
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Schema against which the statement is to be serialized
    schema: &'a Schema,

    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,

    capability: &'static Capability,
}

struct Formatter<'a, P> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut P,

    /// Model whose columns are referenced by the statement being serialized.
    model: Option<&'a Model>,
}

impl<'a> Serializer<'a> {
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            model: stmt.model().map(|id| self.schema.model(id)),
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }

    fn model(&self, id: ModelId) -> &'a Model {
        self.schema.model(id)
    }

    fn table_name(&self, id: ModelId) -> Ident<&'a str> {
        Ident(&self.model(id).table_name)
    }
}

impl<'a, P> Formatter<'a, P> {
    #[track_caller]
    fn current_model(&self) -> &'a Model {
        self.model
            .expect("statement does not reference a model")
    }
}
