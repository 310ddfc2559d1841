use super::{Flavor, Formatter, Ident, Params, ToSql};

use joinery_core::schema::{Attribute, Model, Type};

/// A column definition inside `CREATE TABLE`.
pub(super) struct ColumnDef<'a> {
    pub(super) model: &'a Model,
    pub(super) index: usize,

    /// The column is used in a key or constraint and needs a bounded type on
    /// databases that cannot index unbounded text.
    pub(super) keyed: bool,
}

impl ToSql for ColumnDef<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let attr = &self.model.attributes[self.index];
        let flavor = f.serializer.flavor;
        let inline_key = self.model.primary_key == [self.index];

        fmt!(f, Ident(&attr.name), " ");

        if attr.auto_increment {
            let def = match flavor {
                Flavor::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
                Flavor::Postgresql => "SERIAL PRIMARY KEY",
                Flavor::Mysql => "INTEGER NOT NULL auto_increment PRIMARY KEY",
                Flavor::Mssql => "INTEGER NOT NULL IDENTITY(1,1) PRIMARY KEY",
            };
            fmt!(f, def);
            return;
        }

        let bounded = self.keyed && !f.serializer.capability.unbounded_text_keys;
        fmt!(f, column_type(attr, flavor, bounded));

        if !attr.allow_null {
            fmt!(f, " NOT NULL");
        }

        if inline_key {
            fmt!(f, " PRIMARY KEY");
        }

        if let Some(reference) = attr.references {
            let target = f.serializer.model(reference.model);
            fmt!(
                f,
                " REFERENCES ",
                Ident(&target.table_name),
                " (",
                Ident(&target.attributes[reference.attribute].name),
                ") ON DELETE CASCADE"
            );

            // SQL Server rejects multiple cascade paths into one table.
            if flavor != Flavor::Mssql {
                fmt!(f, " ON UPDATE CASCADE");
            }
        }
    }
}

fn column_type(attr: &Attribute, flavor: Flavor, bounded: bool) -> &'static str {
    match (attr.ty, flavor) {
        (Type::Text, Flavor::Mysql) if bounded => "VARCHAR(191)",
        (Type::Text, Flavor::Mssql) if bounded => "NVARCHAR(255)",
        (Type::Text, Flavor::Mssql) => "NVARCHAR(MAX)",
        (Type::Text, _) => "TEXT",
        (Type::Integer, _) => "INTEGER",
        (Type::Boolean, Flavor::Postgresql) => "BOOLEAN",
        (Type::Boolean, Flavor::Mssql) => "BIT",
        (Type::Boolean, _) => "TINYINT(1)",
        (Type::Date, Flavor::Postgresql) => "TIMESTAMP WITH TIME ZONE",
        (Type::Date, Flavor::Mssql) => "DATETIMEOFFSET",
        (Type::Date, _) => "DATETIME",
    }
}
