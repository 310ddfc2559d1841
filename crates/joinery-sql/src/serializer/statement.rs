use super::{Comma, ColumnDef, Flavor, Formatter, Ident, ObjectName, Params, ToSql};

use joinery_core::stmt::{
    CreateTable, Delete, Direction, DropTable, Insert, OrderByExpr, Projection, Select, Statement,
    Update,
};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::LastInsertId => {
                let sql = match f.serializer.flavor {
                    Flavor::Sqlite => "SELECT last_insert_rowid()",
                    Flavor::Postgresql => "SELECT lastval()",
                    Flavor::Mysql => "SELECT LAST_INSERT_ID()",
                    Flavor::Mssql => "SELECT SCOPE_IDENTITY()",
                };
                fmt!(f, sql);
            }
        }
    }
}

impl ToSql for &CreateTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let serializer = f.serializer;
        let model = serializer.model(self.model);
        let table_name = serializer.table_name(self.model);

        // Pairs that must be unique without being the key.
        let unique_pairs = serializer
            .schema
            .associations
            .iter()
            .filter(|assoc| assoc.through == self.model && assoc.unique)
            .map(|assoc| [assoc.foreign_key, assoc.other_key])
            .filter(|pair| {
                let mut sorted = *pair;
                sorted.sort_unstable();
                model.primary_key != sorted
            })
            .collect::<Vec<_>>();

        let keyed = |index: usize| {
            let attr = &model.attributes[index];
            attr.primary_key
                || attr.references.is_some()
                || unique_pairs.iter().any(|pair| pair.contains(&index))
        };

        if self.if_not_exists {
            match serializer.flavor {
                Flavor::Mssql => {
                    fmt!(f, "IF OBJECT_ID(N'", ObjectName(table_name.0), "', N'U') IS NULL ");
                    fmt!(f, "CREATE TABLE ", serializer.table_name(self.model));
                }
                _ => fmt!(f, "CREATE TABLE IF NOT EXISTS ", table_name),
            }
        } else {
            fmt!(f, "CREATE TABLE ", table_name);
        }

        let columns = (0..model.attributes.len()).map(|index| ColumnDef {
            model,
            index,
            keyed: keyed(index),
        });

        fmt!(f, " (", Comma(columns));

        if model.primary_key.len() > 1 {
            let key = model
                .primary_key
                .iter()
                .map(|index| Ident(&model.attributes[*index].name));
            fmt!(f, ", PRIMARY KEY (", Comma(key), ")");
        }

        for pair in &unique_pairs {
            let columns = pair.iter().map(|index| Ident(&model.attributes[*index].name));
            fmt!(f, ", UNIQUE (", Comma(columns), ")");
        }

        fmt!(f, ")");
    }
}

impl ToSql for &DropTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table_name = f.serializer.table_name(self.model);

        match f.serializer.flavor {
            Flavor::Mssql if self.if_exists => {
                fmt!(f, "IF OBJECT_ID(N'", ObjectName(table_name.0), "', N'U') IS NOT NULL ");
                fmt!(f, "DROP TABLE ", f.serializer.table_name(self.model));
            }
            Flavor::Postgresql if self.if_exists => {
                fmt!(f, "DROP TABLE IF EXISTS ", table_name, " CASCADE")
            }
            _ if self.if_exists => fmt!(f, "DROP TABLE IF EXISTS ", table_name),
            _ => fmt!(f, "DROP TABLE ", table_name),
        }
    }
}

impl ToSql for &Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let model = f.serializer.model(self.model);
        let flavor = f.serializer.flavor;
        let returning = self
            .returning
            .as_ref()
            .filter(|_| f.serializer.capability.insert_returning);

        fmt!(f, "INSERT INTO ", f.serializer.table_name(self.model));

        if !self.columns.is_empty() {
            let columns = self
                .columns
                .iter()
                .map(|index| Ident(&model.attributes[*index].name));
            fmt!(f, " (", Comma(columns), ")");
        }

        if let (Flavor::Mssql, Some(returning)) = (flavor, returning) {
            let columns = returning.iter().map(|index| Inserted(&model.attributes[*index].name));
            fmt!(f, " OUTPUT ", Comma(columns));
        }

        if self.columns.is_empty() {
            match flavor {
                Flavor::Mysql => fmt!(f, " () VALUES ()"),
                _ => fmt!(f, " DEFAULT VALUES"),
            }
        } else {
            fmt!(f, " VALUES ");

            let mut s = "";
            for row in &self.rows {
                fmt!(f, s, "(");

                let mut comma = "";
                for (column, value) in self.columns.iter().zip(row) {
                    let placeholder = f.params.push(value, model.attributes[*column].ty);
                    fmt!(f, comma, placeholder);
                    comma = ", ";
                }

                fmt!(f, ")");
                s = ", ";
            }
        }

        if let (Flavor::Sqlite | Flavor::Postgresql, Some(returning)) = (flavor, returning) {
            let columns = returning
                .iter()
                .map(|index| Ident(&model.attributes[*index].name));
            fmt!(f, " RETURNING ", Comma(columns));
        }
    }
}

/// `INSERTED.[column]`, as used by SQL Server's `OUTPUT` clause.
struct Inserted<'a>(&'a str);

impl ToSql for Inserted<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "INSERTED.", Ident(self.0));
    }
}

impl ToSql for &Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let model = f.serializer.model(self.model);

        fmt!(f, "SELECT ");

        if let (Flavor::Mssql, Some(limit)) = (f.serializer.flavor, self.limit) {
            fmt!(f, "TOP ", limit, " ");
        }

        match &self.projection {
            Projection::Columns(columns) => {
                let columns = columns
                    .iter()
                    .map(|index| Ident(&model.attributes[*index].name));
                fmt!(f, Comma(columns));
            }
            Projection::Count => fmt!(f, "COUNT(*)"),
        }

        fmt!(f, " FROM ", f.serializer.table_name(self.model));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY ", Comma(&self.order_by));
        }

        if let (Some(limit), false) = (self.limit, f.serializer.flavor == Flavor::Mssql) {
            fmt!(f, " LIMIT ", limit);
        }
    }
}

impl ToSql for &OrderByExpr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let name = &f.current_model().attributes[self.column].name;
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, Ident(name), direction);
    }
}

impl ToSql for &Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let model = f.serializer.model(self.model);

        fmt!(f, "UPDATE ", f.serializer.table_name(self.model), " SET ");

        let mut s = "";
        for (column, value) in &self.assignments {
            let attr = &model.attributes[*column];
            let placeholder = f.params.push(value, attr.ty);
            fmt!(f, s, Ident(&attr.name), " = ", placeholder);
            s = ", ";
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }
    }
}

impl ToSql for &Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "DELETE FROM ", f.serializer.table_name(self.model));

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE ", filter);
        }
    }
}
