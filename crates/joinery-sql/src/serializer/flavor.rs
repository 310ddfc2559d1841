use super::Serializer;

use joinery_core::{
    driver::{Capability, Dialect},
    schema::Schema,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
    Mssql,
}

impl From<Dialect> for Flavor {
    fn from(dialect: Dialect) -> Flavor {
        match dialect {
            Dialect::Sqlite => Flavor::Sqlite,
            Dialect::Postgres | Dialect::PostgresNative => Flavor::Postgresql,
            Dialect::Mysql | Dialect::Mariadb => Flavor::Mysql,
            Dialect::Mssql => Flavor::Mssql,
        }
    }
}

impl<'a> Serializer<'a> {
    pub fn new(schema: &'a Schema, dialect: Dialect) -> Serializer<'a> {
        Serializer {
            schema,
            flavor: Flavor::from(dialect),
            capability: Capability::for_dialect(dialect),
        }
    }

    pub fn sqlite(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Sqlite)
    }

    pub fn postgresql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Postgres)
    }

    pub fn mysql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Mysql)
    }

    pub fn mssql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Dialect::Mssql)
    }
}
