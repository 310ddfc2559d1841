use super::Dialect;

#[derive(Debug)]
pub struct Capability {
    pub dialect: Dialect,

    /// Inserts can return the inserted row (`RETURNING` or `OUTPUT`). When
    /// false, generated keys are read back with a separate statement.
    pub insert_returning: bool,

    /// Text columns can be part of a key without a length bound.
    pub unbounded_text_keys: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        dialect: Dialect::Sqlite,
        insert_returning: true,
        unbounded_text_keys: true,
    };

    /// PostgreSQL capabilities.
    pub const POSTGRESQL: Self = Self {
        dialect: Dialect::Postgres,
        ..Self::SQLITE
    };

    /// PostgreSQL through the native client.
    pub const POSTGRESQL_NATIVE: Self = Self {
        dialect: Dialect::PostgresNative,
        ..Self::SQLITE
    };

    /// MySQL capabilities.
    pub const MYSQL: Self = Self {
        dialect: Dialect::Mysql,
        insert_returning: false,
        unbounded_text_keys: false,
    };

    /// MariaDB capabilities.
    pub const MARIADB: Self = Self {
        dialect: Dialect::Mariadb,
        ..Self::MYSQL
    };

    /// SQL Server capabilities.
    pub const MSSQL: Self = Self {
        dialect: Dialect::Mssql,
        insert_returning: true,
        unbounded_text_keys: false,
    };

    pub fn for_dialect(dialect: Dialect) -> &'static Capability {
        match dialect {
            Dialect::Mssql => &Self::MSSQL,
            Dialect::Sqlite => &Self::SQLITE,
            Dialect::Mysql => &Self::MYSQL,
            Dialect::Mariadb => &Self::MARIADB,
            Dialect::Postgres => &Self::POSTGRESQL,
            Dialect::PostgresNative => &Self::POSTGRESQL_NATIVE,
        }
    }
}
