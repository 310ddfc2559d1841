use crate::Error;

use std::str::FromStr;

/// A SQL database flavor a session can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Mssql,
    Sqlite,
    Mysql,
    Mariadb,
    Postgres,

    /// PostgreSQL reached through the native client library. Statements are
    /// identical to [`Dialect::Postgres`].
    PostgresNative,
}

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Dialect::Mssql,
        Dialect::Sqlite,
        Dialect::Mysql,
        Dialect::Mariadb,
        Dialect::Postgres,
        Dialect::PostgresNative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Mssql => "mssql",
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
            Dialect::Mariadb => "mariadb",
            Dialect::Postgres => "postgres",
            Dialect::PostgresNative => "postgres-native",
        }
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Dialect, Error> {
        Dialect::ALL
            .into_iter()
            .find(|dialect| dialect.as_str() == s)
            .ok_or_else(|| Error::unsupported_feature(format!("unknown dialect `{s}`")))
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
