
#[cfg(feature = "postgresql")]
pub mod postgresql;

use crate::Setup;

use joinery::{Dialect, Error, Result};

/// Environment variable naming the dialect to run env-selected tests on.
pub const DIALECT_VAR: &str = "DIALECT";

/// The dialect named by `DIALECT`, `sqlite` when unset.
pub fn dialect_from_env() -> Result<Dialect> {
    match std::env::var(DIALECT_VAR) {
        Ok(name) => name.parse(),
        Err(std::env::VarError::NotPresent) => Ok(Dialect::Sqlite),
        Err(err) => Err(Error::from_args(format_args!("`{DIALECT_VAR}`: {err}"))),
    }
}

/// A setup for `dialect`, or an unsupported-feature error when the dialect
/// has no driver enabled in this build.
pub fn setup_for(dialect: Dialect) -> Result<Box<dyn Setup>> {
    match dialect {
        #[cfg(feature = "sqlite")]
        Dialect::Sqlite => Ok(Box::new(sqlite::SetupSqlite)),
        #[cfg(feature = "postgresql")]
        Dialect::Postgres => Ok(Box::new(postgresql::SetupPostgreSQL::new())),
        #[cfg(feature = "postgresql")]
        Dialect::PostgresNative => Ok(Box::new(postgresql::SetupPostgreSQL::native())),
        dialect => Err(Error::unsupported_feature(format!(
            "no driver for dialect `{dialect}` is enabled"
        ))),
    }
}

/// The setup selected by `DIALECT`.
pub fn setup_from_env() -> Result<Box<dyn Setup>> {
    setup_for(dialect_from_env()?)
}
