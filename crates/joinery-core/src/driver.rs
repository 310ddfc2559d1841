mod capability;
pub use capability::Capability;

mod dialect;
pub use dialect::Dialect;

pub mod operation;
pub use operation::{Operation, QuerySql, Transaction};

mod response;
pub use response::{Response, Rows};

use crate::{async_trait, Result};

use std::{borrow::Cow, fmt::Debug};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// The URL this driver connects to.
    fn url(&self) -> Cow<'_, str>;

    /// Describes the database behind the driver, which informs how
    /// statements are rendered.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection.
    async fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Upper bound on open connections, if the database imposes one.
    fn max_connections(&self) -> Option<usize> {
        None
    }

    /// Drops the entire database and recreates an empty one.
    async fn reset_db(&self) -> Result<()> {
        Err(crate::Error::unsupported_feature(format!(
            "reset_db is not supported for {}",
            self.capability().dialect
        )))
    }
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Executes a database operation.
    async fn exec(&mut self, op: Operation) -> Result<Response>;
}
