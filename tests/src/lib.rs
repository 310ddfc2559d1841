
pub mod db;
pub mod sscce;

// Re-export for use in macros - needs to be public for macro expansion
pub use joinery_test::JoineryTest;

use joinery::{db::Builder, Db, Dialect};

pub use std_util::*;

#[async_trait::async_trait]
pub trait Setup: Send + Sync + 'static {
    async fn setup(&self, builder: Builder) -> Db {
        self.connect(builder).await.unwrap()
    }

    async fn connect(&self, builder: Builder) -> joinery::Result<Db>;

    fn dialect(&self) -> Dialect;

    /// Clean up tables created by this specific setup instance.
    ///
    /// Only tables carrying this setup's table prefix are dropped.
    async fn cleanup_my_tables(&self) -> joinery::Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl Setup for Box<dyn Setup> {
    async fn connect(&self, builder: Builder) -> joinery::Result<Db> {
        (**self).connect(builder).await
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    async fn cleanup_my_tables(&self) -> joinery::Result<()> {
        (**self).cleanup_my_tables().await
    }
}
