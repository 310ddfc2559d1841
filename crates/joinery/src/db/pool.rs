//! Connection pooling for database connections.

use std::{
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicU64, Ordering},
};

use joinery_core::{
    driver::{Capability, Connection, Driver},
    Error,
};

/// A connection pool that manages database connections.
#[derive(Debug)]
pub struct Pool {
    inner: deadpool::managed::Pool<Manager>,
    capability: &'static Capability,
}

impl Pool {
    /// Creates a new connection pool from the given driver. The pool is
    /// capped at the driver's connection limit, if any.
    pub fn new(driver: impl Driver) -> crate::Result<Self> {
        let max_connections = driver.max_connections();
        let capability = driver.capability();

        let mut builder = deadpool::managed::Pool::builder(Manager {
            driver: Box::new(driver),
            generation: AtomicU64::new(0),
        })
        .runtime(deadpool::Runtime::Tokio1);

        if let Some(max_connections) = max_connections {
            builder = builder.max_size(max_connections);
        }

        let inner = builder.build().map_err(Error::connection_pool)?;

        Ok(Self { inner, capability })
    }

    /// Retrieves a connection from the pool.
    pub async fn get(&self) -> crate::Result<PoolConnection> {
        let connection = self.inner.get().await.map_err(|err| match err {
            deadpool::managed::PoolError::Backend(err) => err,
            err => Error::connection_pool(err),
        })?;
        Ok(PoolConnection { inner: connection })
    }

    /// Closes every idle connection. Connections checked out right now are
    /// closed when they are returned instead of being reused.
    pub fn close_connections(&self) {
        let manager = self.inner.manager();
        let generation = manager.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let closed = self
            .inner
            .retain(|conn, _| conn.generation == generation)
            .removed
            .len();
        log::debug!("closed {closed} idle connection(s)");
    }

    /// Returns the database driver's capabilities.
    pub fn capability(&self) -> &'static Capability {
        self.capability
    }

    pub fn driver(&self) -> &dyn Driver {
        self.inner.manager().driver.as_ref()
    }
}

#[derive(Debug)]
struct Manager {
    driver: Box<dyn Driver>,
    /// Bumped by [`Pool::close_connections`].
    generation: AtomicU64,
}

#[derive(Debug)]
struct Pooled {
    connection: Box<dyn Connection>,
    generation: u64,
}

impl deadpool::managed::Manager for Manager {
    type Type = Pooled;
    type Error = Error;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        let generation = self.generation.load(Ordering::SeqCst);
        let connection = self.driver.connect().await?;
        Ok(Pooled {
            connection,
            generation,
        })
    }

    async fn recycle(
        &self,
        obj: &mut Self::Type,
        _metrics: &deadpool::managed::Metrics,
    ) -> deadpool::managed::RecycleResult<Self::Error> {
        if obj.generation != self.generation.load(Ordering::SeqCst) {
            return Err(deadpool::managed::RecycleError::message(
                "connection was opened before the database was reset",
            ));
        }
        Ok(())
    }
}

/// A connection retrieved from a pool.
///
/// When dropped, the connection is returned to the pool for reuse.
pub struct PoolConnection {
    inner: deadpool::managed::Object<Manager>,
}

impl Deref for PoolConnection {
    type Target = Box<dyn Connection>;

    fn deref(&self) -> &Self::Target {
        &self.inner.connection
    }
}

impl DerefMut for PoolConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner.connection
    }
}
