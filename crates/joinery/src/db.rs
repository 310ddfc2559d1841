mod builder;
mod connect;
mod pool;

pub use builder::Builder;
pub use connect::Connect;
pub use pool::{Pool, PoolConnection};

use crate::{
    engine::Engine,
    hooks::{self, Hooks},
    ModelHandle, Options, Result, SyncOptions,
};

use joinery_core::{
    driver::{Capability, Dialect, Driver},
    stmt::Statement,
    Error, Schema,
};

use std::sync::{Arc, Mutex, MutexGuard};

/// Shared state between all `Db` clones.
pub(crate) struct Shared {
    pub(crate) engine: Engine,
    pub(crate) pool: Pool,
    hooks: Mutex<Hooks>,
}

/// A database session: the resolved schema, a connection pool and the
/// session's hooks.
///
/// Cloning is cheap; clones share everything. Operations borrow the session
/// immutably, so independent operations can run concurrently.
#[derive(Clone)]
pub struct Db {
    pub(crate) shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(schema: Schema, pool: Pool, options: Options) -> Db {
        Db {
            shared: Arc::new(Shared {
                engine: Engine {
                    schema: Arc::new(schema),
                    capability: pool.capability(),
                    options,
                },
                pool,
                hooks: Mutex::new(Hooks::default()),
            }),
        }
    }

    /// Handle to the model named `name`.
    pub fn model(&self, name: &str) -> Result<ModelHandle> {
        let model = self
            .schema()
            .model_by_name(name)
            .ok_or_else(|| Error::invalid_schema(format!("model `{name}` is not defined")))?;

        Ok(ModelHandle::new(self.clone(), model.id))
    }

    /// Creates the table of every model, referenced tables first.
    ///
    /// With `force`, existing tables are dropped first, in reverse order.
    /// Otherwise tables that already exist are left untouched. Sync hooks run
    /// once each, before and after; the after hooks are skipped when the sync
    /// fails.
    pub async fn sync(&self, options: SyncOptions) -> Result<()> {
        log::debug!("syncing schema; force={}", options.force);

        let before = self.hooks().before_bulk_sync.clone();
        hooks::run(&before, &options);

        let order = self.schema().creation_order()?;
        let engine = &self.shared.engine;
        let mut conn = self.connection().await?;

        if options.force {
            for model in order.iter().rev() {
                engine
                    .exec(&mut conn, Statement::drop_table(*model, true))
                    .await?;
            }
        }

        for model in &order {
            engine
                .exec(&mut conn, Statement::create_table(*model, !options.force))
                .await?;
        }

        drop(conn);

        let after = self.hooks().after_bulk_sync.clone();
        log::debug!("schema synced; running {} after_bulk_sync hook(s)", after.len());
        hooks::run(&after, &options);

        Ok(())
    }

    /// Registers a callback run at the start of every [`sync`](Db::sync).
    pub fn before_bulk_sync(&self, f: impl Fn(&SyncOptions) + Send + Sync + 'static) {
        self.hooks().before_bulk_sync.push(Arc::new(f));
    }

    /// Registers a callback run after every successful [`sync`](Db::sync).
    pub fn after_bulk_sync(&self, f: impl Fn(&SyncOptions) + Send + Sync + 'static) {
        self.hooks().after_bulk_sync.push(Arc::new(f));
    }

    /// Drops the entire database and recreates an empty one.
    ///
    /// Pooled connections are closed first, so later operations open fresh
    /// connections to the empty database. Tables are not recreated; call
    /// [`sync`](Db::sync) afterwards.
    pub async fn reset_db(&self) -> Result<()> {
        log::debug!("resetting database; url={}", self.driver().url());
        self.shared.pool.close_connections();
        self.shared.pool.driver().reset_db().await
    }

    pub fn driver(&self) -> &dyn Driver {
        self.shared.pool.driver()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.engine.schema
    }

    pub fn capability(&self) -> &'static Capability {
        self.shared.engine.capability
    }

    pub fn dialect(&self) -> Dialect {
        self.capability().dialect
    }

    pub fn options(&self) -> &Options {
        &self.shared.engine.options
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.shared.engine
    }

    pub(crate) async fn connection(&self) -> Result<PoolConnection> {
        self.shared.pool.get().await
    }

    fn hooks(&self) -> MutexGuard<'_, Hooks> {
        self.shared
            .hooks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("engine", &self.shared.engine)
            .field("pool", &self.shared.pool)
            .finish()
    }
}
