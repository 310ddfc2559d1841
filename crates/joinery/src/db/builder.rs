use super::{Connect, Db, Pool};
use crate::{Options, Result};

use joinery_core::{
    driver::Driver,
    schema::{self, BelongsToManyOptions, ModelDef, Schema},
};

#[derive(Default)]
pub struct Builder {
    options: Options,

    /// Schema builder
    core: schema::Builder,
}

impl Builder {
    pub fn options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    /// Declares a model.
    pub fn define(&mut self, model: ModelDef) -> &mut Self {
        self.core.model(model);
        self
    }

    /// Declares that every `source` may be linked to many `target`s through
    /// rows of `options.through`. Only `source` gets a handle for the link.
    pub fn belongs_to_many(
        &mut self,
        source: &str,
        target: &str,
        options: BelongsToManyOptions,
    ) -> &mut Self {
        self.core.belongs_to_many(source, target, options);
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.core.table_name_prefix(prefix);
        self
    }

    /// Resolves the declared models with the session's `define` defaults.
    pub fn build_schema(&self) -> Result<Schema> {
        let mut core = self.core.clone();
        core.timestamps(self.options.define.timestamps)
            .freeze_table_name(self.options.define.freeze_table_name);
        core.build()
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(Connect::new(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = self.build_schema()?;

        log::debug!(
            "connecting; url={}; dialect={}; models={}",
            driver.url(),
            driver.capability().dialect,
            schema.models.len()
        );

        let pool = Pool::new(driver)?;

        // Surface connection failures here rather than on first use.
        drop(pool.get().await?);

        Ok(Db::new(schema, pool, self.options.clone()))
    }
}
