//! Many-to-many associations mediated by a through model.

use crate::{db::PoolConnection, Db, Instance, ModelHandle, Result};

use joinery_core::{
    schema::{AssociationId, Auto, BelongsToMany, Model, ModelId},
    stmt::{Delete, Direction, Expr, OrderByExpr, Record, Update, Value},
    Error,
};

/// Links between instances of an association's source and target models.
#[derive(Debug, Clone)]
pub struct BelongsToManyHandle {
    db: Db,
    assoc: AssociationId,
}

/// Options of [`BelongsToManyHandle::add`].
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Attributes stored on every through row written by the call.
    pub through: Record,
}

impl AddOptions {
    pub fn through(through: Record) -> AddOptions {
        AddOptions { through }
    }
}

impl BelongsToManyHandle {
    pub(crate) fn new(db: Db, assoc: AssociationId) -> BelongsToManyHandle {
        BelongsToManyHandle { db, assoc }
    }

    pub fn association(&self) -> &BelongsToMany {
        self.db.schema().association(self.assoc)
    }

    /// Links `source` to each of `targets`, returning the through rows
    /// written.
    ///
    /// When the through model has its own key every call appends one row per
    /// target, even for pairs that are already linked. When it is keyed by
    /// the pair, an existing row has its through attributes updated instead.
    /// Several targets are written in one transaction.
    pub async fn add<'a>(
        &self,
        source: &Instance,
        targets: impl IntoIterator<Item = &'a Instance>,
        options: AddOptions,
    ) -> Result<Vec<Instance>> {
        let assoc = self.association();
        let source_key = self.source_key(source)?;

        let rows = targets
            .into_iter()
            .map(|target| {
                let mut row = options.through.clone();
                row.insert(self.foreign_key_name(), source_key.clone());
                row.insert(self.other_key_name(), self.target_key(target)?);
                self.through().prepare(row)
            })
            .collect::<Result<Vec<_>>>()?;

        let engine = self.db.engine();
        let mut conn = self.db.connection().await?;

        if rows.len() <= 1 {
            return self.write_links(&mut conn, &rows, assoc.unique).await;
        }

        engine.begin(&mut conn).await?;
        let res = self.write_links(&mut conn, &rows, assoc.unique).await;
        engine.finish(&mut conn, res).await
    }

    /// The targets linked to `source`, each at most once, ordered by the
    /// primary key of their first through row.
    ///
    /// A through model with its own auto-increment key yields link order. A
    /// through model keyed by the pair yields target key order.
    pub async fn get(&self, source: &Instance) -> Result<Vec<Instance>> {
        let assoc = self.association();
        let mut conn = self.db.connection().await?;

        let keys = self.linked_keys(&mut conn, source).await?;
        if keys.is_empty() {
            return Ok(vec![]);
        }

        let target = ModelHandle::new(self.db.clone(), assoc.target);
        let found = target
            .select(
                &mut conn,
                Some(Expr::InList(assoc.target_key, keys.clone())),
                vec![],
                None,
            )
            .await?;

        let target_key_name = &target.model().attributes[assoc.target_key].name;

        Ok(keys
            .iter()
            .filter_map(|key| {
                found
                    .iter()
                    .find(|instance| instance.get(target_key_name) == Some(key))
                    .cloned()
            })
            .collect())
    }

    /// Returns `true` if `source` is linked to `target`.
    pub async fn has(&self, source: &Instance, target: &Instance) -> Result<bool> {
        let filter = self.pair_filter(self.source_key(source)?, self.target_key(target)?);
        let count = self
            .through()
            .count(crate::FindOptions {
                where_eq: filter,
                ..Default::default()
            })
            .await?;
        Ok(count > 0)
    }

    /// Number of distinct targets linked to `source`.
    pub async fn count(&self, source: &Instance) -> Result<u64> {
        let mut conn = self.db.connection().await?;
        Ok(self.linked_keys(&mut conn, source).await?.len() as u64)
    }

    /// Unlinks `source` from each of `targets`, deleting every through row
    /// of each pair. Returns the number of rows deleted.
    pub async fn remove<'a>(
        &self,
        source: &Instance,
        targets: impl IntoIterator<Item = &'a Instance>,
    ) -> Result<u64> {
        let assoc = self.association();
        let source_key = self.source_key(source)?;
        let target_keys = targets
            .into_iter()
            .map(|target| self.target_key(target))
            .collect::<Result<Vec<_>>>()?;

        if target_keys.is_empty() {
            return Ok(0);
        }

        let stmt = Delete {
            model: assoc.through,
            filter: Expr::and_from_vec(vec![
                Expr::Eq(assoc.foreign_key, source_key),
                Expr::InList(assoc.other_key, target_keys),
            ]),
        };

        let mut conn = self.db.connection().await?;
        let res = self.db.engine().exec(&mut conn, stmt.into()).await?;
        Ok(res.row_count())
    }

    async fn write_links(
        &self,
        conn: &mut PoolConnection,
        rows: &[Record],
        unique: bool,
    ) -> Result<Vec<Instance>> {
        let through = self.through();

        if !unique {
            return through.insert_all(conn, rows).await;
        }

        let mut written = Vec::with_capacity(rows.len());
        for row in rows {
            written.push(self.upsert_link(conn, row).await?);
        }
        Ok(written)
    }

    /// Updates the through attributes of the pair's row, or inserts it.
    async fn upsert_link(&self, conn: &mut PoolConnection, row: &Record) -> Result<Instance> {
        let assoc = self.association();
        let through = self.through();

        let foreign_key = key_of(through.model(), row, self.foreign_key_name())?;
        let other_key = key_of(through.model(), row, self.other_key_name())?;
        let filter = Expr::and_from_vec(vec![
            Expr::Eq(assoc.foreign_key, foreign_key),
            Expr::Eq(assoc.other_key, other_key),
        ]);

        let existing = through
            .select(conn, filter.clone(), vec![], Some(1))
            .await?;

        if existing.is_empty() {
            return through.insert(conn, row).await;
        }

        let assignments = row
            .iter()
            .filter(|(name, _)| self.updatable(name))
            .map(|(name, value)| Ok((through.attribute_index(name)?, value.clone())))
            .collect::<Result<Vec<_>>>()?;

        if !assignments.is_empty() {
            let stmt = Update {
                model: assoc.through,
                assignments,
                filter: filter.clone(),
            };
            self.db.engine().exec(conn, stmt.into()).await?;
        }

        let mut rows = through.select(conn, filter, vec![], Some(1)).await?;
        rows.pop()
            .ok_or_else(|| Error::record_not_found(format!("`{}` link", through.model().name)))
    }

    /// Target keys linked to `source`, deduplicated, in through key order.
    async fn linked_keys(
        &self,
        conn: &mut PoolConnection,
        source: &Instance,
    ) -> Result<Vec<Value>> {
        let assoc = self.association();
        let through = self.through();
        let through_model = through.model();

        let order_by = through_model
            .primary_key
            .iter()
            .map(|column| OrderByExpr {
                column: *column,
                direction: Direction::Asc,
            })
            .collect();

        let rows = through
            .select(
                conn,
                Some(Expr::Eq(assoc.foreign_key, self.source_key(source)?)),
                order_by,
                None,
            )
            .await?;

        let other_key_name = self.other_key_name();
        let mut keys: Vec<Value> = vec![];
        for row in rows {
            if let Some(key) = row.get(other_key_name) {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
        }
        Ok(keys)
    }

    /// Through attributes an existing link may have overwritten.
    fn updatable(&self, name: &str) -> bool {
        if name == self.foreign_key_name() || name == self.other_key_name() {
            return false;
        }

        self.through()
            .model()
            .attribute(name)
            .is_some_and(|attr| {
                !attr.primary_key && !attr.auto_increment && attr.auto != Some(Auto::CreatedAt)
            })
    }

    fn pair_filter(&self, source_key: Value, target_key: Value) -> Record {
        Record::new()
            .with(self.foreign_key_name(), source_key)
            .with(self.other_key_name(), target_key)
    }

    fn through(&self) -> ModelHandle {
        ModelHandle::new(self.db.clone(), self.association().through)
    }

    fn foreign_key_name(&self) -> &str {
        let assoc = self.association();
        &self.db.schema().model(assoc.through).attributes[assoc.foreign_key].name
    }

    fn other_key_name(&self) -> &str {
        let assoc = self.association();
        &self.db.schema().model(assoc.through).attributes[assoc.other_key].name
    }

    fn source_key(&self, source: &Instance) -> Result<Value> {
        let assoc = self.association();
        self.key(source, assoc.source, assoc.source_key)
    }

    fn target_key(&self, target: &Instance) -> Result<Value> {
        let assoc = self.association();
        self.key(target, assoc.target, assoc.target_key)
    }

    fn key(&self, instance: &Instance, model: ModelId, index: usize) -> Result<Value> {
        let expected = self.db.schema().model(model);

        if instance.model_id() != model {
            joinery_core::bail!(
                "association `{}` expects a `{}` instance, got `{}`",
                self.association().name,
                expected.name,
                instance.model().name
            );
        }

        key_of(expected, instance.values(), &expected.attributes[index].name)
    }
}

fn key_of(model: &Model, record: &Record, name: &str) -> Result<Value> {
    match record.get(name) {
        Some(value) if !value.is_null() => Ok(value.clone()),
        _ => Err(Error::missing_attribute(&model.name, name)),
    }
}
