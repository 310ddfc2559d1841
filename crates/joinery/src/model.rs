use crate::{db::PoolConnection, BelongsToManyHandle, Db, Result};

use joinery_core::{
    schema::{Auto, Model, ModelId, Schema},
    stmt::{Delete, Direction, Expr, OrderByExpr, Projection, Record, Select, Statement, Value},
    Error,
};

use chrono::Utc;
use std::{fmt, sync::Arc};

/// Operations on the rows of one model.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    db: Db,
    model: ModelId,
}

/// Filters, ordering and limit of a query.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Every listed attribute must equal its value.
    pub where_eq: Record,

    pub order: Vec<(String, Direction)>,

    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn new() -> FindOptions {
        FindOptions::default()
    }

    pub fn where_eq(mut self, name: impl Into<String>, value: impl Into<Value>) -> FindOptions {
        self.where_eq.insert(name, value);
        self
    }

    pub fn order(mut self, name: impl Into<String>, direction: Direction) -> FindOptions {
        self.order.push((name.into(), direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> FindOptions {
        self.limit = Some(limit);
        self
    }
}

/// A stored row of a model.
#[derive(Clone)]
pub struct Instance {
    schema: Arc<Schema>,
    model: ModelId,
    values: Record,
}

impl ModelHandle {
    pub(crate) fn new(db: Db, model: ModelId) -> ModelHandle {
        ModelHandle { db, model }
    }

    pub fn model(&self) -> &Model {
        self.db.schema().model(self.model)
    }

    /// Inserts a row and returns it as stored, generated keys included.
    pub async fn create(&self, record: Record) -> Result<Instance> {
        let record = self.prepare(record)?;
        let mut conn = self.db.connection().await?;
        self.insert(&mut conn, &record).await
    }

    /// Inserts every record in a single transaction.
    pub async fn bulk_create(&self, records: Vec<Record>) -> Result<Vec<Instance>> {
        let records = records
            .into_iter()
            .map(|record| self.prepare(record))
            .collect::<Result<Vec<_>>>()?;

        if records.is_empty() {
            return Ok(vec![]);
        }

        let engine = self.db.engine();
        let mut conn = self.db.connection().await?;

        engine.begin(&mut conn).await?;
        let res = self.insert_all(&mut conn, &records).await;
        engine.finish(&mut conn, res).await
    }

    pub async fn find_all(&self, options: FindOptions) -> Result<Vec<Instance>> {
        let filter = self.filter(&options.where_eq)?;
        let order_by = options
            .order
            .iter()
            .map(|(name, direction)| {
                Ok(OrderByExpr {
                    column: self.attribute_index(name)?,
                    direction: *direction,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut conn = self.db.connection().await?;
        self.select(&mut conn, filter, order_by, options.limit)
            .await
    }

    /// Finds the row whose single-attribute primary key equals `key`.
    pub async fn find_by_pk(&self, key: impl Into<Value>) -> Result<Option<Instance>> {
        let model = self.model();
        let index = model.single_primary_key().ok_or_else(|| {
            Error::unsupported_feature(format!(
                "`{}` has a composite primary key; find_by_pk needs a single key attribute",
                model.name
            ))
        })?;

        let mut conn = self.db.connection().await?;
        let mut rows = self
            .select(&mut conn, Some(Expr::eq(index, key)), vec![], Some(1))
            .await?;
        Ok(rows.pop())
    }

    pub async fn count(&self, options: FindOptions) -> Result<u64> {
        let stmt = Select {
            model: self.model,
            projection: Projection::Count,
            filter: self.filter(&options.where_eq)?,
            order_by: vec![],
            limit: None,
        };

        let mut conn = self.db.connection().await?;
        let count = self
            .db
            .engine()
            .exec(&mut conn, stmt.into())
            .await?
            .into_scalar_i64()?;
        Ok(count as u64)
    }

    /// Deletes matching rows and returns how many were deleted.
    pub async fn destroy(&self, options: FindOptions) -> Result<u64> {
        let stmt = Delete {
            model: self.model,
            filter: self.filter(&options.where_eq)?,
        };

        let mut conn = self.db.connection().await?;
        let res = self.db.engine().exec(&mut conn, stmt.into()).await?;
        Ok(res.row_count())
    }

    /// The belongs-to-many association of this model named `name`, by alias
    /// or target model name.
    pub fn belongs_to_many(&self, name: &str) -> Result<BelongsToManyHandle> {
        let assoc = self
            .db
            .schema()
            .belongs_to_many(self.model, name)
            .ok_or_else(|| {
                Error::invalid_schema(format!(
                    "`{}` has no belongs-to-many association `{name}`",
                    self.model().name
                ))
            })?;

        Ok(BelongsToManyHandle::new(self.db.clone(), assoc.id))
    }

    /// Checks a record against the model and fills automatic values. The
    /// result lists attributes in declaration order.
    pub(crate) fn prepare(&self, record: Record) -> Result<Record> {
        let model = self.model();

        if let Some(name) = record.names().find(|name| model.attribute(name).is_none()) {
            return Err(Error::unknown_attribute(&model.name, name));
        }

        let now = Utc::now();
        let mut prepared = Record::new();

        for attr in &model.attributes {
            match record.get(&attr.name) {
                Some(value) => {
                    if value.is_null() && !attr.allow_null && !attr.is_generated() {
                        return Err(Error::missing_attribute(&model.name, &attr.name));
                    }
                    value.check_type(attr.ty)?;
                    prepared.insert(attr.name.as_str(), value.clone());
                }
                None => match attr.auto {
                    Some(Auto::CreatedAt | Auto::UpdatedAt) => {
                        prepared.insert(attr.name.as_str(), now);
                    }
                    None if !attr.allow_null && !attr.is_generated() => {
                        return Err(Error::missing_attribute(&model.name, &attr.name));
                    }
                    None => {}
                },
            }
        }

        Ok(prepared)
    }

    pub(crate) async fn insert(&self, conn: &mut PoolConnection, record: &Record) -> Result<Instance> {
        let values = self.db.engine().insert(conn, self.model, record).await?;
        Ok(self.instance(values))
    }

    pub(crate) async fn insert_all(
        &self,
        conn: &mut PoolConnection,
        records: &[Record],
    ) -> Result<Vec<Instance>> {
        let mut instances = Vec::with_capacity(records.len());
        for record in records {
            instances.push(self.insert(conn, record).await?);
        }
        Ok(instances)
    }

    pub(crate) async fn select(
        &self,
        conn: &mut PoolConnection,
        filter: Option<Expr>,
        order_by: Vec<OrderByExpr>,
        limit: Option<u64>,
    ) -> Result<Vec<Instance>> {
        let model = self.model();
        let stmt = Select {
            model: self.model,
            projection: Projection::Columns(model.column_indices()),
            filter,
            order_by,
            limit,
        };

        let rows = self
            .db
            .engine()
            .exec(conn, Statement::from(stmt))
            .await?
            .into_values()?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let values = model
                    .attributes
                    .iter()
                    .map(|attr| attr.name.clone())
                    .zip(row)
                    .collect();
                self.instance(values)
            })
            .collect())
    }

    pub(crate) fn attribute_index(&self, name: &str) -> Result<usize> {
        let model = self.model();
        model
            .attribute_index(name)
            .ok_or_else(|| Error::unknown_attribute(&model.name, name))
    }

    fn filter(&self, where_eq: &Record) -> Result<Option<Expr>> {
        let exprs = where_eq
            .iter()
            .map(|(name, value)| Ok(Expr::Eq(self.attribute_index(name)?, value.clone())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Expr::and_from_vec(exprs))
    }

    fn instance(&self, values: Record) -> Instance {
        Instance {
            schema: self.db.schema().clone(),
            model: self.model,
            values,
        }
    }
}

impl Instance {
    pub fn model(&self) -> &Model {
        self.schema.model(self.model)
    }

    pub(crate) fn model_id(&self) -> ModelId {
        self.model
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn values(&self) -> &Record {
        &self.values
    }

    /// Value of the single-attribute primary key.
    pub fn primary_key(&self) -> Option<&Value> {
        let model = self.model();
        let index = model.single_primary_key()?;
        self.values.get(&model.attributes[index].name)
    }

    /// The row as a JSON object, attributes in declaration order.
    pub fn to_json(&self) -> serde_json::Value {
        self.values.to_json()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("model", &self.model().name)
            .field("values", &self.values)
            .finish()
    }
}
