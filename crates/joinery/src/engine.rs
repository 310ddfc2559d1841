use crate::{db::PoolConnection, Options};

use joinery_core::{
    driver::{
        operation::{Operation, QuerySql, Transaction},
        Capability, Response,
    },
    schema::{ModelId, Schema, Type},
    stmt::{Insert, Projection, Record, Statement, Value},
    Result,
};
use joinery_sql::Serializer;

use std::{sync::Arc, time::Instant};

/// Renders statements for the session's dialect, reports them to the
/// statement log and runs them on a connection.
#[derive(Debug)]
pub(crate) struct Engine {
    pub(crate) schema: Arc<Schema>,
    pub(crate) capability: &'static Capability,
    pub(crate) options: Options,
}

impl Engine {
    pub(crate) async fn exec(
        &self,
        conn: &mut PoolConnection,
        stmt: Statement,
    ) -> Result<Response> {
        let serializer = Serializer::new(&self.schema, self.capability.dialect);

        let mut params = vec![];
        let sql = serializer.serialize(&stmt, &mut params);
        let ret = self.ret_tys(&stmt);

        let message = if self.options.log_query_parameters && !params.is_empty() {
            let values = params
                .iter()
                .map(|param| param.value.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}; with parameters {values}", sql.trim_end_matches(';'))
        } else {
            sql.clone()
        };

        self.run(conn, QuerySql { sql, params, ret }.into(), &message)
            .await
    }

    pub(crate) async fn begin(&self, conn: &mut PoolConnection) -> Result<()> {
        self.transaction(conn, Transaction::Start).await
    }

    /// Commits on success; rolls back and returns the original error
    /// otherwise.
    pub(crate) async fn finish<T>(&self, conn: &mut PoolConnection, res: Result<T>) -> Result<T> {
        match res {
            Ok(value) => {
                self.transaction(conn, Transaction::Commit).await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.transaction(conn, Transaction::Rollback).await {
                    log::warn!("rollback failed: {rollback}");
                }
                Err(err)
            }
        }
    }

    /// Inserts one validated record and returns the stored row, generated
    /// keys included.
    pub(crate) async fn insert(
        &self,
        conn: &mut PoolConnection,
        model_id: ModelId,
        record: &Record,
    ) -> Result<Record> {
        let model = self.schema.model(model_id);

        let columns = model
            .attributes
            .iter()
            .enumerate()
            .filter(|(_, attr)| record.contains(&attr.name))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let row = columns
            .iter()
            .map(|index| {
                record
                    .get(&model.attributes[*index].name)
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect();

        let stmt = Insert {
            model: model_id,
            columns,
            rows: vec![row],
            returning: Some(model.column_indices()),
        };

        let res = self.exec(conn, stmt.into()).await?;

        if self.capability.insert_returning {
            let row = res.into_values()?.pop().ok_or_else(|| {
                joinery_core::err!("insert into `{}` returned no rows", model.table_name)
            })?;

            return Ok(model
                .attributes
                .iter()
                .map(|attr| attr.name.clone())
                .zip(row)
                .collect());
        }

        // Read the generated key back on the same connection.
        let generated = match model.auto_increment() {
            Some(index) if !record.contains(&model.attributes[index].name) => {
                let id = self
                    .exec(conn, Statement::LastInsertId)
                    .await?
                    .into_scalar_i64()?;
                Some((index, id))
            }
            _ => None,
        };

        Ok(model
            .attributes
            .iter()
            .enumerate()
            .map(|(index, attr)| {
                let value = match generated {
                    Some((generated, id)) if generated == index => Value::I64(id),
                    _ => record.get(&attr.name).cloned().unwrap_or(Value::Null),
                };
                (attr.name.clone(), value)
            })
            .collect())
    }

    async fn transaction(&self, conn: &mut PoolConnection, op: Transaction) -> Result<()> {
        self.run(conn, op.into(), op.as_sql()).await?;
        Ok(())
    }

    async fn run(
        &self,
        conn: &mut PoolConnection,
        op: Operation,
        message: &str,
    ) -> Result<Response> {
        let logging = &self.options.logging;

        if !self.options.benchmark {
            logging.emit(&format!("Executing (default): {message}"), None);
        }

        let start = Instant::now();
        let res = conn.exec(op).await;

        if self.options.benchmark {
            logging.emit(&format!("Executed (default): {message}"), Some(start.elapsed()));
        }

        res
    }

    /// Types of the columns a statement returns, if it returns rows.
    fn ret_tys(&self, stmt: &Statement) -> Option<Vec<Type>> {
        let column_tys = |model: ModelId, columns: &[usize]| {
            let model = self.schema.model(model);
            columns
                .iter()
                .map(|index| model.attributes[*index].ty)
                .collect::<Vec<_>>()
        };

        match stmt {
            Statement::Select(stmt) => Some(match &stmt.projection {
                Projection::Columns(columns) => column_tys(stmt.model, columns),
                Projection::Count => vec![Type::Integer],
            }),
            Statement::Insert(stmt) if self.capability.insert_returning => stmt
                .returning
                .as_ref()
                .map(|columns| column_tys(stmt.model, columns)),
            Statement::LastInsertId => Some(vec![Type::Integer]),
            _ => None,
        }
    }
}
