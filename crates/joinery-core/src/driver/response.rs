use crate::{stmt::Value, Error, Result};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows affected by the operation.
    Count(u64),

    /// Rows returned by the operation, one value per returned column.
    Values(Vec<Vec<Value>>),
}

impl Response {
    pub fn count(count: u64) -> Response {
        Response {
            rows: Rows::Count(count),
        }
    }

    pub fn values(values: Vec<Vec<Value>>) -> Response {
        Response {
            rows: Rows::Values(values),
        }
    }

    /// The number of affected rows; for row responses, the number of rows.
    pub fn row_count(&self) -> u64 {
        match &self.rows {
            Rows::Count(count) => *count,
            Rows::Values(values) => values.len() as u64,
        }
    }

    pub fn into_values(self) -> Result<Vec<Vec<Value>>> {
        match self.rows {
            Rows::Values(values) => Ok(values),
            Rows::Count(_) => Err(crate::err!("expected rows, got a row count")),
        }
    }

    /// Reads a single integer, as returned by `COUNT(*)` or a last insert id
    /// query.
    pub fn into_scalar_i64(self) -> Result<i64> {
        let mut values = self.into_values()?;
        match values.pop().and_then(|mut row| row.pop()) {
            Some(value) => i64::try_from(value),
            None => Err(Error::record_not_found("scalar query returned no rows")),
        }
    }
}
