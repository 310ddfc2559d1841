use crate::{
    schema::Type,
    stmt::TypedValue,
};

#[derive(Debug, Clone)]
pub enum Operation {
    /// Execute a rendered SQL statement.
    QuerySql(QuerySql),

    /// Transaction control.
    Transaction(Transaction),
}

#[derive(Debug, Clone)]
pub struct QuerySql {
    pub sql: String,

    /// Positional parameters, in placeholder order.
    pub params: Vec<TypedValue>,

    /// Types of the returned columns. `None` when the statement returns a
    /// row count instead of rows.
    pub ret: Option<Vec<Type>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Start,
    Commit,
    Rollback,
}

impl Transaction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Transaction::Start => "BEGIN",
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        }
    }
}

impl From<QuerySql> for Operation {
    fn from(op: QuerySql) -> Operation {
        Operation::QuerySql(op)
    }
}

impl From<Transaction> for Operation {
    fn from(op: Transaction) -> Operation {
        Operation::Transaction(op)
    }
}
