use super::{Direction, Expr, Value};
use crate::schema::ModelId;

/// A statement against the tables of a schema.
///
/// Tables are named by model and columns by attribute index, so a statement
/// can be rendered for any dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    DropTable(DropTable),
    Insert(Insert),
    Select(Select),
    Update(Update),
    Delete(Delete),

    /// Reads the key generated by the last insert on the connection.
    LastInsertId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub model: ModelId,
    pub if_not_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub model: ModelId,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub model: ModelId,
    pub columns: Vec<usize>,

    /// One entry per row; each row has one value per column.
    pub rows: Vec<Vec<Value>>,

    /// Columns returned for every inserted row.
    pub returning: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub model: ModelId,
    pub projection: Projection,
    pub filter: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Columns(Vec<usize>),
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderByExpr {
    pub column: usize,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub model: ModelId,
    pub assignments: Vec<(usize, Value)>,
    pub filter: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub model: ModelId,
    pub filter: Option<Expr>,
}

impl Statement {
    pub fn create_table(model: ModelId, if_not_exists: bool) -> Statement {
        Statement::CreateTable(CreateTable {
            model,
            if_not_exists,
        })
    }

    pub fn drop_table(model: ModelId, if_exists: bool) -> Statement {
        Statement::DropTable(DropTable { model, if_exists })
    }

    /// The model whose table the statement touches.
    pub fn model(&self) -> Option<ModelId> {
        match self {
            Statement::CreateTable(stmt) => Some(stmt.model),
            Statement::DropTable(stmt) => Some(stmt.model),
            Statement::Insert(stmt) => Some(stmt.model),
            Statement::Select(stmt) => Some(stmt.model),
            Statement::Update(stmt) => Some(stmt.model),
            Statement::Delete(stmt) => Some(stmt.model),
            Statement::LastInsertId => None,
        }
    }
}

impl From<Insert> for Statement {
    fn from(stmt: Insert) -> Statement {
        Statement::Insert(stmt)
    }
}

impl From<Select> for Statement {
    fn from(stmt: Select) -> Statement {
        Statement::Select(stmt)
    }
}

impl From<Update> for Statement {
    fn from(stmt: Update) -> Statement {
        Statement::Update(stmt)
    }
}

impl From<Delete> for Statement {
    fn from(stmt: Delete) -> Statement {
        Statement::Delete(stmt)
    }
}
