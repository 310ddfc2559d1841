use super::Value;

/// A filter over the columns of the statement's model. Columns are attribute
/// indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `column = value`, or `column IS NULL` for a null value.
    Eq(usize, Value),

    /// `column IN (values...)`. An empty list matches nothing.
    InList(usize, Vec<Value>),

    And(Vec<Expr>),
}

impl Expr {
    pub fn eq(column: usize, value: impl Into<Value>) -> Expr {
        Expr::Eq(column, value.into())
    }

    /// Combines filters with `AND`, flattening nested conjunctions. Returns
    /// `None` when there is nothing to filter on.
    pub fn and_from_vec(mut exprs: Vec<Expr>) -> Option<Expr> {
        match exprs.len() {
            0 => None,
            1 => exprs.pop(),
            _ => Some(Expr::And(
                exprs
                    .into_iter()
                    .flat_map(|expr| match expr {
                        Expr::And(inner) => inner,
                        expr => vec![expr],
                    })
                    .collect(),
            )),
        }
    }
}
