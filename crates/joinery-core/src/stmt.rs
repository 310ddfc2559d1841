mod direction;
pub use direction::Direction;

mod expr;
pub use expr::Expr;

mod record;
pub use record::Record;

mod statement;
pub use statement::{
    CreateTable, Delete, DropTable, Insert, OrderByExpr, Projection, Select, Statement, Update,
};

mod typed_value;
pub use typed_value::TypedValue;

mod value;
pub use value::Value;
