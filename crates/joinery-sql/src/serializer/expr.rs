use super::{Comma, Formatter, Ident, Params, ToSql};

use joinery_core::stmt::Expr;

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let model = f.current_model();

        match self {
            Expr::Eq(column, value) if value.is_null() => {
                fmt!(f, Ident(&model.attributes[*column].name), " IS NULL");
            }
            Expr::Eq(column, value) => {
                let attr = &model.attributes[*column];
                let placeholder = f.params.push(value, attr.ty);
                fmt!(f, Ident(&attr.name), " = ", placeholder);
            }
            Expr::InList(_, values) if values.is_empty() => {
                fmt!(f, "1 = 0");
            }
            Expr::InList(column, values) => {
                let attr = &model.attributes[*column];
                let placeholders = values
                    .iter()
                    .map(|value| f.params.push(value, attr.ty))
                    .collect::<Vec<_>>();
                fmt!(f, Ident(&attr.name), " IN (", Comma(placeholders), ")");
            }
            Expr::And(exprs) => {
                let mut s = "";
                for expr in exprs {
                    let nested = matches!(expr, Expr::And(_));
                    fmt!(f, s);
                    if nested {
                        fmt!(f, "(", expr, ")");
                    } else {
                        fmt!(f, expr);
                    }
                    s = " AND ";
                }
            }
        }
    }
}
