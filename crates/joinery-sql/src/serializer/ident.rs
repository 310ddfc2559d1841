use super::{Flavor, Formatter, Params, ToSql};

/// A quoted identifier.
pub(super) struct Ident<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let name = self.0.as_ref();

        match f.serializer.flavor {
            Flavor::Sqlite | Flavor::Postgresql => {
                f.dst.push('"');
                f.dst.push_str(&name.replace('"', "\"\""));
                f.dst.push('"');
            }
            Flavor::Mysql => {
                f.dst.push('`');
                f.dst.push_str(&name.replace('`', "``"));
                f.dst.push('`');
            }
            Flavor::Mssql => {
                f.dst.push('[');
                f.dst.push_str(&name.replace(']', "]]"));
                f.dst.push(']');
            }
        }
    }
}

/// A bracket-quoted MSSQL object name inside an `N'...'` string literal.
pub(super) struct ObjectName<S>(pub(super) S);

impl<S: AsRef<str>> ToSql for ObjectName<S> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let quoted = format!("[{}]", self.0.as_ref().replace(']', "]]"));
        f.dst.push_str(&quoted.replace('\'', "''"));
    }
}
