/// Storage type of a model attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Unbounded text.
    Text,

    /// 32-bit signed integer. Values are carried as `i64` in memory.
    Integer,

    Boolean,

    /// Timestamp with time zone, stored in UTC.
    Date,
}

impl Type {
    pub fn is_integer(self) -> bool {
        matches!(self, Type::Integer)
    }
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Type::Text => "TEXT",
            Type::Integer => "INTEGER",
            Type::Boolean => "BOOLEAN",
            Type::Date => "DATE",
        })
    }
}
