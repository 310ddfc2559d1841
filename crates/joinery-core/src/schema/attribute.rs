use super::{ModelId, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name, also used as the column name.
    pub name: String,

    pub ty: Type,

    pub primary_key: bool,

    pub auto_increment: bool,

    pub allow_null: bool,

    /// Value populated automatically on insert.
    pub auto: Option<Auto>,

    /// Set on foreign key attributes once associations are resolved.
    pub references: Option<Reference>,
}

/// Automatically populated attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auto {
    CreatedAt,
    UpdatedAt,
}

/// The attribute a foreign key points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub model: ModelId,
    pub attribute: usize,
}

impl Attribute {
    pub fn new(name: impl Into<String>, ty: Type) -> Attribute {
        Attribute {
            name: name.into(),
            ty,
            primary_key: false,
            auto_increment: false,
            allow_null: true,
            auto: None,
            references: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Attribute {
        Attribute::new(name, Type::Text)
    }

    pub fn integer(name: impl Into<String>) -> Attribute {
        Attribute::new(name, Type::Integer)
    }

    /// Marks the attribute as (part of) the primary key. Key attributes are
    /// never nullable.
    pub fn primary_key(mut self) -> Attribute {
        self.primary_key = true;
        self.allow_null = false;
        self
    }

    pub fn auto_increment(mut self) -> Attribute {
        self.auto_increment = true;
        self
    }

    pub fn not_null(mut self) -> Attribute {
        self.allow_null = false;
        self
    }

    /// Returns `true` if inserts may omit this attribute.
    pub fn is_generated(&self) -> bool {
        self.auto_increment || self.auto.is_some()
    }
}
