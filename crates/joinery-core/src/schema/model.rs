use super::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

/// A model as declared by the user, before the schema is resolved.
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub options: ModelOptions,
}

/// Per-model options. `None` falls back to the session-wide `define`
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct ModelOptions {
    pub table_name: Option<String>,
    pub timestamps: Option<bool>,
    pub freeze_table_name: Option<bool>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> ModelDef {
        ModelDef {
            name: name.into(),
            attributes: vec![],
            options: ModelOptions::default(),
        }
    }

    pub fn attribute(mut self, attribute: Attribute) -> ModelDef {
        self.attributes.push(attribute);
        self
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> ModelDef {
        self.options.table_name = Some(table_name.into());
        self
    }

    pub fn timestamps(mut self, timestamps: bool) -> ModelDef {
        self.options.timestamps = Some(timestamps);
        self
    }

    pub fn freeze_table_name(mut self, freeze: bool) -> ModelDef {
        self.options.freeze_table_name = Some(freeze);
        self
    }
}

/// A resolved model.
#[derive(Debug, Clone)]
pub struct Model {
    pub id: ModelId,
    pub name: String,
    pub table_name: String,
    pub attributes: Vec<Attribute>,

    /// Indices into `attributes`, in declaration order.
    pub primary_key: Vec<usize>,
}

impl Model {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name == name)
    }

    /// The key attribute when the primary key is a single attribute.
    pub fn single_primary_key(&self) -> Option<usize> {
        match self.primary_key[..] {
            [index] => Some(index),
            _ => None,
        }
    }

    pub fn auto_increment(&self) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.auto_increment)
    }

    pub fn column_indices(&self) -> Vec<usize> {
        (0..self.attributes.len()).collect()
    }
}
