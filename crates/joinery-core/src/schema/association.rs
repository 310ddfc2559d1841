use super::ModelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssociationId(pub usize);

/// Options of a belongs-to-many declaration.
#[derive(Debug, Clone)]
pub struct BelongsToManyOptions {
    /// Name of the model holding one row per link.
    pub through: String,

    /// Through attribute referencing the source key. Defaults to the source
    /// model name followed by its capitalized key name.
    pub foreign_key: Option<String>,

    /// Through attribute referencing the target key, defaulted like
    /// `foreign_key`.
    pub other_key: Option<String>,

    /// Name the association is looked up by. Defaults to the target model
    /// name.
    pub alias: Option<String>,

    /// Whether a (source, target) pair may appear at most once. Defaults to
    /// `true` only when the pair is the through model's primary key.
    pub unique: Option<bool>,
}

impl BelongsToManyOptions {
    pub fn through(through: impl Into<String>) -> BelongsToManyOptions {
        BelongsToManyOptions {
            through: through.into(),
            foreign_key: None,
            other_key: None,
            alias: None,
            unique: None,
        }
    }

    pub fn foreign_key(mut self, foreign_key: impl Into<String>) -> BelongsToManyOptions {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn other_key(mut self, other_key: impl Into<String>) -> BelongsToManyOptions {
        self.other_key = Some(other_key.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> BelongsToManyOptions {
        self.alias = Some(alias.into());
        self
    }

    pub fn unique(mut self, unique: bool) -> BelongsToManyOptions {
        self.unique = Some(unique);
        self
    }
}

/// A resolved many-to-many association mediated by a through model.
#[derive(Debug, Clone)]
pub struct BelongsToMany {
    pub id: AssociationId,
    pub name: String,
    pub source: ModelId,
    pub target: ModelId,
    pub through: ModelId,

    /// Key attribute of the source model.
    pub source_key: usize,

    /// Key attribute of the target model.
    pub target_key: usize,

    /// Through attribute referencing `source_key`.
    pub foreign_key: usize,

    /// Through attribute referencing `target_key`.
    pub other_key: usize,

    pub unique: bool,
}
