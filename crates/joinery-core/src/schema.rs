mod association;
pub use association::{AssociationId, BelongsToMany, BelongsToManyOptions};

mod attribute;
pub use attribute::{Attribute, Auto, Reference};

mod builder;
pub use builder::Builder;

mod model;
pub use model::{Model, ModelDef, ModelId, ModelOptions};

mod ty;
pub use ty::Type;

mod verify;

use crate::Result;

/// The resolved schema: every model, keyed by name, and the associations
/// between them.
#[derive(Debug)]
pub struct Schema {
    pub models: Vec<Model>,
    pub associations: Vec<BelongsToMany>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id.0]
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|model| model.name == name)
    }

    pub fn association(&self, id: AssociationId) -> &BelongsToMany {
        &self.associations[id.0]
    }

    /// Finds an association of `source` by alias or target model name.
    pub fn belongs_to_many(&self, source: ModelId, name: &str) -> Option<&BelongsToMany> {
        self.associations
            .iter()
            .find(|assoc| assoc.source == source && assoc.name == name)
    }

    /// Models ordered so that every model comes after the models it
    /// references.
    pub fn creation_order(&self) -> Result<Vec<ModelId>> {
        let mut order = Vec::with_capacity(self.models.len());
        let mut state = vec![Visit::New; self.models.len()];

        for model in &self.models {
            self.visit(model.id, &mut state, &mut order)?;
        }

        Ok(order)
    }

    fn visit(&self, id: ModelId, state: &mut [Visit], order: &mut Vec<ModelId>) -> Result<()> {
        match state[id.0] {
            Visit::Done => return Ok(()),
            Visit::InProgress => {
                return Err(crate::Error::invalid_schema(format!(
                    "circular reference through model `{}`",
                    self.model(id).name
                )))
            }
            Visit::New => {}
        }

        state[id.0] = Visit::InProgress;

        for attr in &self.model(id).attributes {
            if let Some(reference) = attr.references {
                if reference.model != id {
                    self.visit(reference.model, state, order)?;
                }
            }
        }

        state[id.0] = Visit::Done;
        order.push(id);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Visit {
    New,
    InProgress,
    Done,
}
