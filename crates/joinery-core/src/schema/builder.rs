use super::{
    verify, AssociationId, Attribute, Auto, BelongsToMany, BelongsToManyOptions, Model, ModelDef,
    ModelId, Reference, Schema, Type,
};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Collects model and association declarations and resolves them into a
/// [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct Builder {
    models: Vec<ModelDef>,
    associations: Vec<AssociationDef>,

    /// Prepended to every table name.
    table_name_prefix: Option<String>,

    /// Session-wide default for `ModelOptions::timestamps`. `None` means on.
    timestamps: Option<bool>,

    /// Session-wide default for `ModelOptions::freeze_table_name`.
    freeze_table_name: bool,
}

#[derive(Debug, Clone)]
struct AssociationDef {
    source: String,
    target: String,
    options: BelongsToManyOptions,
}

impl Builder {
    pub fn model(&mut self, def: ModelDef) -> &mut Self {
        self.models.push(def);
        self
    }

    pub fn belongs_to_many(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        options: BelongsToManyOptions,
    ) -> &mut Self {
        self.associations.push(AssociationDef {
            source: source.into(),
            target: target.into(),
            options,
        });
        self
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn timestamps(&mut self, timestamps: bool) -> &mut Self {
        self.timestamps = Some(timestamps);
        self
    }

    pub fn freeze_table_name(&mut self, freeze: bool) -> &mut Self {
        self.freeze_table_name = freeze;
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut defs = self.models.clone();

        // A through model may be named without being declared; it then only
        // carries the two keys.
        for assoc in &self.associations {
            if !defs.iter().any(|def| def.name == assoc.options.through) {
                defs.push(ModelDef::new(&assoc.options.through));
            }
        }

        verify::unique_model_names(&defs)?;

        let lookup: IndexMap<&str, ModelId> = defs
            .iter()
            .enumerate()
            .map(|(index, def)| (def.name.as_str(), ModelId(index)))
            .collect();

        let find = |name: &str| {
            lookup.get(name).copied().ok_or_else(|| {
                Error::invalid_schema(format!("association references unknown model `{name}`"))
            })
        };

        let through_models = self
            .associations
            .iter()
            .map(|assoc| find(&assoc.options.through))
            .collect::<Result<Vec<_>>>()?;

        let mut models = defs
            .iter()
            .enumerate()
            .map(|(index, def)| Model {
                id: ModelId(index),
                name: def.name.clone(),
                table_name: self.table_name(def),
                attributes: def.attributes.clone(),
                primary_key: vec![],
            })
            .collect::<Vec<_>>();

        for model in &mut models {
            if !has_primary_key(model) && !through_models.contains(&model.id) {
                model
                    .attributes
                    .insert(0, Attribute::integer("id").primary_key().auto_increment());
            }
        }

        let mut associations = Vec::with_capacity(self.associations.len());

        for (index, assoc) in self.associations.iter().enumerate() {
            let source = find(&assoc.source)?;
            let target = find(&assoc.target)?;
            let through = through_models[index];

            let source_key = single_key(&models[source.0])?;
            let target_key = single_key(&models[target.0])?;

            let foreign_key_name = assoc
                .options
                .foreign_key
                .clone()
                .unwrap_or_else(|| default_key_name(&models[source.0], source_key));
            let other_key_name = assoc
                .options
                .other_key
                .clone()
                .unwrap_or_else(|| default_key_name(&models[target.0], target_key));

            if foreign_key_name == other_key_name {
                return Err(Error::invalid_schema(format!(
                    "`{}` is used as both foreign key and other key of `{}`",
                    foreign_key_name, models[through.0].name
                )));
            }

            let source_ty = models[source.0].attributes[source_key].ty;
            let target_ty = models[target.0].attributes[target_key].ty;

            let foreign_key = link_attribute(
                &mut models[through.0],
                &foreign_key_name,
                source_ty,
                Reference {
                    model: source,
                    attribute: source_key,
                },
            )?;
            let other_key = link_attribute(
                &mut models[through.0],
                &other_key_name,
                target_ty,
                Reference {
                    model: target,
                    attribute: target_key,
                },
            )?;

            associations.push(BelongsToMany {
                id: AssociationId(index),
                name: assoc
                    .options
                    .alias
                    .clone()
                    .unwrap_or_else(|| assoc.target.clone()),
                source,
                target,
                through,
                source_key,
                target_key,
                foreign_key,
                other_key,
                unique: false,
            });
        }

        // Through models without their own key are keyed by the pair.
        for assoc in &associations {
            let through = &mut models[assoc.through.0];
            if !has_primary_key(through) {
                for index in [assoc.foreign_key, assoc.other_key] {
                    through.attributes[index] = through.attributes[index].clone().primary_key();
                }
            }
        }

        for (model, def) in models.iter_mut().zip(&defs) {
            let timestamps = def
                .options
                .timestamps
                .or(self.timestamps)
                .unwrap_or(true);

            if timestamps {
                for (name, auto) in [("createdAt", Auto::CreatedAt), ("updatedAt", Auto::UpdatedAt)] {
                    if model.attribute(name).is_none() {
                        let mut attr = Attribute::new(name, Type::Date).not_null();
                        attr.auto = Some(auto);
                        model.attributes.push(attr);
                    }
                }
            }

            model.primary_key = model
                .attributes
                .iter()
                .enumerate()
                .filter(|(_, attr)| attr.primary_key)
                .map(|(index, _)| index)
                .collect();
        }

        for (assoc, def) in associations.iter_mut().zip(&self.associations) {
            let mut pair = [assoc.foreign_key, assoc.other_key];
            pair.sort_unstable();
            let keyed_by_pair = models[assoc.through.0].primary_key == pair;
            assoc.unique = def.options.unique.unwrap_or(keyed_by_pair);
        }

        let schema = Schema {
            models,
            associations,
        };

        verify::verify(&schema)?;

        Ok(schema)
    }

    fn table_name(&self, def: &ModelDef) -> String {
        let base = match &def.options.table_name {
            Some(table_name) => table_name.clone(),
            None if def
                .options
                .freeze_table_name
                .unwrap_or(self.freeze_table_name) =>
            {
                def.name.clone()
            }
            None => std_util::str::pluralize(&def.name),
        };

        match &self.table_name_prefix {
            Some(prefix) => format!("{prefix}{base}"),
            None => base,
        }
    }
}

fn has_primary_key(model: &Model) -> bool {
    model.attributes.iter().any(|attr| attr.primary_key)
}

fn single_key(model: &Model) -> Result<usize> {
    let keys = model
        .attributes
        .iter()
        .enumerate()
        .filter(|(_, attr)| attr.primary_key)
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    match keys[..] {
        [index] => Ok(index),
        _ => Err(Error::invalid_schema(format!(
            "model `{}` must have a single-attribute primary key to be associated",
            model.name
        ))),
    }
}

/// `Foo` keyed by `fooName` gives `FooFooName`; keyed by `id` gives `FooId`.
fn default_key_name(model: &Model, key: usize) -> String {
    let key = &model.attributes[key].name;
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", model.name, first.to_uppercase(), chars.as_str()),
        None => model.name.clone(),
    }
}

/// Marks `name` on the through model as referencing another model's key,
/// declaring the attribute if needed. Returns the attribute index.
fn link_attribute(
    through: &mut Model,
    name: &str,
    ty: Type,
    reference: Reference,
) -> Result<usize> {
    if let Some(index) = through.attribute_index(name) {
        let attr = &mut through.attributes[index];

        if attr.ty != ty {
            return Err(Error::invalid_schema(format!(
                "`{}.{}` is {} but references a {} key",
                through.name, name, attr.ty, ty
            )));
        }

        attr.references = Some(reference);
        return Ok(index);
    }

    let mut attr = Attribute::new(name, ty);
    attr.references = Some(reference);
    through.attributes.push(attr);
    Ok(through.attributes.len() - 1)
}
