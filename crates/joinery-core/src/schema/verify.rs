use super::{ModelDef, Schema, Type};
use crate::{Error, Result};

use std::collections::HashSet;

pub(super) fn unique_model_names(defs: &[ModelDef]) -> Result<()> {
    let mut seen = HashSet::new();

    for def in defs {
        if !seen.insert(def.name.as_str()) {
            return Err(Error::invalid_schema(format!(
                "duplicate model `{}`",
                def.name
            )));
        }
    }

    Ok(())
}

pub(super) fn verify(schema: &Schema) -> Result<()> {
    Verify { schema }.verify()
}

struct Verify<'a> {
    schema: &'a Schema,
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        let mut tables = HashSet::new();

        for model in &self.schema.models {
            if !tables.insert(model.table_name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "table `{}` is used by more than one model",
                    model.table_name
                )));
            }

            self.verify_attributes(model)?;
        }

        let mut names = HashSet::new();
        for assoc in &self.schema.associations {
            if !names.insert((assoc.source, assoc.name.as_str())) {
                return Err(Error::invalid_schema(format!(
                    "model `{}` declares association `{}` twice",
                    self.schema.model(assoc.source).name,
                    assoc.name
                )));
            }
        }

        Ok(())
    }

    fn verify_attributes(&self, model: &super::Model) -> Result<()> {
        let mut names = HashSet::new();

        for attr in &model.attributes {
            if !names.insert(attr.name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "duplicate attribute `{}.{}`",
                    model.name, attr.name
                )));
            }

            if attr.auto_increment {
                if attr.ty != Type::Integer {
                    return Err(Error::invalid_schema(format!(
                        "auto_increment attribute `{}.{}` must be an integer",
                        model.name, attr.name
                    )));
                }

                if !attr.primary_key {
                    return Err(Error::invalid_schema(format!(
                        "auto_increment attribute `{}.{}` must be the primary key",
                        model.name, attr.name
                    )));
                }

                if model.primary_key.len() > 1 {
                    return Err(Error::invalid_schema(format!(
                        "auto_increment cannot be used with the composite key of `{}`",
                        model.name
                    )));
                }
            }
        }

        if model.primary_key.is_empty() {
            return Err(Error::invalid_schema(format!(
                "model `{}` has no primary key",
                model.name
            )));
        }

        Ok(())
    }
}
