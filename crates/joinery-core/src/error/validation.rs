use super::Error;

/// Error when a record does not satisfy its model definition.
#[derive(Debug)]
pub(super) struct ValidationError {
    kind: ValidationErrorKind,
}

#[derive(Debug)]
enum ValidationErrorKind {
    /// The record names an attribute the model does not declare.
    UnknownAttribute { model: Box<str>, attribute: Box<str> },

    /// A non-null attribute without a default was not provided.
    MissingAttribute { model: Box<str>, attribute: Box<str> },
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.kind {
            ValidationErrorKind::UnknownAttribute { model, attribute } => {
                write!(f, "model `{model}` has no attribute `{attribute}`")
            }
            ValidationErrorKind::MissingAttribute { model, attribute } => {
                write!(f, "`{model}.{attribute}` cannot be null")
            }
        }
    }
}

impl Error {
    pub fn unknown_attribute(model: &str, attribute: &str) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            kind: ValidationErrorKind::UnknownAttribute {
                model: model.into(),
                attribute: attribute.into(),
            },
        }))
    }

    pub fn missing_attribute(model: &str, attribute: &str) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            kind: ValidationErrorKind::MissingAttribute {
                model: model.into(),
                attribute: attribute.into(),
            },
        }))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Validation(_))
    }
}
