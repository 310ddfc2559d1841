use super::Value;
use crate::schema::Type;

/// A statement parameter together with the type of the column it binds to.
///
/// Drivers with strict parameter typing use `ty` to pick the wire type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub value: Value,
    pub ty: Type,
}
