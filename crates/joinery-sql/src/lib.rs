pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

pub use joinery_core::stmt::{Statement, TypedValue};
