// Internal modules
pub(crate) mod types;

// Public re-exports
pub use types::{FieldId, ParamField, ParamSchema, SchemaId};
