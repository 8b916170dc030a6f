// Internal modules
pub(crate) mod core;
pub(crate) mod loader;
pub(crate) mod types;

// Public re-exports
pub use self::core::MetaRegistry;
pub use self::loader::META_FORMAT_VERSION;
pub use self::types::{EnumTable, FieldMeta, LoadWarning, MetaError, MetaResult, SchemaMeta};
