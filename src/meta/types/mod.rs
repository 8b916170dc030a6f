pub mod enum_table;
pub mod errors;
pub mod field_meta;
pub mod schema_meta;

pub use enum_table::EnumTable;
pub use errors::{LoadWarning, MetaError, MetaResult};
pub use field_meta::FieldMeta;
pub use schema_meta::SchemaMeta;
