//! # ParamMeta
//!
//! This library implements a schema-metadata overlay engine. It takes a
//! runtime-loaded, binary-derived param schema (an ordered list of typed
//! fields with internal names) and merges onto it an externally-authored,
//! human-editable XML annotation document that enriches each field with
//! presentation and semantic hints: alternate display names, help text,
//! enumerated legal values, cross-references to other schemas, and a
//! boolean-reinterpretation flag.
//!
//! ## Core Components
//!
//! * `schema` - The consumed param-schema model: ordered field lists with
//!   internal names and opaque identity handles
//! * `meta` - The overlay engine: enum tables, per-field metadata, the
//!   document loader, and the identity registry
//!
//! ## Behavior
//!
//! Annotation documents are written independently of schema loads. They may
//! be stale, may reference fields by a sanitized name that is ambiguous when
//! duplicate internal names exist, and may be partially or wholly malformed.
//! The engine reconciles names by sanitized-key matching with positional
//! disambiguation and degrades anything it cannot match or parse to "no
//! metadata", so a bad annotation file never blocks the host application
//! from opening a schema. Degradations are collected as warnings on the
//! loaded result rather than discarded.

pub mod meta;
pub mod schema;

// Re-export main types for convenience
pub use meta::{
    EnumTable, FieldMeta, LoadWarning, MetaError, MetaRegistry, MetaResult, SchemaMeta,
    META_FORMAT_VERSION,
};
pub use schema::{FieldId, ParamField, ParamSchema, SchemaId};
