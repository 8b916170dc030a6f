use serde::Serialize;
use thiserror::Error;

/// Result type alias for metadata operations.
pub type MetaResult<T> = Result<T, MetaError>;

/// Errors raised by the overlay engine.
///
/// Only `DuplicateRegistration`, `NotRegistered` and `LockPoisoned` ever
/// reach a caller: they indicate caller-side misuse rather than document
/// quality. Everything else is caught at a per-item or whole-document
/// boundary inside the loader and degraded to defaults.
#[derive(Error, Debug)]
pub enum MetaError {
    /// The document declares a format version this loader does not understand.
    #[error("unsupported meta document version '{found}', expected {expected}")]
    VersionMismatch { found: String, expected: u32 },

    /// Structurally broken document: XML syntax error, wrong root element,
    /// or a required attribute missing from an enum/option node.
    #[error("malformed meta document: {reason}")]
    MalformedDocument { reason: String },

    /// Non-integer text in an integer attribute.
    #[error("attribute '{attribute}' is not an integer: '{value}'")]
    FormatError { attribute: String, value: String },

    /// Lookup for a schema or field that has not been loaded yet.
    #[error("no metadata registered for '{name}'")]
    NotRegistered { name: String },

    /// A second load for a schema identity already present in the registry.
    #[error("metadata already registered for schema '{name}'")]
    DuplicateRegistration { name: String },

    /// A registry mutex was poisoned by a panicking thread.
    #[error("metadata registry lock poisoned")]
    LockPoisoned,
}

/// Per-item degradations collected during a load.
///
/// The loader never lets one bad annotation abort a schema load; instead of
/// discarding the failures it records one warning per degraded item on the
/// resulting [`SchemaMeta`](super::SchemaMeta).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LoadWarning {
    /// The whole document was rejected and every field fell back to blank
    /// metadata.
    #[error("meta document rejected, all fields defaulted: {reason}")]
    DocumentRejected { reason: String },

    /// One enum definition was skipped; fields referencing it get no enum
    /// binding.
    #[error("enum '{name}' skipped: {reason}")]
    MalformedEnum { name: String, reason: String },

    /// Two enum definitions share a name; the last one read is kept.
    #[error("enum '{name}' defined more than once; last definition kept")]
    DuplicateEnum { name: String },

    /// One field's entry could not be read; that field fell back to blank
    /// metadata.
    #[error("entry for field '{field}' skipped: {reason}")]
    MalformedFieldEntry { field: String, reason: String },
}
