use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use crate::schema::{FieldId, ParamField, ParamSchema, SchemaId};

use super::loader::{self, ParsedMeta};
use super::types::{FieldMeta, LoadWarning, MetaError, SchemaMeta};

/// Identity registry mapping loaded schemas and their fields to merged
/// overlay metadata.
///
/// The registry is an explicit object the host owns and passes around;
/// nothing in this crate is process-global, so independent registries
/// (one per session, one per test) never collide. Exactly one
/// [`SchemaMeta`] may be registered per schema identity for the lifetime
/// of the registry.
///
/// Loading is total with respect to document quality: a missing, corrupt
/// or outdated annotation file degrades to all-blank metadata rather than
/// failing, so a bad document never blocks the host from opening a schema.
/// The only hard errors are caller-side misuse — loading the same schema
/// twice, or looking up before loading.
pub struct MetaRegistry {
    schemas: Mutex<HashMap<SchemaId, Arc<SchemaMeta>>>,
    fields: Mutex<HashMap<FieldId, Arc<FieldMeta>>>,
}

impl MetaRegistry {
    pub fn new() -> Self {
        Self {
            schemas: Mutex::new(HashMap::new()),
            fields: Mutex::new(HashMap::new()),
        }
    }

    /// Loads the overlay document at `path` and merges it onto `schema`.
    ///
    /// A nonexistent path is the normal no-annotations case and registers
    /// blank metadata silently. Any other read or parse problem also falls
    /// back to blank metadata, carrying the reason as a warning on the
    /// result. Fails only on duplicate registration.
    pub fn load_meta(
        &self,
        schema: &ParamSchema,
        path: &Path,
    ) -> Result<Arc<SchemaMeta>, MetaError> {
        match fs::read_to_string(path) {
            Ok(text) => self.load_meta_from_str(schema, &text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(
                    "no meta document for schema '{}' at {}",
                    schema.name(),
                    path.display()
                );
                self.register(schema, ParsedMeta::blank(schema, Vec::new()))
            }
            Err(err) => {
                warn!(
                    "meta document for schema '{}' unreadable, using defaults: {err}",
                    schema.name()
                );
                let warning = LoadWarning::DocumentRejected {
                    reason: err.to_string(),
                };
                self.register(schema, ParsedMeta::blank(schema, vec![warning]))
            }
        }
    }

    /// Merges an overlay document supplied as text onto `schema`.
    ///
    /// Same totality contract as [`load_meta`](Self::load_meta).
    pub fn load_meta_from_str(
        &self,
        schema: &ParamSchema,
        text: &str,
    ) -> Result<Arc<SchemaMeta>, MetaError> {
        match loader::parse_meta(text, schema) {
            Ok(parsed) => self.register(schema, parsed),
            Err(err) => {
                warn!(
                    "meta document for schema '{}' rejected, using defaults: {err}",
                    schema.name()
                );
                let warning = LoadWarning::DocumentRejected {
                    reason: err.to_string(),
                };
                self.register(schema, ParsedMeta::blank(schema, vec![warning]))
            }
        }
    }

    /// Registers all-blank metadata for a schema that has no overlay
    /// document at all.
    pub fn blank_meta(&self, schema: &ParamSchema) -> Result<Arc<SchemaMeta>, MetaError> {
        self.register(schema, ParsedMeta::blank(schema, Vec::new()))
    }

    /// Retrieves the metadata registered for a schema identity.
    pub fn meta_for_schema(&self, schema: &ParamSchema) -> Result<Arc<SchemaMeta>, MetaError> {
        let schemas = self.schemas.lock().map_err(|_| MetaError::LockPoisoned)?;
        schemas
            .get(&schema.id())
            .cloned()
            .ok_or_else(|| MetaError::NotRegistered {
                name: schema.name().to_string(),
            })
    }

    /// Retrieves the metadata registered for a field identity.
    pub fn meta_for_field(&self, field: &ParamField) -> Result<Arc<FieldMeta>, MetaError> {
        let fields = self.fields.lock().map_err(|_| MetaError::LockPoisoned)?;
        fields
            .get(&field.id())
            .cloned()
            .ok_or_else(|| MetaError::NotRegistered {
                name: field.internal_name().to_string(),
            })
    }

    /// Checks whether a schema identity has metadata registered.
    pub fn is_registered(&self, schema: &ParamSchema) -> bool {
        self.schemas
            .lock()
            .map(|schemas| schemas.contains_key(&schema.id()))
            .unwrap_or(false)
    }

    /// Inserts the parsed result under the schema and field identities.
    /// Registration is all-or-nothing: on a duplicate identity nothing is
    /// inserted and the error propagates.
    fn register(
        &self,
        schema: &ParamSchema,
        parsed: ParsedMeta,
    ) -> Result<Arc<SchemaMeta>, MetaError> {
        let field_metas: Vec<(FieldId, Arc<FieldMeta>)> = schema
            .fields()
            .iter()
            .zip(parsed.field_metas)
            .map(|(field, meta)| (field.id(), Arc::new(meta)))
            .collect();

        let meta = Arc::new(SchemaMeta::new(
            schema.id(),
            parsed.offset_size,
            parsed.display_order,
            parsed.enums,
            field_metas.clone(),
            parsed.warnings,
        ));

        // Lock order: schemas before fields, everywhere.
        let mut schemas = self.schemas.lock().map_err(|_| MetaError::LockPoisoned)?;
        let mut fields = self.fields.lock().map_err(|_| MetaError::LockPoisoned)?;

        if schemas.contains_key(&schema.id()) {
            return Err(MetaError::DuplicateRegistration {
                name: schema.name().to_string(),
            });
        }
        for field in schema.fields() {
            if fields.contains_key(&field.id()) {
                return Err(MetaError::DuplicateRegistration {
                    name: field.internal_name().to_string(),
                });
            }
        }

        for (id, field_meta) in field_metas {
            fields.insert(id, field_meta);
        }
        schemas.insert(schema.id(), Arc::clone(&meta));

        info!(
            "registered metadata for schema '{}': {} fields, {} warnings",
            schema.name(),
            meta.fields().len(),
            meta.warnings().len()
        );
        Ok(meta)
    }
}

impl Default for MetaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
