use std::collections::HashMap;
use std::sync::Arc;

use crate::schema::{FieldId, ParamField, ParamSchema, SchemaId};

use super::enum_table::EnumTable;
use super::errors::LoadWarning;
use super::field_meta::FieldMeta;

/// Per-schema container for merged overlay metadata.
///
/// One of these exists per loaded schema identity inside a registry. It owns
/// the document's enum tables and one [`FieldMeta`] per schema field, in
/// schema natural order, and carries the warnings collected while the
/// document was read. Immutable after construction.
#[derive(Debug)]
pub struct SchemaMeta {
    schema_id: SchemaId,
    offset_size: Option<u32>,
    display_order: Option<Vec<String>>,
    enums: HashMap<String, EnumTable>,
    fields: Vec<(FieldId, Arc<FieldMeta>)>,
    warnings: Vec<LoadWarning>,
}

impl SchemaMeta {
    pub(crate) fn new(
        schema_id: SchemaId,
        offset_size: Option<u32>,
        display_order: Option<Vec<String>>,
        enums: HashMap<String, EnumTable>,
        fields: Vec<(FieldId, Arc<FieldMeta>)>,
        warnings: Vec<LoadWarning>,
    ) -> Self {
        Self {
            schema_id,
            offset_size,
            display_order,
            enums,
            fields,
            warnings,
        }
    }

    pub fn schema_id(&self) -> SchemaId {
        self.schema_id
    }

    /// Trailing-digit magnitude bound used by consumers for display grouping.
    pub fn offset_size(&self) -> Option<u32> {
        self.offset_size
    }

    /// Field-name order that overrides natural field order for presentation
    /// only. Storage order is untouched.
    pub fn display_order(&self) -> Option<&[String]> {
        self.display_order.as_deref()
    }

    pub fn enums(&self) -> &HashMap<String, EnumTable> {
        &self.enums
    }

    pub fn enum_table(&self, name: &str) -> Option<&EnumTable> {
        self.enums.get(name)
    }

    /// Resolves a field's enum binding through the owner. Returns `None`
    /// for blank metadata or a binding the document never defined.
    pub fn enum_for(&self, meta: &FieldMeta) -> Option<&EnumTable> {
        meta.enum_name().and_then(|name| self.enums.get(name))
    }

    /// Field metadata in schema natural order.
    pub fn fields(&self) -> &[(FieldId, Arc<FieldMeta>)] {
        &self.fields
    }

    pub fn field_meta(&self, id: FieldId) -> Option<&Arc<FieldMeta>> {
        self.fields
            .iter()
            .find(|(field_id, _)| *field_id == id)
            .map(|(_, meta)| meta)
    }

    /// Per-item degradations collected while the document was read. Empty
    /// for a clean load.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Applies the display order to `schema`'s fields for presentation.
    ///
    /// Each name in the order list consumes the first not-yet-consumed field
    /// with that internal name; names matching nothing are skipped. The
    /// remaining fields follow in natural order. Without a display order
    /// this is simply the natural order.
    pub fn ordered_fields<'a>(&self, schema: &'a ParamSchema) -> Vec<&'a ParamField> {
        let Some(order) = self.display_order.as_deref() else {
            return schema.fields().iter().collect();
        };

        let mut consumed = vec![false; schema.fields().len()];
        let mut out = Vec::with_capacity(schema.fields().len());
        for name in order {
            let next = schema
                .fields()
                .iter()
                .enumerate()
                .find(|(i, f)| !consumed[*i] && f.internal_name() == name);
            if let Some((i, field)) = next {
                consumed[i] = true;
                out.push(field);
            }
        }
        for (i, field) in schema.fields().iter().enumerate() {
            if !consumed[i] {
                out.push(field);
            }
        }
        out
    }
}
