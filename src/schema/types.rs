use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity handle for a loaded schema.
///
/// Handles are minted at construction time, so two structurally identical
/// schemas built separately are distinct identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaId(Uuid);

/// Opaque identity handle for a single field within a loaded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(Uuid);

/// One named, typed slot within a param schema.
///
/// The internal name is free-form text owned by the binary format: it may
/// contain characters unsafe for use as a structured lookup key and may
/// repeat across fields within one schema. The storage type tag is carried
/// through untouched for the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamField {
    id: FieldId,
    internal_name: String,
    type_name: String,
}

impl ParamField {
    pub fn new(internal_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: FieldId(Uuid::new_v4()),
            internal_name: internal_name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// The in-memory, already-parsed definition of a record layout supplied by
/// the binary-schema subsystem: an ordered sequence of fields.
///
/// Field order is storage order and is never rearranged by this crate;
/// presentation reordering happens on the metadata side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSchema {
    id: SchemaId,
    name: String,
    fields: Vec<ParamField>,
}

impl ParamSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SchemaId(Uuid::new_v4()),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Parses a schema the host already serialized as JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn add_field(&mut self, field: ParamField) {
        self.fields.push(field);
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<ParamField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[ParamField] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structurally_identical_schemas_are_distinct_identities() {
        let a = ParamSchema::new("EquipParam").with_fields(vec![ParamField::new("id", "u32")]);
        let b = ParamSchema::new("EquipParam").with_fields(vec![ParamField::new("id", "u32")]);
        assert_ne!(a.id(), b.id());
        assert_ne!(a.fields()[0].id(), b.fields()[0].id());
    }

    #[test]
    fn add_field_preserves_order() {
        let mut schema = ParamSchema::new("NpcParam");
        schema.add_field(ParamField::new("hp", "i32"));
        schema.add_field(ParamField::new("hp", "i32"));
        schema.add_field(ParamField::new("team-type", "u8"));
        let names: Vec<_> = schema.fields().iter().map(ParamField::internal_name).collect();
        assert_eq!(names, ["hp", "hp", "team-type"]);
    }

    #[test]
    fn json_round_trip_keeps_identity() {
        let schema = ParamSchema::new("NpcParam").with_fields(vec![ParamField::new("hp", "i32")]);
        let json = serde_json::to_string(&schema).unwrap();
        let parsed = ParamSchema::from_json(&json).unwrap();
        assert_eq!(parsed.id(), schema.id());
        assert_eq!(parsed.fields()[0].id(), schema.fields()[0].id());
        assert_eq!(parsed.fields()[0].type_name(), "i32");
    }
}
