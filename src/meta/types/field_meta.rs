use std::collections::HashMap;

use serde::Serialize;

use super::enum_table::EnumTable;
use super::errors::MetaError;

/// Merged presentation and semantic metadata for one schema field.
///
/// Every field in a loaded schema gets exactly one of these. A field whose
/// overlay entry is missing or unreadable gets the blank form ([`Default`]):
/// all optionals unset, `is_bool` false. Blank metadata is a valid,
/// fully-defaulted object, not absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldMeta {
    ref_types: Option<Vec<String>>,
    virtual_ref: Option<String>,
    enum_name: Option<String>,
    alt_name: Option<String>,
    wiki: Option<String>,
    is_bool: bool,
    order: Option<i32>,
}

impl FieldMeta {
    /// Builds populated metadata from one matched overlay node and the
    /// owning document's enum tables. Each attribute is independently
    /// optional.
    pub(crate) fn from_node(
        node: roxmltree::Node<'_, '_>,
        enums: &HashMap<String, EnumTable>,
    ) -> Result<Self, MetaError> {
        let mut meta = FieldMeta::default();

        if let Some(refs) = node.attribute("Refs") {
            meta.ref_types = Some(
                refs.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }

        meta.virtual_ref = node.attribute("VRef").map(String::from);

        // An enum name that does not resolve against the document's tables
        // is dropped, not surfaced.
        if let Some(name) = node.attribute("Enum") {
            if enums.contains_key(name) {
                meta.enum_name = Some(name.to_string());
            }
        }

        meta.alt_name = node.attribute("AltName").map(String::from);
        meta.wiki = node.attribute("Wiki").map(|w| w.replace("\\n", "\n"));

        // Presence-only flag: any value, including empty text, sets it.
        meta.is_bool = node.attribute("IsBool").is_some();

        if let Some(raw) = node.attribute("Order") {
            let parsed = raw
                .trim()
                .parse::<i32>()
                .map_err(|_| MetaError::FormatError {
                    attribute: "Order".to_string(),
                    value: raw.to_string(),
                })?;
            meta.order = Some(parsed);
        }

        Ok(meta)
    }

    /// Names of the schemas this field's value indexes into, when the field
    /// is a cross-schema reference. `Some(empty)` means the attribute was
    /// present but carried no usable names.
    pub fn ref_types(&self) -> Option<&[String]> {
        self.ref_types.as_deref()
    }

    /// Cross-schema grouping key independent of [`ref_types`](Self::ref_types).
    pub fn virtual_ref(&self) -> Option<&str> {
        self.virtual_ref.as_deref()
    }

    /// Name of the enum table bound to this field, resolvable through the
    /// owning [`SchemaMeta`](super::SchemaMeta). Lookup-only: the table
    /// lives with the owner.
    pub fn enum_name(&self) -> Option<&str> {
        self.enum_name.as_deref()
    }

    pub fn alt_name(&self) -> Option<&str> {
        self.alt_name.as_deref()
    }

    /// Multi-line help text, with escaped newlines already unescaped.
    pub fn wiki(&self) -> Option<&str> {
        self.wiki.as_deref()
    }

    /// Whether the stored value should be reinterpreted as a boolean.
    pub fn is_bool(&self) -> bool {
        self.is_bool
    }

    /// Per-field display-order override.
    pub fn order(&self) -> Option<i32> {
        self.order
    }

    /// The name to present for this field: the alternate name when set,
    /// the caller-supplied internal name otherwise.
    pub fn display_name<'a>(&'a self, internal_name: &'a str) -> &'a str {
        self.alt_name.as_deref().unwrap_or(internal_name)
    }
}
