//! Overlay-document parsing and field matching.
//!
//! The document names fields by *sanitized* internal name, which is lossy:
//! two distinct fields can sanitize to the same key. Matching is therefore
//! positional within a key — the Nth schema field carrying a key consumes
//! the Nth document node filed under that key. Document authors annotating
//! a schema with duplicate internal names must order those entries in
//! schema field order; this is a first-class contract of the format.

use std::collections::HashMap;

use log::{debug, warn};
use roxmltree::{Document, Node};

use crate::schema::ParamSchema;

use super::types::{EnumTable, FieldMeta, LoadWarning, MetaError};

/// The single overlay-document format version this loader understands.
/// Documents declaring any other `XmlVersion` are rejected wholesale.
pub const META_FORMAT_VERSION: u32 = 0;

/// Everything read out of one overlay document, aligned to one schema:
/// `field_metas` holds one entry per schema field, in natural order.
pub(crate) struct ParsedMeta {
    pub offset_size: Option<u32>,
    pub display_order: Option<Vec<String>>,
    pub enums: HashMap<String, EnumTable>,
    pub field_metas: Vec<FieldMeta>,
    pub warnings: Vec<LoadWarning>,
}

impl ParsedMeta {
    /// The all-defaults result for a schema with no usable document.
    pub(crate) fn blank(schema: &ParamSchema, warnings: Vec<LoadWarning>) -> Self {
        Self {
            offset_size: None,
            display_order: None,
            enums: HashMap::new(),
            field_metas: schema.fields().iter().map(|_| FieldMeta::default()).collect(),
            warnings,
        }
    }
}

/// Reduces a free-form internal field name to a key safe for use as an XML
/// element name: every character outside `[A-Za-z0-9_]` is removed, and a
/// leading digit gets an underscore prepended.
pub(crate) fn sanitize_name(raw: &str) -> String {
    let mut key: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if key.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        key.insert(0, '_');
    }
    key
}

/// Parses one overlay document against `schema`.
///
/// Whole-document problems (syntax, root element, version, malformed `<Self>`
/// attributes) propagate as errors for the entry point to collapse into the
/// all-blank fallback. Per-enum and per-field problems degrade locally and
/// are recorded in the returned warnings.
pub(crate) fn parse_meta(text: &str, schema: &ParamSchema) -> Result<ParsedMeta, MetaError> {
    let doc = Document::parse(text).map_err(|e| MetaError::MalformedDocument {
        reason: e.to_string(),
    })?;
    let root = doc.root_element();
    if root.tag_name().name() != "PARAMMETA" {
        return Err(MetaError::MalformedDocument {
            reason: format!("unexpected root element '{}'", root.tag_name().name()),
        });
    }
    let version = root.attribute("XmlVersion").unwrap_or("");
    if version.trim().parse::<u32>().ok() != Some(META_FORMAT_VERSION) {
        return Err(MetaError::VersionMismatch {
            found: version.to_string(),
            expected: META_FORMAT_VERSION,
        });
    }

    let mut warnings = Vec::new();

    let mut offset_size = None;
    let mut display_order = None;
    if let Some(self_node) = child_element(root, "Self") {
        if let Some(raw) = self_node.attribute("OffsetSize") {
            let parsed = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| MetaError::FormatError {
                    attribute: "OffsetSize".to_string(),
                    value: raw.to_string(),
                })?;
            offset_size = Some(parsed);
        }
        if let Some(raw) = self_node.attribute("AlternativeOrder") {
            display_order = Some(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }
    }

    let enums = parse_enums(root, &mut warnings);
    let field_metas = match_fields(root, schema, &enums, &mut warnings);

    Ok(ParsedMeta {
        offset_size,
        display_order,
        enums,
        field_metas,
        warnings,
    })
}

/// Reads every enum definition under `<Enums>`. A malformed enum is skipped;
/// a duplicated name keeps the last definition. Both degrade with a warning.
fn parse_enums(root: Node<'_, '_>, warnings: &mut Vec<LoadWarning>) -> HashMap<String, EnumTable> {
    let mut enums = HashMap::new();
    let Some(enums_node) = child_element(root, "Enums") else {
        return enums;
    };
    for node in enums_node.children().filter(|n| n.is_element()) {
        match EnumTable::from_node(node) {
            Ok(table) => {
                if enums.contains_key(table.name()) {
                    warn!(
                        "enum '{}' defined more than once; keeping the last definition",
                        table.name()
                    );
                    warnings.push(LoadWarning::DuplicateEnum {
                        name: table.name().to_string(),
                    });
                }
                enums.insert(table.name().to_string(), table);
            }
            Err(err) => {
                let name = node.attribute("Name").unwrap_or("<unnamed>");
                warn!("skipping malformed enum '{name}': {err}");
                warnings.push(LoadWarning::MalformedEnum {
                    name: name.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
    enums
}

/// Resolves one metadata entry per schema field, in natural order.
///
/// The per-key occurrence counter advances on every attempt, matched or not,
/// so the Nth field sanitizing to a key always targets the Nth document node
/// under that key. A missing node yields blank metadata; a malformed one
/// yields blank metadata plus a warning. One bad annotation never touches
/// the other fields.
fn match_fields(
    root: Node<'_, '_>,
    schema: &ParamSchema,
    enums: &HashMap<String, EnumTable>,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<FieldMeta> {
    let field_section = child_element(root, "Field");
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut field_metas = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let key = sanitize_name(field.internal_name());
        let seen = occurrences.entry(key.clone()).or_insert(0);
        let index = *seen;
        *seen += 1;

        let node = field_section.and_then(|section| {
            section
                .children()
                .filter(|n| n.is_element() && n.tag_name().name() == key)
                .nth(index)
        });

        let meta = match node {
            None => {
                debug!(
                    "no meta entry for field '{}' (key '{key}', occurrence {index})",
                    field.internal_name()
                );
                FieldMeta::default()
            }
            Some(node) => match FieldMeta::from_node(node, enums) {
                Ok(meta) => meta,
                Err(err) => {
                    warn!(
                        "entry for field '{}' is unreadable, using defaults: {err}",
                        field.internal_name()
                    );
                    warnings.push(LoadWarning::MalformedFieldEntry {
                        field: field.internal_name().to_string(),
                        reason: err.to_string(),
                    });
                    FieldMeta::default()
                }
            },
        };
        field_metas.push(meta);
    }
    field_metas
}

fn child_element<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParamField;

    fn schema_with(names: &[&str]) -> ParamSchema {
        ParamSchema::new("TestParam")
            .with_fields(names.iter().map(|n| ParamField::new(*n, "u32")).collect())
    }

    #[test]
    fn sanitize_strips_unsafe_characters() {
        assert_eq!(sanitize_name("id"), "id");
        assert_eq!(sanitize_name("team-type"), "teamtype");
        assert_eq!(sanitize_name("hp [max]"), "hpmax");
        assert_eq!(sanitize_name("a_b_c"), "a_b_c");
        assert_eq!(sanitize_name("é1"), "_1");
    }

    #[test]
    fn sanitize_prepends_underscore_to_leading_digit() {
        assert_eq!(sanitize_name("1flag"), "_1flag");
        assert_eq!(sanitize_name("9"), "_9");
        assert_eq!(sanitize_name("_9"), "_9");
    }

    #[test]
    fn sanitize_of_fully_unsafe_name_is_empty() {
        assert_eq!(sanitize_name("!!!"), "");
    }

    #[test]
    fn rejects_wrong_root_element() {
        let schema = schema_with(&["id"]);
        let result = parse_meta(r#"<METADATA XmlVersion="0"/>"#, &schema);
        assert!(matches!(result, Err(MetaError::MalformedDocument { .. })));
    }

    #[test]
    fn rejects_version_mismatch() {
        let schema = schema_with(&["id"]);
        for doc in [
            r#"<PARAMMETA XmlVersion="1"/>"#,
            r#"<PARAMMETA XmlVersion="zero"/>"#,
            r#"<PARAMMETA/>"#,
        ] {
            let result = parse_meta(doc, &schema);
            assert!(matches!(result, Err(MetaError::VersionMismatch { .. })), "{doc}");
        }
    }

    #[test]
    fn rejects_malformed_xml() {
        let schema = schema_with(&["id"]);
        let result = parse_meta("not xml at all", &schema);
        assert!(matches!(result, Err(MetaError::MalformedDocument { .. })));
    }

    #[test]
    fn malformed_offset_size_is_a_format_error() {
        let schema = schema_with(&["id"]);
        let result = parse_meta(
            r#"<PARAMMETA XmlVersion="0"><Self OffsetSize="wide"/></PARAMMETA>"#,
            &schema,
        );
        assert!(matches!(
            result,
            Err(MetaError::FormatError { attribute, .. }) if attribute == "OffsetSize"
        ));
    }

    #[test]
    fn reads_self_attributes() {
        let schema = schema_with(&["id"]);
        let parsed = parse_meta(
            r#"<PARAMMETA XmlVersion="0">
                 <Self OffsetSize="100" AlternativeOrder="b, a,, c ,"/>
               </PARAMMETA>"#,
            &schema,
        )
        .unwrap();
        assert_eq!(parsed.offset_size, Some(100));
        assert_eq!(parsed.display_order.unwrap(), ["b", "a", "c"]);
    }

    #[test]
    fn missing_field_section_yields_all_blanks() {
        let schema = schema_with(&["id", "hp"]);
        let parsed = parse_meta(r#"<PARAMMETA XmlVersion="0"/>"#, &schema).unwrap();
        assert_eq!(parsed.field_metas.len(), 2);
        assert!(parsed.field_metas.iter().all(|m| *m == FieldMeta::default()));
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn occurrence_counter_advances_even_without_a_match() {
        // Only one <hp/> entry exists but three fields share the key; the
        // counter must still pair entry #1 with field #1.
        let schema = schema_with(&["hp", "hp", "hp"]);
        let parsed = parse_meta(
            r#"<PARAMMETA XmlVersion="0">
                 <Field><hp AltName="Hit Points"/></Field>
               </PARAMMETA>"#,
            &schema,
        )
        .unwrap();
        assert_eq!(parsed.field_metas[0].alt_name(), Some("Hit Points"));
        assert!(parsed.field_metas[1].alt_name().is_none());
        assert!(parsed.field_metas[2].alt_name().is_none());
    }

    #[test]
    fn malformed_enum_is_skipped_with_warning() {
        let schema = schema_with(&["id"]);
        let parsed = parse_meta(
            r#"<PARAMMETA XmlVersion="0">
                 <Enums>
                   <Enum Name="GOOD"><Option Value="0" Name="Zero"/></Enum>
                   <Enum Name="BAD"><Option Value="0"/></Enum>
                 </Enums>
               </PARAMMETA>"#,
            &schema,
        )
        .unwrap();
        assert!(parsed.enums.contains_key("GOOD"));
        assert!(!parsed.enums.contains_key("BAD"));
        assert!(matches!(
            parsed.warnings.as_slice(),
            [LoadWarning::MalformedEnum { name, .. }] if name == "BAD"
        ));
    }

    #[test]
    fn duplicate_enum_name_keeps_last_with_warning() {
        let schema = schema_with(&["id"]);
        let parsed = parse_meta(
            r#"<PARAMMETA XmlVersion="0">
                 <Enums>
                   <Enum Name="E"><Option Value="0" Name="First"/></Enum>
                   <Enum Name="E"><Option Value="0" Name="Second"/></Enum>
                 </Enums>
               </PARAMMETA>"#,
            &schema,
        )
        .unwrap();
        assert_eq!(parsed.enums["E"].label_for("0"), Some("Second"));
        assert!(matches!(
            parsed.warnings.as_slice(),
            [LoadWarning::DuplicateEnum { name }] if name == "E"
        ));
    }

    #[test]
    fn blank_parsed_meta_covers_every_field() {
        let schema = schema_with(&["a", "b", "c"]);
        let blank = ParsedMeta::blank(&schema, Vec::new());
        assert_eq!(blank.field_metas.len(), 3);
        assert!(blank.enums.is_empty());
    }
}
