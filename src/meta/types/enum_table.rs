use std::collections::HashMap;

use serde::Serialize;

use super::errors::MetaError;

/// Named mapping from a field's raw stored value (as text) to a human
/// readable label, scoped to one overlay document.
///
/// Read-only after construction. A table only stores the legal values for
/// presentation; it never validates stored data against them.
#[derive(Debug, Clone, Serialize)]
pub struct EnumTable {
    name: String,
    values: HashMap<String, String>,
}

impl EnumTable {
    /// Builds a table from one `<Enum>` node.
    ///
    /// Every option entry must carry both a `Value` and a `Name` attribute;
    /// a missing attribute fails the whole table. Redefining a value within
    /// one table is last-write-wins.
    pub(crate) fn from_node(node: roxmltree::Node<'_, '_>) -> Result<Self, MetaError> {
        let name = node
            .attribute("Name")
            .ok_or_else(|| MetaError::MalformedDocument {
                reason: "enum definition missing Name attribute".to_string(),
            })?;

        let mut values = HashMap::new();
        for option in node.children().filter(|n| n.is_element()) {
            let value = option
                .attribute("Value")
                .ok_or_else(|| MetaError::MalformedDocument {
                    reason: format!("option in enum '{name}' missing Value attribute"),
                })?;
            let label = option
                .attribute("Name")
                .ok_or_else(|| MetaError::MalformedDocument {
                    reason: format!("option in enum '{name}' missing Name attribute"),
                })?;
            values.insert(value.to_string(), label.to_string());
        }

        Ok(Self {
            name: name.to_string(),
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up the human label for a raw stored value.
    pub fn label_for(&self, raw: &str) -> Option<&str> {
        self.values.get(raw).map(String::as_str)
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_enum(xml: &str) -> Result<EnumTable, MetaError> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        EnumTable::from_node(doc.root_element())
    }

    #[test]
    fn builds_value_to_label_mapping() {
        let table = parse_enum(
            r#"<Enum Name="ON_OFF">
                 <Option Value="0" Name="Off"/>
                 <Option Value="1" Name="On"/>
               </Enum>"#,
        )
        .unwrap();

        assert_eq!(table.name(), "ON_OFF");
        assert_eq!(table.len(), 2);
        assert_eq!(table.label_for("0"), Some("Off"));
        assert_eq!(table.label_for("1"), Some("On"));
        assert_eq!(table.label_for("2"), None);
    }

    #[test]
    fn missing_enum_name_fails() {
        let result = parse_enum(r#"<Enum><Option Value="0" Name="Off"/></Enum>"#);
        assert!(matches!(result, Err(MetaError::MalformedDocument { .. })));
    }

    #[test]
    fn option_missing_value_fails() {
        let result = parse_enum(r#"<Enum Name="E"><Option Name="Off"/></Enum>"#);
        assert!(matches!(result, Err(MetaError::MalformedDocument { .. })));
    }

    #[test]
    fn option_missing_label_fails() {
        let result = parse_enum(r#"<Enum Name="E"><Option Value="0"/></Enum>"#);
        assert!(matches!(result, Err(MetaError::MalformedDocument { .. })));
    }

    #[test]
    fn redefined_value_is_last_write_wins() {
        let table = parse_enum(
            r#"<Enum Name="E">
                 <Option Value="0" Name="First"/>
                 <Option Value="0" Name="Second"/>
               </Enum>"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.label_for("0"), Some("Second"));
    }

    #[test]
    fn empty_enum_is_valid() {
        let table = parse_enum(r#"<Enum Name="EMPTY"/>"#).unwrap();
        assert!(table.is_empty());
    }
}
