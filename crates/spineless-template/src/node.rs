//! Template nodes
//!
//! Plain-data description of one element and its children. Author-authored,
//! JSON-compatible, and deliberately loose: any key outside the reserved set
//! travels in `attrs` and ends up as a literal attribute.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative description of one element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateNode {
    /// Element tag; a generic `div` container when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Compiler directive: capture the compiled element on the owner under
    /// this name. Never rendered as an attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Applied via the `class` attribute
    #[serde(default, rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Rendered text content (never parsed as markup)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Compiler directive: track the compiled element as a form field under
    /// this key. Never rendered as an attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,

    /// Child nodes, in render order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TemplateNode>,

    /// Every unreserved key, applied verbatim as attributes
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

impl TemplateNode {
    /// Start a node with an explicit tag
    pub fn new(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            ..Self::default()
        }
    }

    /// Start a generic container node
    pub fn container() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class_name(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn form(mut self, key: &str) -> Self {
        self.form = Some(key.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = TemplateNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Effective tag name
    pub fn tag_name(&self) -> &str {
        self.tag.as_deref().unwrap_or("div")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unreserved_keys_land_in_attrs() {
        let node: TemplateNode = serde_json::from_value(json!({
            "tag": "input",
            "id": "name",
            "type": "checkbox",
            "autofocus": true
        }))
        .unwrap();

        assert_eq!(node.tag_name(), "input");
        assert_eq!(node.id.as_deref(), Some("name"));
        assert_eq!(node.attrs.get("type"), Some(&json!("checkbox")));
        assert_eq!(node.attrs.get("autofocus"), Some(&json!(true)));
        assert!(!node.attrs.contains_key("id"), "reserved keys never reach attrs");
    }

    #[test]
    fn test_missing_tag_defaults_to_div() {
        let node: TemplateNode = serde_json::from_value(json!({"className": "view"})).unwrap();
        assert_eq!(node.tag_name(), "div");
        assert_eq!(node.class_name.as_deref(), Some("view"));
    }

    #[test]
    fn test_children_deserialize_in_order() {
        let node: TemplateNode = serde_json::from_value(json!({
            "tag": "ul",
            "children": [
                {"tag": "li", "text": "a"},
                {"tag": "li", "text": "b"}
            ]
        }))
        .unwrap();

        let texts: Vec<&str> = node
            .children
            .iter()
            .map(|c| c.text.as_deref().unwrap())
            .collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_builder_matches_json_form() {
        let built = TemplateNode::new("label")
            .child(TemplateNode::new("span").id("label").class_name("label-text"))
            .child(TemplateNode::new("input").id("input").form("value"));

        assert_eq!(built.children.len(), 2);
        assert_eq!(built.children[1].form.as_deref(), Some("value"));
    }

    #[test]
    fn test_non_object_fails_fast() {
        assert!(crate::parse("5").is_err());
        assert!(crate::parse("\"div\"").is_err());
        assert!(crate::parse("{\"tag\": \"ul\"}").is_ok());
    }
}
