//! Template -> element tree compiler
//!
//! One element per node, depth-first. Children are compiled and attached
//! before the node itself is attached to its own parent; reference capture
//! runs at the end of each node's frame, after its children, so on an id
//! collision between parent and child, the parent's capture wins.

use serde_json::Value;
use spineless_dom::{DomTree, NodeId};

use crate::TemplateNode;

/// Receiver for named references recorded during compilation.
///
/// The compiler knows nothing about views; owners implement this to collect
/// `id` and `form` captures.
pub trait RefSink {
    /// A node carried `id`; store the compiled element under that name.
    /// Collisions overwrite (last writer wins).
    fn capture_ref(&mut self, id: &str, node: NodeId);

    /// A node carried `form`; track the compiled element as a form field.
    fn capture_form(&mut self, key: &str, node: NodeId);
}

/// Compile a template node into `tree`, appending to `parent` when given.
///
/// Returns the root compiled element so callers can attach it themselves
/// when no parent is supplied. Touches nothing outside the nodes it creates.
pub fn compile(
    tree: &mut DomTree,
    mut owner: Option<&mut dyn RefSink>,
    node: &TemplateNode,
    parent: Option<NodeId>,
) -> Result<NodeId, crate::TemplateError> {
    let el = compile_inner(tree, &mut owner, node, parent)?;
    Ok(el)
}

fn compile_inner(
    tree: &mut DomTree,
    owner: &mut Option<&mut dyn RefSink>,
    node: &TemplateNode,
    parent: Option<NodeId>,
) -> Result<NodeId, crate::TemplateError> {
    let el = tree.create_element(node.tag_name());

    for (key, value) in &node.attrs {
        match coerce(value) {
            Some(text) => tree.set_attr(el, key, &text)?,
            None => {
                if !value.is_null() {
                    tracing::warn!(
                        attribute = %key,
                        "skipping non-scalar attribute value in template"
                    );
                }
            }
        }
    }

    if let Some(class_name) = &node.class_name {
        tree.set_attr(el, "class", class_name)?;
    }

    if let Some(text) = &node.text {
        tree.set_text(el, text)?;
    }

    for child in &node.children {
        compile_inner(tree, owner, child, Some(el))?;
    }

    if let Some(parent) = parent {
        tree.append_child(parent, el)?;
    }

    if let Some(sink) = owner {
        if let Some(id) = &node.id {
            sink.capture_ref(id, el);
        }
        if let Some(form) = &node.form {
            sink.capture_form(form, el);
        }
    }

    Ok(el)
}

/// String coercion for attribute values: scalars only. `null` and compound
/// values have no attribute rendering.
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Capture {
        refs: HashMap<String, NodeId>,
        forms: HashMap<String, NodeId>,
    }

    impl RefSink for Capture {
        fn capture_ref(&mut self, id: &str, node: NodeId) {
            self.refs.insert(id.to_string(), node);
        }

        fn capture_form(&mut self, key: &str, node: NodeId) {
            self.forms.insert(key.to_string(), node);
        }
    }

    fn template(value: Value) -> TemplateNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_one_element_per_node_in_order() {
        let mut tree = DomTree::new();
        let node = template(json!({
            "tag": "ul",
            "children": [
                {"tag": "li", "text": "a"},
                {"tag": "li", "text": "b"}
            ]
        }));

        let ul = compile(&mut tree, None, &node, None).unwrap();
        assert_eq!(tree.outer_html(ul), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_reserved_keys_never_become_attributes() {
        let mut tree = DomTree::new();
        let node = template(json!({
            "tag": "input",
            "id": "name",
            "form": "name",
            "type": "text",
            "placeholder": "your name"
        }));

        let el = compile(&mut tree, None, &node, None).unwrap();
        assert_eq!(tree.attr(el, "type").unwrap().as_deref(), Some("text"));
        assert_eq!(tree.attr(el, "placeholder").unwrap().as_deref(), Some("your name"));
        assert_eq!(tree.attr(el, "id").unwrap(), None);
        assert_eq!(tree.attr(el, "form").unwrap(), None);
    }

    #[test]
    fn test_class_name_applies_as_class() {
        let mut tree = DomTree::new();
        let node = template(json!({"className": "toggle active"}));

        let el = compile(&mut tree, None, &node, None).unwrap();
        assert_eq!(tree.attr(el, "class").unwrap().as_deref(), Some("toggle active"));
        assert_eq!(tree.get(el).unwrap().as_element().unwrap().tag, "div");
    }

    #[test]
    fn test_scalar_attribute_coercion() {
        let mut tree = DomTree::new();
        let node = template(json!({
            "tag": "input",
            "autofocus": true,
            "tabindex": 3,
            "data-skip": null,
            "data-bad": {"nested": 1}
        }));

        let el = compile(&mut tree, None, &node, None).unwrap();
        assert_eq!(tree.attr(el, "autofocus").unwrap().as_deref(), Some("true"));
        assert_eq!(tree.attr(el, "tabindex").unwrap().as_deref(), Some("3"));
        assert_eq!(tree.attr(el, "data-skip").unwrap(), None);
        assert_eq!(tree.attr(el, "data-bad").unwrap(), None);
    }

    #[test]
    fn test_reference_capture() {
        let mut tree = DomTree::new();
        let mut capture = Capture::default();
        let node = template(json!({
            "tag": "label",
            "children": [
                {"tag": "span", "id": "label"},
                {"tag": "input", "id": "input", "form": "value"}
            ]
        }));

        compile(&mut tree, Some(&mut capture), &node, None).unwrap();

        let input = capture.refs["input"];
        assert_eq!(tree.get(input).unwrap().as_element().unwrap().tag, "input");
        assert!(capture.refs.contains_key("label"));
        assert_eq!(capture.forms["value"], input);
    }

    #[test]
    fn test_id_collision_parent_frame_wins() {
        let mut tree = DomTree::new();
        let mut capture = Capture::default();
        let node = template(json!({
            "tag": "div",
            "id": "x",
            "children": [{"tag": "span", "id": "x"}]
        }));

        let parent = compile(&mut tree, Some(&mut capture), &node, None).unwrap();

        // capture runs after children, so the outer frame overwrites
        assert_eq!(capture.refs["x"], parent);
    }

    #[test]
    fn test_compile_into_parent() {
        let mut tree = DomTree::new();
        let host = tree.create_element("div");
        let node = template(json!({"tag": "p", "text": "hi"}));

        let p = compile(&mut tree, None, &node, Some(host)).unwrap();
        assert_eq!(tree.get(p).unwrap().parent, host);
        assert_eq!(tree.outer_html(host), "<div><p>hi</p></div>");
    }
}
