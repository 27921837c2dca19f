//! View operation scope
//!
//! Class operations (`init`, `render`, bound event handlers, ...) run
//! against a [`ViewScope`]: the runtime borrowed mutably, focused on one
//! view. It carries the conveniences an operation body needs (model
//! access, captured element lookups, emission, hierarchy edits) without
//! the operation having to thread ids around.

use serde_json::{Map, Value};
use spineless_dom::{DomTree, NodeId};

use crate::model::Model;
use crate::runtime::Runtime;
use crate::ViewId;

/// A mutable runtime borrow focused on one view
pub struct ViewScope<'a> {
    rt: &'a mut Runtime,
    id: ViewId,
}

impl<'a> ViewScope<'a> {
    pub(crate) fn new(rt: &'a mut Runtime, id: ViewId) -> Self {
        Self { rt, id }
    }

    /// The view this scope is focused on
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Escape hatch to the whole runtime
    pub fn runtime(&mut self) -> &mut Runtime {
        self.rt
    }

    pub fn dom(&self) -> &DomTree {
        self.rt.dom()
    }

    pub fn dom_mut(&mut self) -> &mut DomTree {
        self.rt.dom_mut()
    }

    /// The view's model
    pub fn model(&self) -> &Model {
        self.rt.record(self.id).model()
    }

    /// Direct model access; writes here do not emit `change`
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.rt.record_mut(self.id).model
    }

    /// Model value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.model().get(key)
    }

    /// Write a model key and emit `change` (the single change-event
    /// convention; no further data binding exists)
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.rt.set(self.id, key, value.into());
    }

    /// Instance props
    pub fn props(&self) -> &Map<String, Value> {
        self.rt.record(self.id).props()
    }

    /// Element captured for a template `id`
    pub fn el(&self, id: &str) -> Option<NodeId> {
        self.rt.record(self.id).element(id)
    }

    /// Element tracked for a template `form` key
    pub fn form_field(&self, key: &str) -> Option<NodeId> {
        self.rt.record(self.id).form_field(key)
    }

    /// Root element of this view's compiled subtree
    pub fn container(&self) -> NodeId {
        self.rt.record(self.id).container()
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.rt.record(self.id).parent()
    }

    /// Child views, in order
    pub fn children(&self) -> Vec<ViewId> {
        self.rt.record(self.id).children().to_vec()
    }

    /// Emit an event from this view; bubbles to the root
    pub fn emit(&mut self, name: &str, args: Vec<Value>) {
        self.rt.emit(self.id, name, args);
    }

    /// Adopt a child view
    pub fn add_child(&mut self, child: ViewId) {
        self.rt.add_child(self.id, child);
    }

    /// Detach this view from its parent and the live tree
    pub fn remove_from_parent(&mut self) {
        self.rt.remove_from_parent(self.id);
    }

    /// Queue another render pass for this view
    pub fn schedule_render(&mut self) {
        self.rt.schedule_render(self.id);
    }

    /// Set rendered text on a captured element; unknown refs degrade to a
    /// warning
    pub fn set_text(&mut self, ref_id: &str, text: &str) {
        let Some(node) = self.el(ref_id) else {
            tracing::warn!(ref_id, "set_text on unknown template id, skipped");
            return;
        };
        if let Err(error) = self.rt.dom_mut().set_text(node, text) {
            tracing::warn!(ref_id, %error, "set_text failed");
        }
    }

    /// Set an attribute on a captured element
    pub fn set_attr(&mut self, ref_id: &str, name: &str, value: &str) {
        let Some(node) = self.el(ref_id) else {
            tracing::warn!(ref_id, "set_attr on unknown template id, skipped");
            return;
        };
        if let Err(error) = self.rt.dom_mut().set_attr(node, name, value) {
            tracing::warn!(ref_id, %error, "set_attr failed");
        }
    }

    /// Remove an attribute from a captured element
    pub fn remove_attr(&mut self, ref_id: &str, name: &str) {
        let Some(node) = self.el(ref_id) else { return };
        if let Err(error) = self.rt.dom_mut().remove_attr(node, name) {
            tracing::warn!(ref_id, %error, "remove_attr failed");
        }
    }

    /// Live value of a captured form control
    pub fn value(&self, ref_id: &str) -> String {
        match self.el(ref_id) {
            Some(node) => self.rt.dom().value(node),
            None => String::new(),
        }
    }

    /// Set the value of a captured form control
    pub fn set_value(&mut self, ref_id: &str, value: &str) {
        self.set_attr(ref_id, "value", value);
    }
}
