//! View instances
//!
//! A view combines a compiled element subtree, a model, child views and
//! event handlers. Instances live in the runtime's arena; this module holds
//! the record itself plus the construction options.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Map, Value};
use spineless_dom::{DocumentFragment, NodeId};
use spineless_template::RefSink;

use crate::class::ViewClass;
use crate::event::{BindingHandler, Handler};
use crate::model::Model;
use crate::ViewId;

/// Construction options: the revision with an options object, so hierarchy
/// placement and leftover props travel together, and DOM attachment is
/// deferred to the scheduled first render.
#[derive(Default)]
pub struct ViewOptions {
    /// Owning view in the hierarchy
    pub parent: Option<ViewId>,
    /// Element to mount the compiled subtree under. Defaults to the parent's
    /// container when a parent is given.
    pub superview: Option<NodeId>,
    /// Configuration values; keys matching declared defaults are consumed
    /// into the model, the rest stay as instance props
    pub props: Map<String, Value>,
}

impl ViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(mut self, parent: ViewId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_superview(mut self, superview: NodeId) -> Self {
        self.superview = Some(superview);
        self
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn with_props(mut self, props: Map<String, Value>) -> Self {
        self.props.extend(props);
        self
    }
}

/// An event binding wired to a concrete element
pub(crate) struct Binding {
    pub event_type: String,
    pub node: NodeId,
    pub handler: BindingHandler,
}

/// A live view record
pub struct View {
    pub(crate) class: Rc<dyn ViewClass>,
    /// Non-owning back-reference into the hierarchy
    pub(crate) parent: Option<ViewId>,
    /// Element the fragment mounts under at first render
    pub(crate) superview: Option<NodeId>,
    /// Owned child views, in add order
    pub(crate) children: Vec<ViewId>,
    /// Observable state
    pub(crate) model: Model,
    /// Options left over after the defaults merge
    pub(crate) props: Map<String, Value>,
    /// Sync endpoint, when the view has one
    pub(crate) url: Option<String>,
    /// Root element wrapping the compiled template
    pub(crate) container: NodeId,
    /// Detached roots until mounted
    pub(crate) fragment: DocumentFragment,
    /// Template `id` captures: declared name -> element
    pub(crate) refs: HashMap<String, NodeId>,
    /// Template `form` captures: form key -> element
    pub(crate) form_fields: HashMap<String, NodeId>,
    /// Listeners registered on this node, per event name
    pub(crate) handlers: HashMap<String, Vec<Handler>>,
    /// Wired event bindings
    pub(crate) bindings: Vec<Binding>,
    pub(crate) mounted: bool,
}

impl View {
    /// Hierarchy parent
    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    /// Child views, in order
    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    /// The view's model
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Instance props (options not consumed by the defaults merge)
    pub fn props(&self) -> &Map<String, Value> {
        &self.props
    }

    /// Root element of the compiled subtree
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Element captured for a template `id`
    pub fn element(&self, id: &str) -> Option<NodeId> {
        self.refs.get(id).copied()
    }

    /// Element tracked for a template `form` key
    pub fn form_field(&self, key: &str) -> Option<NodeId> {
        self.form_fields.get(key).copied()
    }

    /// Sync endpoint
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether the fragment has been attached under its superview
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

/// Collects template captures during compilation, then lands them on the
/// view record. Kept separate so the tree can be borrowed mutably while
/// captures accumulate.
#[derive(Default)]
pub(crate) struct RefCapture {
    pub refs: HashMap<String, NodeId>,
    pub form_fields: HashMap<String, NodeId>,
}

impl RefSink for RefCapture {
    fn capture_ref(&mut self, id: &str, node: NodeId) {
        if let Some(previous) = self.refs.insert(id.to_string(), node) {
            tracing::warn!(id = %id, ?previous, "duplicate template id, reference overwritten");
        }
    }

    fn capture_form(&mut self, key: &str, node: NodeId) {
        if let Some(previous) = self.form_fields.insert(key.to_string(), node) {
            tracing::warn!(key = %key, ?previous, "duplicate form key, field overwritten");
        }
    }
}
