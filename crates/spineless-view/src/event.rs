//! Events
//!
//! Two event layers exist. Hierarchy events ([`Event`]) bubble upward from
//! view to view; interaction events ([`InputEvent`]) are dispatched at a
//! single element and drive the bound handlers declared by a view class.
//!
//! Bubbling contract: strictly upward, synchronous, and uncancelable. Once
//! emission starts, every ancestor's handlers for that name fire. There is
//! no unsubscribe either; callers needing removal must track state in their
//! handlers. Both are deliberate simplifications, kept as documented
//! limitations.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::runtime::Runtime;
use crate::scope::ViewScope;
use crate::ViewId;

/// Emitted on a parent after `add_child`
pub const CHILD_ADDED: &str = "ChildAdded";
/// Emitted on a child after `add_child`
pub const PARENT_ADDED: &str = "ParentAdded";
/// Emitted on the former parent after `remove_from_parent`, with the removed
/// view's id as payload
pub const CHILD_REMOVED: &str = "ChildRemoved";
/// Emitted on a view after `remove_from_parent`
pub const PARENT_REMOVED: &str = "ParentRemoved";
/// Emitted by `set` after a model write
pub const CHANGE: &str = "change";
/// Emitted after a sync transport completion
pub const SUCCESS: &str = "success";

/// A hierarchy event, as seen by a handler
#[derive(Debug, Clone)]
pub struct Event {
    /// Event name
    pub name: String,
    /// Emission arguments
    pub args: Vec<Value>,
    /// The view whose handler list this invocation came from
    pub target: ViewId,
    /// The view `emit` was called on
    pub emitter: ViewId,
}

/// A handler registered with `on`. Invoked with the runtime and the event;
/// `event.target` is the view it was registered on.
pub type Handler = Rc<dyn Fn(&mut Runtime, &Event)>;

/// A simulated native interaction event (this runtime is headless)
#[derive(Debug, Clone, Serialize)]
pub struct InputEvent {
    /// Interaction type: `"click"`, `"change"`, `"keyup"`, ...
    pub event_type: String,
    /// Key code, for keyboard events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<u32>,
    /// New control value, for input-like events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl InputEvent {
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            key: None,
            value: None,
        }
    }

    pub fn with_key(mut self, key: u32) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

/// Handler bound by a view class event declaration
pub type BindingHandler = Rc<dyn Fn(&mut ViewScope<'_>, &InputEvent)>;

/// A declared event binding: `"<eventType> <elementId>"` plus the handler to
/// run when that interaction reaches the referenced element.
#[derive(Clone)]
pub struct EventBinding {
    /// Binding spec, e.g. `"change input"`
    pub spec: String,
    pub handler: BindingHandler,
}

impl EventBinding {
    pub fn new(
        spec: &str,
        handler: impl Fn(&mut ViewScope<'_>, &InputEvent) + 'static,
    ) -> Self {
        Self {
            spec: spec.to_string(),
            handler: Rc::new(handler),
        }
    }

    /// Split the spec into `(event_type, element_id)`. `None` when the spec
    /// is not exactly two words.
    pub(crate) fn parse(&self) -> Option<(&str, &str)> {
        let mut parts = self.spec.split_whitespace();
        let event_type = parts.next()?;
        let element = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some((event_type, element))
    }
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBinding").field("spec", &self.spec).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_spec_parse() {
        let binding = EventBinding::new("change input", |_, _| {});
        assert_eq!(binding.parse(), Some(("change", "input")));

        let bad = EventBinding::new("change", |_, _| {});
        assert_eq!(bad.parse(), None);

        let worse = EventBinding::new("click a b", |_, _| {});
        assert_eq!(worse.parse(), None);
    }

    #[test]
    fn test_input_event_serializes_compactly() {
        let ev = InputEvent::new("keyup").with_key(13);
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["event_type"], "keyup");
        assert_eq!(json["key"], 13);
        assert!(json.get("value").is_none());
    }
}
