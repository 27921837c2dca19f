//! View runtime
//!
//! Owns the element tree, the view arena and the task queue. Everything is
//! single-threaded and cooperative: construction, compilation and event
//! emission run to completion; the only deferral is the task queue, which
//! holds scheduled renders and sync completions until [`Runtime::run_until_idle`]
//! pumps them.
//!
//! View ids are arena indices and stay valid for the life of the runtime:
//! removed views keep their record (and their descendants' state), they are
//! just detached. That mirrors the teardown contract: `remove_from_parent`
//! severs hierarchy and DOM attachment, nothing more.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::{Map, Value, json};
use spineless_dom::{DocumentFragment, DomTree, NodeId};
use spineless_template::compile;

use crate::class::ViewClass;
use crate::event::{
    BindingHandler, CHANGE, CHILD_ADDED, CHILD_REMOVED, Event, Handler, InputEvent, PARENT_ADDED,
    PARENT_REMOVED, SUCCESS,
};
use crate::model::merge_defaults;
use crate::scope::ViewScope;
use crate::sync::{Completion, CompletionQueue, Method, SyncHandle, SyncRequest, Transport};
use crate::view::{Binding, RefCapture, View, ViewOptions};
use crate::{ViewError, ViewId};

/// Deferred work
enum Task {
    Render(ViewId),
}

/// The single-threaded view runtime
pub struct Runtime {
    dom: DomTree,
    views: Vec<View>,
    queue: VecDeque<Task>,
    completions: CompletionQueue,
    transport: Option<Box<dyn Transport>>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            dom: DomTree::new(),
            views: Vec::new(),
            queue: VecDeque::new(),
            completions: Rc::new(RefCell::new(VecDeque::new())),
            transport: None,
        }
    }

    /// The element tree
    pub fn dom(&self) -> &DomTree {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut DomTree {
        &mut self.dom
    }

    /// Install the network sync boundary
    pub fn set_transport(&mut self, transport: Box<dyn Transport>) {
        self.transport = Some(transport);
    }

    /// Number of views ever constructed
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Look up a view record
    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(id.0 as usize)
    }

    /// A scope focused on `id`, for driving a view from outside its class
    pub fn scope(&mut self, id: ViewId) -> Option<ViewScope<'_>> {
        if (id.0 as usize) < self.views.len() {
            Some(ViewScope::new(self, id))
        } else {
            None
        }
    }

    // Ids handed out by this runtime are always in range because the arena
    // never shrinks.
    pub(crate) fn record(&self, id: ViewId) -> &View {
        &self.views[id.0 as usize]
    }

    pub(crate) fn record_mut(&mut self, id: ViewId) -> &mut View {
        &mut self.views[id.0 as usize]
    }

    /// Construct a view of the given class.
    ///
    /// Performs the full wiring synchronously (model merge, template
    /// compilation, binding wiring, hierarchy placement), then schedules the
    /// first render on the task queue. Nothing paints until
    /// [`Runtime::run_until_idle`], so the caller can finish registering
    /// children and handlers on the returned id first.
    pub fn create(&mut self, class: impl ViewClass + 'static, opts: ViewOptions) -> ViewId {
        self.create_shared(Rc::new(class), opts)
    }

    /// Construct a view from a shared class (one class value, many views)
    pub fn create_shared(&mut self, class: Rc<dyn ViewClass>, opts: ViewOptions) -> ViewId {
        let ViewOptions {
            parent,
            superview,
            mut props,
        } = opts;

        // hierarchy placement: default mount point is the parent's container
        let superview =
            superview.or_else(|| parent.and_then(|p| self.view(p).map(|v| v.container)));

        // model: defaults overridden by matching options, which are consumed
        let defaults = class.defaults();
        let model = merge_defaults(&defaults, &mut props);
        let url = props
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string);

        // compile the template into a fresh container element
        let container = self.dom.create_element("div");
        let _ = self.dom.set_attr(container, "class", "container");

        let template = class.template();
        if template.is_empty() {
            tracing::warn!("view class declares no template; view will render nothing");
        }
        let mut capture = RefCapture::default();
        for node in &template {
            if let Err(error) = compile(&mut self.dom, Some(&mut capture), node, Some(container)) {
                tracing::warn!(%error, "template compilation failed, continuing with partial view");
            }
        }

        // wire declared bindings against the captured elements
        let mut bindings = Vec::new();
        for declared in class.events() {
            match declared.parse() {
                Some((event_type, element)) => match capture.refs.get(element) {
                    Some(&node) => bindings.push(Binding {
                        event_type: event_type.to_string(),
                        node,
                        handler: Rc::clone(&declared.handler),
                    }),
                    None => tracing::warn!(
                        spec = %declared.spec,
                        "event binding references unknown element id, skipped"
                    ),
                },
                None => {
                    tracing::warn!(spec = %declared.spec, "malformed event binding spec, skipped")
                }
            }
        }

        let mut fragment = DocumentFragment::new();
        fragment.append(container);

        let id = ViewId(self.views.len() as u32);
        self.views.push(View {
            class: Rc::clone(&class),
            parent: None,
            superview,
            children: Vec::new(),
            model,
            props,
            url,
            container,
            fragment,
            refs: capture.refs,
            form_fields: capture.form_fields,
            handlers: HashMap::new(),
            bindings,
            mounted: false,
        });

        // child lists and parent pointers stay mutually consistent, so a
        // parent option performs a full adoption
        if let Some(parent) = parent {
            self.add_child(parent, id);
        }

        // defer first render (and the mount that follows it) to the queue
        self.queue.push_back(Task::Render(id));
        tracing::debug!(view = id.0, "view constructed");

        class.init(&mut ViewScope::new(self, id));
        id
    }

    /// Queue a render pass for a view
    pub fn schedule_render(&mut self, id: ViewId) {
        if (id.0 as usize) < self.views.len() {
            self.queue.push_back(Task::Render(id));
        }
    }

    /// Pump the task queue until nothing is pending: scheduled renders
    /// first, then sync completions, interleaving as new work arrives.
    pub fn run_until_idle(&mut self) {
        loop {
            if let Some(task) = self.queue.pop_front() {
                match task {
                    Task::Render(id) => self.run_render(id),
                }
                continue;
            }
            let completion = self.completions.borrow_mut().pop_front();
            match completion {
                Some(completion) => self.deliver(completion),
                None => break,
            }
        }
    }

    fn run_render(&mut self, id: ViewId) {
        let Some(view) = self.views.get(id.0 as usize) else {
            return;
        };
        let class = Rc::clone(&view.class);
        class.render(&mut ViewScope::new(self, id));

        // mount after the first render so the pass sees a detached subtree
        let (superview, mounted) = {
            let view = self.record(id);
            (view.superview, view.mounted)
        };
        if let (Some(superview), false) = (superview, mounted) {
            let fragment = self.record(id).fragment.clone();
            if let Err(error) = fragment.mount(&mut self.dom, superview) {
                tracing::warn!(view = id.0, %error, "mount under superview failed");
            } else {
                self.record_mut(id).mounted = true;
                tracing::trace!(view = id.0, "view mounted");
            }
        }
    }

    /// Adopt `child` into `parent`'s child list and emit the hierarchy
    /// events. A child already owned elsewhere is moved, not duplicated.
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) {
        if self.view(parent).is_none() || self.view(child).is_none() {
            tracing::warn!("add_child with unknown view id, skipped");
            return;
        }
        if parent == child || self.is_view_ancestor(child, parent) {
            tracing::warn!("add_child would create a hierarchy cycle, skipped");
            return;
        }

        if let Some(old_parent) = self.record(child).parent {
            self.record_mut(old_parent).children.retain(|&c| c != child);
        }
        self.record_mut(parent).children.push(child);
        self.record_mut(child).parent = Some(parent);

        self.emit(parent, CHILD_ADDED, Vec::new());
        self.emit(child, PARENT_ADDED, Vec::new());
    }

    fn is_view_ancestor(&self, ancestor: ViewId, view: ViewId) -> bool {
        let mut current = self.record(view).parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.record(id).parent;
        }
        false
    }

    /// Detach a view: removed from its parent's child list (by identity)
    /// and its container leaves the live tree. Descendants keep their
    /// internal state; only the DOM attachment is severed. With no parent,
    /// this degrades to the DOM detach alone.
    pub fn remove_from_parent(&mut self, view: ViewId) {
        let Some(record) = self.view(view) else {
            tracing::warn!("remove_from_parent with unknown view id, skipped");
            return;
        };
        let container = record.container;
        let parent = record.parent;

        self.dom.detach(container);
        self.record_mut(view).mounted = false;

        let Some(parent) = parent else { return };
        self.record_mut(parent).children.retain(|&c| c != view);
        self.record_mut(view).parent = None;

        self.emit(parent, CHILD_REMOVED, vec![Value::from(view.0)]);
        self.emit(view, PARENT_REMOVED, vec![Value::from(parent.0)]);
    }

    /// Register a listener on one view. Ancestors and descendants are
    /// unaffected. There is no unsubscribe in this design.
    pub fn on(&mut self, view: ViewId, event: &str, handler: impl Fn(&mut Runtime, &Event) + 'static) {
        let Some(record) = self.views.get_mut(view.0 as usize) else {
            tracing::warn!("on() with unknown view id, skipped");
            return;
        };
        record
            .handlers
            .entry(event.to_string())
            .or_default()
            .push(Rc::new(handler));
    }

    /// Emit an event from `view`, bubbling strictly upward: handlers here
    /// first (in registration order), then at the parent, up to the root.
    /// Synchronous, uncancelable, re-entrancy unguarded. The handler list at
    /// each node is snapshotted before invocation; the walk reads the live
    /// parent pointer after each level, so a handler that detaches the view
    /// stops the climb there.
    pub fn emit(&mut self, view: ViewId, name: &str, args: Vec<Value>) {
        let mut current = Some(view);
        while let Some(id) = current {
            let Some(record) = self.views.get(id.0 as usize) else {
                break;
            };
            let handlers: Vec<Handler> = record.handlers.get(name).cloned().unwrap_or_default();
            for handler in handlers {
                let event = Event {
                    name: name.to_string(),
                    args: args.clone(),
                    target: id,
                    emitter: view,
                };
                handler(self, &event);
            }
            current = self.views.get(id.0 as usize).and_then(|r| r.parent);
        }
    }

    /// Write a model key and emit `change` with the key as payload
    pub fn set(&mut self, view: ViewId, key: &str, value: Value) {
        let Some(record) = self.views.get_mut(view.0 as usize) else {
            tracing::warn!("set() with unknown view id, skipped");
            return;
        };
        record.model.insert(key.to_string(), value);
        self.emit(view, CHANGE, vec![Value::String(key.to_string())]);
    }

    /// Recursive plain-data snapshot: a shallow copy of the model, plus a
    /// `children` array of each child's snapshot when the view has any.
    pub fn get_model(&self, view: ViewId) -> Value {
        let Some(record) = self.view(view) else {
            return Value::Null;
        };
        let mut model = record.model.clone();
        if !record.children.is_empty() {
            let children: Vec<Value> = record
                .children
                .iter()
                .map(|&child| self.get_model(child))
                .collect();
            model.insert("children".to_string(), Value::Array(children));
        }
        Value::Object(model)
    }

    /// JSON encoding of [`Runtime::get_model`]; pure in the current state
    pub fn serialize(&self, view: ViewId) -> Result<String, ViewError> {
        if self.view(view).is_none() {
            return Err(ViewError::UnknownView(view.0));
        }
        Ok(serde_json::to_string(&self.get_model(view))?)
    }

    /// Decode a blob and hand it to the view class's `unserialize` extension
    /// point (base classes ignore it)
    pub fn unserialize(&mut self, view: ViewId, blob: &str) -> Result<(), ViewError> {
        let Some(record) = self.view(view) else {
            return Err(ViewError::UnknownView(view.0));
        };
        let class = Rc::clone(&record.class);
        let value: Value = serde_json::from_str(blob)?;
        class.unserialize(&mut ViewScope::new(self, view), &value);
        Ok(())
    }

    /// Run the view class's advisory validation
    pub fn validate(&mut self, view: ViewId) -> Option<String> {
        let record = self.view(view)?;
        let class = Rc::clone(&record.class);
        class.validate(&mut ViewScope::new(self, view))
    }

    /// Instance props merged with the live current value of every tracked
    /// form field (fields win on collision). Values are read at call time.
    pub fn form_data(&self, view: ViewId) -> Map<String, Value> {
        let Some(record) = self.view(view) else {
            return Map::new();
        };
        let mut data = record.props.clone();
        for (key, &node) in &record.form_fields {
            data.insert(key.clone(), Value::String(self.dom.value(node)));
        }
        data
    }

    /// Hand a request to the installed transport. The completion arrives
    /// through the task queue: the class's `success` runs, then `success`
    /// and `"<METHOD>:success"` bubble with `{method, url, data}`.
    pub fn sync(&mut self, view: ViewId, method: Method, url: &str, data: Map<String, Value>) {
        tracing::debug!(method = method.as_str(), url, "sync request");
        let request = SyncRequest {
            method,
            url: url.to_string(),
            data,
        };
        let handle = SyncHandle::new(Rc::clone(&self.completions), view, request.clone());
        match &mut self.transport {
            Some(transport) => transport.send(request, handle),
            None => tracing::warn!(url, "no transport installed, sync request dropped"),
        }
    }

    /// POST the view's form data to its url
    pub fn post(&mut self, view: ViewId) {
        self.sync_with_url(view, Method::Post);
    }

    /// DELETE with the view's form data at its url
    pub fn delete(&mut self, view: ViewId) {
        self.sync_with_url(view, Method::Delete);
    }

    fn sync_with_url(&mut self, view: ViewId, method: Method) {
        let Some(url) = self.view(view).and_then(|v| v.url.clone()) else {
            tracing::warn!(method = method.as_str(), "view has no url, sync skipped");
            return;
        };
        let data = self.form_data(view);
        self.sync(view, method, &url, data);
    }

    fn deliver(&mut self, completion: Completion) {
        let Completion {
            view,
            request,
            response,
        } = completion;
        let Some(record) = self.view(view) else {
            return;
        };
        let class = Rc::clone(&record.class);
        class.success(&mut ViewScope::new(self, view), &response);

        let payload = json!({
            "method": request.method.as_str(),
            "url": request.url,
            "data": request.data,
        });
        self.emit(view, SUCCESS, vec![payload.clone()]);
        let scoped = format!("{}:success", request.method.as_str());
        self.emit(view, &scoped, vec![payload]);
    }

    /// Deliver a simulated interaction event at an element.
    ///
    /// Every live binding for that element and type runs (with the event's
    /// value written to the control first, so handlers read current state),
    /// then `"input:<type>"` bubbles from the bound view carrying the event.
    pub fn dispatch(&mut self, node: NodeId, event: InputEvent) {
        if let Some(value) = &event.value {
            if let Err(error) = self.dom.set_value(node, value) {
                tracing::warn!(%error, "dispatch could not write control value");
            }
        }

        let mut matches: Vec<(ViewId, BindingHandler)> = Vec::new();
        for (index, view) in self.views.iter().enumerate() {
            for binding in &view.bindings {
                if binding.node == node && binding.event_type == event.event_type {
                    matches.push((ViewId(index as u32), Rc::clone(&binding.handler)));
                }
            }
        }
        if matches.is_empty() {
            tracing::trace!(event_type = %event.event_type, "dispatch matched no bindings");
        }

        for (view, handler) in matches {
            handler(&mut ViewScope::new(self, view), &event);
            let payload = serde_json::to_value(&event).unwrap_or(Value::Null);
            let name = format!("input:{}", event.event_type);
            self.emit(view, &name, vec![payload]);
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
