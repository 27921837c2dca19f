//! View classes and the extension mechanism
//!
//! The original design of this kind of framework leans on prototype chains
//! and an ad-hoc `super`. Here the capability set is a trait: a "class" is
//! any [`ViewClass`] value, and subclassing is explicit composition: a
//! [`Subclass`] wraps a parent class and replaces whole operations.
//!
//! Super semantics (one consistent scheme, no hybrid): an override receives
//! the *immediate parent class* and may call any of its operations directly,
//! bound to the current instance's scope. Overrides fully replace;
//! unoverridden operations delegate to the parent. Nothing chains
//! implicitly, so no operation ever runs twice during construction.

use std::rc::Rc;

use serde_json::Value;
use spineless_template::TemplateNode;

use crate::event::EventBinding;
use crate::model::Model;
use crate::scope::ViewScope;
use crate::sync::SyncResponse;

/// The capability set of a view class.
///
/// Every operation has a valid default: an empty template renders nothing
/// (a configuration defect the runtime warns about), `render` is a no-op,
/// `unserialize` is an extension point for application code.
pub trait ViewClass {
    /// Declared model defaults
    fn defaults(&self) -> Model {
        Model::new()
    }

    /// Declarative template, compiled at construction
    fn template(&self) -> Vec<TemplateNode> {
        Vec::new()
    }

    /// Declared event bindings, wired at construction
    fn events(&self) -> Vec<EventBinding> {
        Vec::new()
    }

    /// Post-construction hook; runs once, synchronously, after the view is
    /// fully wired and its first render has been scheduled
    fn init(&self, scope: &mut ViewScope<'_>) {
        let _ = scope;
    }

    /// Render pass; first invocation is deferred to the task queue
    fn render(&self, scope: &mut ViewScope<'_>) {
        let _ = scope;
    }

    /// Advisory validation; `Some(message)` flags the view as invalid
    fn validate(&self, scope: &mut ViewScope<'_>) -> Option<String> {
        let _ = scope;
        None
    }

    /// Rehydrate from a decoded model blob. Base is a no-op; concrete views
    /// decide how to rebuild themselves and their children.
    fn unserialize(&self, scope: &mut ViewScope<'_>, blob: &Value) {
        let _ = (scope, blob);
    }

    /// Called when a sync request completes, before the success events bubble
    fn success(&self, scope: &mut ViewScope<'_>, response: &SyncResponse) {
        let _ = (scope, response);
    }
}

/// The all-defaults base class
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseView;

impl ViewClass for BaseView {}

/// Begin extending a class. Returns a builder collecting overrides; finish
/// with [`SubclassBuilder::seal`].
pub fn extend<B: ViewClass>(base: B) -> SubclassBuilder<B> {
    SubclassBuilder {
        class: Subclass {
            base,
            defaults: None,
            template: None,
            events: None,
            init: None,
            render: None,
            validate: None,
            unserialize: None,
            success: None,
        },
    }
}

type OpFn<B> = Rc<dyn Fn(&B, &mut ViewScope<'_>)>;
type ValidateFn<B> = Rc<dyn Fn(&B, &mut ViewScope<'_>) -> Option<String>>;
type UnserializeFn<B> = Rc<dyn Fn(&B, &mut ViewScope<'_>, &Value)>;
type SuccessFn<B> = Rc<dyn Fn(&B, &mut ViewScope<'_>, &SyncResponse)>;

/// A derived class: a parent plus whole-operation overrides.
///
/// Implements [`ViewClass`] itself, so extension composes transitively and
/// to any depth.
#[derive(Clone)]
pub struct Subclass<B: ViewClass> {
    base: B,
    defaults: Option<Model>,
    template: Option<Vec<TemplateNode>>,
    events: Option<Vec<EventBinding>>,
    init: Option<OpFn<B>>,
    render: Option<OpFn<B>>,
    validate: Option<ValidateFn<B>>,
    unserialize: Option<UnserializeFn<B>>,
    success: Option<SuccessFn<B>>,
}

impl<B: ViewClass> Subclass<B> {
    /// The parent class
    pub fn base(&self) -> &B {
        &self.base
    }
}

impl<B: ViewClass> ViewClass for Subclass<B> {
    fn defaults(&self) -> Model {
        match &self.defaults {
            Some(defaults) => defaults.clone(),
            None => self.base.defaults(),
        }
    }

    fn template(&self) -> Vec<TemplateNode> {
        match &self.template {
            Some(template) => template.clone(),
            None => self.base.template(),
        }
    }

    fn events(&self) -> Vec<EventBinding> {
        match &self.events {
            Some(events) => events.clone(),
            None => self.base.events(),
        }
    }

    fn init(&self, scope: &mut ViewScope<'_>) {
        match &self.init {
            Some(op) => op(&self.base, scope),
            None => self.base.init(scope),
        }
    }

    fn render(&self, scope: &mut ViewScope<'_>) {
        match &self.render {
            Some(op) => op(&self.base, scope),
            None => self.base.render(scope),
        }
    }

    fn validate(&self, scope: &mut ViewScope<'_>) -> Option<String> {
        match &self.validate {
            Some(op) => op(&self.base, scope),
            None => self.base.validate(scope),
        }
    }

    fn unserialize(&self, scope: &mut ViewScope<'_>, blob: &Value) {
        match &self.unserialize {
            Some(op) => op(&self.base, scope, blob),
            None => self.base.unserialize(scope, blob),
        }
    }

    fn success(&self, scope: &mut ViewScope<'_>, response: &SyncResponse) {
        match &self.success {
            Some(op) => op(&self.base, scope, response),
            None => self.base.success(scope, response),
        }
    }
}

/// Collects declarative and behavioral overrides for a [`Subclass`].
///
/// Behavioral overrides receive `(&parent, scope)`; calling through the
/// parent reference is the explicit super call:
///
/// ```ignore
/// let item = extend(BaseView)
///     .on_render(|sup, scope| {
///         sup.render(scope); // super("render")
///         scope.set_text("label", "done");
///     })
///     .seal();
/// ```
pub struct SubclassBuilder<B: ViewClass> {
    class: Subclass<B>,
}

impl<B: ViewClass> SubclassBuilder<B> {
    /// Replace the declared defaults (no implicit merging with the parent's)
    pub fn defaults(mut self, defaults: Model) -> Self {
        self.class.defaults = Some(defaults);
        self
    }

    /// Replace the declared template
    pub fn template(mut self, template: Vec<TemplateNode>) -> Self {
        self.class.template = Some(template);
        self
    }

    /// Replace the declared event bindings
    pub fn events(mut self, events: Vec<EventBinding>) -> Self {
        self.class.events = Some(events);
        self
    }

    /// Override `init`
    pub fn on_init(mut self, op: impl Fn(&B, &mut ViewScope<'_>) + 'static) -> Self {
        self.class.init = Some(Rc::new(op));
        self
    }

    /// Override `render`
    pub fn on_render(mut self, op: impl Fn(&B, &mut ViewScope<'_>) + 'static) -> Self {
        self.class.render = Some(Rc::new(op));
        self
    }

    /// Override `validate`
    pub fn on_validate(
        mut self,
        op: impl Fn(&B, &mut ViewScope<'_>) -> Option<String> + 'static,
    ) -> Self {
        self.class.validate = Some(Rc::new(op));
        self
    }

    /// Override `unserialize`
    pub fn on_unserialize(
        mut self,
        op: impl Fn(&B, &mut ViewScope<'_>, &Value) + 'static,
    ) -> Self {
        self.class.unserialize = Some(Rc::new(op));
        self
    }

    /// Override `success`
    pub fn on_success(
        mut self,
        op: impl Fn(&B, &mut ViewScope<'_>, &SyncResponse) + 'static,
    ) -> Self {
        self.class.success = Some(Rc::new(op));
        self
    }

    /// Finish extension
    pub fn seal(self) -> Subclass<B> {
        self.class
    }
}
