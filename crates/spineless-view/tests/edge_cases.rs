//! Edge cases for spineless-view
//!
//! Degradation paths: configuration defects must produce a partial view,
//! never a crash, and runtime lookup misses are no-ops.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};
use spineless_template::TemplateNode;
use spineless_view::{
    BaseView, EventBinding, InputEvent, Method, Model, Runtime, ViewOptions, extend,
};

fn model(value: Value) -> Model {
    value.as_object().unwrap().clone()
}

#[test]
fn test_view_without_template_still_constructs() {
    let mut rt = Runtime::new();
    let view = rt.create(BaseView, ViewOptions::new());
    rt.run_until_idle();

    let container = rt.view(view).unwrap().container();
    assert_eq!(rt.dom().children(container).count(), 0, "empty container, degraded");
}

#[test]
fn test_malformed_binding_spec_is_skipped() {
    let mut rt = Runtime::new();
    let fired = Rc::new(RefCell::new(0));
    let log = Rc::clone(&fired);

    let class = extend(BaseView)
        .template(vec![TemplateNode::new("input").id("input")])
        .events(vec![
            EventBinding::new("change", |_, _| unreachable!("one-word spec must be skipped")),
            EventBinding::new("click input extra", |_, _| {
                unreachable!("three-word spec must be skipped")
            }),
            EventBinding::new("change missing", |_, _| {
                unreachable!("unknown element id must be skipped")
            }),
            EventBinding::new("change input", move |_, _| *log.borrow_mut() += 1),
        ])
        .seal();

    let view = rt.create(class, ViewOptions::new());
    let input = rt.view(view).unwrap().element("input").unwrap();
    rt.dispatch(input, InputEvent::new("change"));

    assert_eq!(*fired.borrow(), 1, "only the well-formed binding survives");
}

#[test]
fn test_emit_without_handlers_is_a_noop() {
    let mut rt = Runtime::new();
    let view = rt.create(BaseView, ViewOptions::new());
    rt.emit(view, "nothing-listens", vec![json!(1)]);
}

#[test]
fn test_remove_from_parent_without_parent_degrades() {
    let mut rt = Runtime::new();
    let view = rt.create(
        extend(BaseView).template(vec![TemplateNode::new("div")]).seal(),
        ViewOptions::new(),
    );

    let fired = Rc::new(RefCell::new(0));
    let log = Rc::clone(&fired);
    rt.on(view, "ParentRemoved", move |_, _| *log.borrow_mut() += 1);

    rt.remove_from_parent(view);
    assert_eq!(*fired.borrow(), 0, "no parent, no hierarchy events");
}

#[test]
fn test_duplicate_template_ids_overwrite() {
    let mut rt = Runtime::new();
    let class = extend(BaseView)
        .template(vec![
            TemplateNode::new("span").id("x"),
            TemplateNode::new("strong").id("x"),
        ])
        .seal();

    let view = rt.create(class, ViewOptions::new());

    let captured = rt.view(view).unwrap().element("x").unwrap();
    assert_eq!(
        rt.dom().get(captured).unwrap().as_element().unwrap().tag,
        "strong",
        "last writer wins"
    );
}

#[test]
fn test_add_child_rejects_cycles() {
    let mut rt = Runtime::new();
    let a = rt.create(BaseView, ViewOptions::new());
    let b = rt.create(BaseView, ViewOptions::new());

    rt.add_child(a, b);
    rt.add_child(b, a); // would make `a` its own ancestor
    rt.add_child(a, a);

    assert_eq!(rt.view(a).unwrap().parent(), None);
    assert_eq!(rt.view(b).unwrap().parent(), Some(a));
    assert_eq!(rt.view(a).unwrap().children(), &[b]);
}

#[test]
fn test_add_child_moves_instead_of_duplicating() {
    let mut rt = Runtime::new();
    let first = rt.create(BaseView, ViewOptions::new());
    let second = rt.create(BaseView, ViewOptions::new());
    let child = rt.create(BaseView, ViewOptions::new());

    rt.add_child(first, child);
    rt.add_child(second, child);

    assert!(rt.view(first).unwrap().children().is_empty());
    assert_eq!(rt.view(second).unwrap().children(), &[child]);
    assert_eq!(rt.view(child).unwrap().parent(), Some(second));
}

#[test]
fn test_detach_preserves_descendant_state() {
    // the documented cleanup gap: removal severs DOM attachment only
    let mut rt = Runtime::new();
    let list = rt.create(
        extend(BaseView).template(vec![TemplateNode::new("ul")]).seal(),
        ViewOptions::new(),
    );
    let item = rt.create(
        extend(BaseView)
            .defaults(model(json!({"text": "kept"})))
            .template(vec![TemplateNode::new("li")])
            .seal(),
        ViewOptions::new().with_parent(list),
    );
    rt.run_until_idle();

    rt.remove_from_parent(list);

    assert_eq!(rt.view(item).unwrap().model()["text"], json!("kept"));
    assert_eq!(
        rt.view(item).unwrap().parent(),
        Some(list),
        "descendants keep their own hierarchy state"
    );
}

#[test]
fn test_reentrant_emit_is_tolerated() {
    let mut rt = Runtime::new();
    let view = rt.create(BaseView, ViewOptions::new());

    let pongs = Rc::new(RefCell::new(0));
    rt.on(view, "ping", move |rt, event| {
        // a handler may emit again mid-walk; the design does not guard it
        rt.emit(event.target, "pong", Vec::new());
    });
    let log = Rc::clone(&pongs);
    rt.on(view, "pong", move |_, _| *log.borrow_mut() += 1);

    rt.emit(view, "ping", Vec::new());
    assert_eq!(*pongs.borrow(), 1);
}

#[test]
fn test_handler_detaching_mid_bubble_stops_the_climb() {
    let mut rt = Runtime::new();
    let root = rt.create(BaseView, ViewOptions::new());
    let mid = rt.create(BaseView, ViewOptions::new().with_parent(root));
    let leaf = rt.create(BaseView, ViewOptions::new().with_parent(mid));

    let reached_root = Rc::new(RefCell::new(false));
    let log = Rc::clone(&reached_root);
    rt.on(root, "ping", move |_, _| *log.borrow_mut() = true);
    rt.on(leaf, "ping", move |rt, event| {
        // sever the chain while the event is in flight
        rt.remove_from_parent(event.target);
    });

    rt.emit(leaf, "ping", Vec::new());

    assert!(
        !*reached_root.borrow(),
        "the walk reads the live parent pointer after each level"
    );
}

#[test]
fn test_sync_without_transport_is_dropped() {
    let mut rt = Runtime::new();
    let view = rt.create(BaseView, ViewOptions::new());
    rt.sync(view, Method::Post, "/nowhere", Model::new());
    rt.run_until_idle();
}

#[test]
fn test_post_without_url_is_skipped() {
    let mut rt = Runtime::new();
    let view = rt.create(BaseView, ViewOptions::new());
    rt.post(view);
}

#[test]
fn test_serialize_childless_view_has_no_children_key() {
    let mut rt = Runtime::new();
    let view = rt.create(
        extend(BaseView)
            .defaults(model(json!({"x": 1})))
            .template(vec![TemplateNode::new("div")])
            .seal(),
        ViewOptions::new(),
    );

    let parsed: Value = serde_json::from_str(&rt.serialize(view).unwrap()).unwrap();
    assert_eq!(parsed, json!({"x": 1}));
    assert!(parsed.get("children").is_none());
}

#[test]
fn test_superview_defaults_to_parent_container() {
    let mut rt = Runtime::new();
    let parent = rt.create(
        extend(BaseView).template(vec![TemplateNode::new("div")]).seal(),
        ViewOptions::new(),
    );
    let child = rt.create(
        extend(BaseView).template(vec![TemplateNode::new("span")]).seal(),
        ViewOptions::new().with_parent(parent),
    );
    rt.run_until_idle();

    let parent_container = rt.view(parent).unwrap().container();
    let child_container = rt.view(child).unwrap().container();
    assert_eq!(rt.dom().get(child_container).unwrap().parent, parent_container);
}

#[test]
fn test_unserialize_rejects_malformed_blob() {
    let mut rt = Runtime::new();
    let view = rt.create(BaseView, ViewOptions::new());
    assert!(rt.unserialize(view, "not json").is_err());
}
