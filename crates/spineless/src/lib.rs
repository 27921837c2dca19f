//! Spineless - a headless declarative view runtime
//!
//! Views are the backbone: describe your element structure as JSON-shaped
//! templates, derive view classes by explicit composition, and let events
//! bubble up the view hierarchy. Everything runs single-threaded against an
//! in-memory element tree; there is no browser anywhere.
//!
//! ```
//! use spineless::prelude::*;
//! use serde_json::json;
//!
//! let mut rt = Runtime::new();
//!
//! let item = extend(BaseView)
//!     .defaults(json!({"text": "", "done": false}).as_object().unwrap().clone())
//!     .template(vec![TemplateNode::new("li").id("li")])
//!     .on_render(|_, scope| {
//!         let text = scope.get("text").and_then(|v| v.as_str()).unwrap_or("").to_string();
//!         scope.set_text("li", &text);
//!     })
//!     .seal();
//!
//! let view = rt.create(item, ViewOptions::new().with_prop("text", "buy milk"));
//! rt.run_until_idle(); // first render is deferred to the task queue
//!
//! let container = rt.view(view).unwrap().container();
//! assert_eq!(rt.dom().text_content(container), "buy milk");
//! ```

pub use spineless_dom as dom;
pub use spineless_template as template;
pub use spineless_view as view;

pub use spineless_dom::{DocumentFragment, DomError, DomTree, NodeId};
pub use spineless_template::{RESERVED_KEYS, RefSink, TemplateError, TemplateNode, compile, parse};
pub use spineless_view::{
    BaseView, Event, EventBinding, InputEvent, Method, Model, Runtime, Subclass, SubclassBuilder,
    SyncHandle, SyncRequest, SyncResponse, Transport, View, ViewClass, ViewError, ViewId,
    ViewOptions, ViewScope, extend, merge_defaults,
};

/// Install a global tracing subscriber driven by `RUST_LOG` (default
/// `info`). Optional; embedders with their own subscriber skip this.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// The commonly needed names in one import
pub mod prelude {
    pub use spineless_dom::{DomTree, NodeId};
    pub use spineless_template::TemplateNode;
    pub use spineless_view::{
        BaseView, Event, EventBinding, InputEvent, Runtime, ViewClass, ViewId, ViewOptions,
        ViewScope, extend,
    };
}
