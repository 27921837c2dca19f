//! Spineless Views
//!
//! The view runtime: lifecycle, parent/child hierarchy, upward event
//! bubbling, model state and the network sync boundary. Views are arena
//! records owned by a single-threaded [`Runtime`]; everything here runs
//! cooperatively; the only suspension point is the explicit task queue
//! that defers first render.

mod class;
mod event;
mod model;
mod runtime;
mod scope;
mod sync;
mod view;

pub use class::{BaseView, Subclass, SubclassBuilder, ViewClass, extend};
pub use event::{
    BindingHandler, CHANGE, CHILD_ADDED, CHILD_REMOVED, Event, EventBinding, Handler, InputEvent,
    PARENT_ADDED, PARENT_REMOVED, SUCCESS,
};
pub use model::{Model, merge_defaults};
pub use runtime::Runtime;
pub use scope::ViewScope;
pub use sync::{Method, SyncHandle, SyncRequest, SyncResponse, Transport};
pub use view::{View, ViewOptions};

/// View identifier (index into the runtime's view arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub(crate) u32);

impl ViewId {
    /// Raw arena index
    #[inline]
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// View runtime errors
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("unknown view id {0}")]
    UnknownView(u32),

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
