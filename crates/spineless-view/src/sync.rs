//! Network sync boundary
//!
//! The runtime does not speak any transport itself; callers inject a
//! [`Transport`] and the views hand it requests. A transport completes a
//! request whenever it likes through the [`SyncHandle`]; the completion is
//! delivered on the runtime's task queue, so `success` always runs
//! asynchronously with respect to the call that started the request.
//!
//! There are no retries and no status interpretation here, a known gap if
//! this is reused against anything beyond a toy backend.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::ViewId;

/// HTTP-ish method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A request handed to the transport
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub method: Method,
    pub url: String,
    /// Harvested form data
    pub data: Map<String, Value>,
}

/// A transport completion
#[derive(Debug, Clone)]
pub struct SyncResponse {
    pub status: u16,
    pub body: Value,
}

impl SyncResponse {
    /// A 200 response with the given body
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The injected transport boundary.
///
/// `send` must not call back into the runtime; it either completes the
/// handle immediately or stores it and completes it later. Either way the
/// view only observes the result on the next queue pump.
pub trait Transport {
    fn send(&mut self, request: SyncRequest, completion: SyncHandle);
}

/// Completion capability for one in-flight request
pub struct SyncHandle {
    queue: CompletionQueue,
    view: ViewId,
    request: SyncRequest,
}

impl SyncHandle {
    pub(crate) fn new(queue: CompletionQueue, view: ViewId, request: SyncRequest) -> Self {
        Self { queue, view, request }
    }

    /// The request this handle belongs to
    pub fn request(&self) -> &SyncRequest {
        &self.request
    }

    /// Complete the request. Consumes the handle; a request completes at
    /// most once.
    pub fn complete(self, response: SyncResponse) {
        self.queue.borrow_mut().push_back(Completion {
            view: self.view,
            request: self.request,
            response,
        });
    }
}

pub(crate) type CompletionQueue = Rc<RefCell<VecDeque<Completion>>>;

/// A finished request waiting for queue delivery
pub(crate) struct Completion {
    pub view: ViewId,
    pub request: SyncRequest,
    pub response: SyncResponse,
}
