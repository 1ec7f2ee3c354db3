//! In-process pub/sub for interaction events.
//!
//! The controller publishes clicks here; consumers (sessions, embedders)
//! subscribe without the controller knowing who listens. Single-threaded by
//! design, matching the synchronous core.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// An interaction event raised by the rendered graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GraphEvent {
    /// A context satellite was clicked.
    #[serde(rename_all = "camelCase")]
    ContextClick { id: String, label: String },
    /// A defeater satellite was clicked.
    #[serde(rename_all = "camelCase")]
    DefeaterClick { id: String, label: String },
}

impl GraphEvent {
    /// Wire name of the event, as consumers key their handlers.
    pub fn name(&self) -> &'static str {
        match self {
            GraphEvent::ContextClick { .. } => "contextClick",
            GraphEvent::DefeaterClick { .. } => "defeaterClick",
        }
    }

    /// The clicked element's id.
    pub fn id(&self) -> &str {
        match self {
            GraphEvent::ContextClick { id, .. } | GraphEvent::DefeaterClick { id, .. } => id,
        }
    }
}

type Handler = Box<dyn FnMut(&GraphEvent)>;

/// A cheaply clonable single-threaded event bus.
///
/// Handlers run synchronously on `emit`, in subscription order. Handlers must
/// not emit on the same bus re-entrantly.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Rc<RefCell<Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl FnMut(&GraphEvent) + 'static) {
        self.handlers.borrow_mut().push(Box::new(handler));
    }

    pub fn emit(&self, event: &GraphEvent) {
        tracing::debug!(event = event.name(), id = event.id(), "emit");
        for handler in self.handlers.borrow_mut().iter_mut() {
            handler(event);
        }
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
