//! The controller trait and the services every controller operates on.
//!
//! Controllers are plain state machines. They never hold references into the
//! page; the host hands them a [`Context`] for the duration of each call.

use std::any::Any;

use trellis_core::Config;
use trellis_dom::{Document, Event};
use trellis_runtime::{ListenerRegistry, NotificationBus, Scheduler, ScrollLock, TimerHandle};

use crate::attach::Scope;
use crate::toast::{ToastId, ToastRegistry, ToastRequest};

/// Work scheduled on the page clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Move focus into freshly opened content.
    FocusInitial,
    /// Close on the next frame (dropdown close-on-select).
    DeferredClose,
    /// Terminal hide after an exit animation.
    Hide,
    /// A toast entry's time to live ran out.
    ToastExpire(ToastId),
    /// A toast entry's exit animation finished.
    ToastErase(ToastId),
}

/// Page services shared by all controllers.
#[derive(Debug)]
pub struct Context {
    pub doc: Document,
    pub scheduler: Scheduler<Task>,
    pub listeners: ListenerRegistry,
    pub notifications: NotificationBus,
    pub scroll_lock: ScrollLock,
    pub toasts: ToastRegistry,
    pub config: Config,
}

impl Context {
    pub fn new(doc: Document, config: Config) -> Self {
        Self {
            doc,
            scheduler: Scheduler::new(config.frame_interval),
            listeners: ListenerRegistry::new(),
            notifications: NotificationBus::new(),
            scroll_lock: ScrollLock::new(),
            toasts: ToastRegistry::new(),
            config,
        }
    }

    /// Emit `<identifier>:<event>` with the scope's root as origin.
    pub fn emit(&mut self, scope: &Scope, event: &str) {
        self.notifications.emit(&scope.identifier, event, scope.root, None);
    }
}

/// Behavior attached to a root element.
///
/// Every hook except [`Controller::invoke`] defaults to doing nothing. The host
/// releases the controller's timers and listeners after
/// [`Controller::disconnect`] returns, so `disconnect` only needs to undo
/// effects the host cannot see (document state, the scroll lock).
pub trait Controller: Any {
    fn scope(&self) -> &Scope;

    /// Run the action `method`. Returns false for unknown methods.
    fn invoke(&mut self, method: &str, event: &mut Event, cx: &mut Context) -> bool;

    /// A click reached the document and this controller listens for clicks.
    fn document_click(&mut self, _event: &mut Event, _cx: &mut Context) {}

    /// A key press reached the document and this controller listens for keys.
    fn document_key(&mut self, _event: &mut Event, _cx: &mut Context) {}

    /// A task this controller scheduled came due.
    fn timer(&mut self, _handle: TimerHandle, _task: Task, _cx: &mut Context) {}

    /// The global "show toast" notification was raised.
    fn toast_request(&mut self, _request: &ToastRequest, _cx: &mut Context) {}

    fn disconnect(&mut self, _cx: &mut Context) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Builds a controller for a freshly attached root.
pub type Constructor = fn(Scope, &mut Context) -> Box<dyn Controller>;
