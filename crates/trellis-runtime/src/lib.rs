//! Trellis Runtime - single-threaded event-loop services.
//!
//! - [`Scheduler`]: virtual clock with cancellable timeouts and next-frame callbacks
//! - [`ListenerRegistry`]: bookkeeping for document-level listeners
//! - [`NotificationBus`]: outgoing widget notifications
//! - [`ScrollLock`]: reference-counted page scroll lock
//!
//! Nothing here runs on its own. A host (see `trellis-ui`'s `Page`) advances the
//! clock and routes what falls out to the owners.

pub mod listeners;
pub mod notification;
pub mod owner;
pub mod scheduler;
pub mod scroll_lock;

pub use listeners::{ListenerId, ListenerKind, ListenerRegistry};
pub use notification::{Detail, Notification, NotificationBus};
pub use owner::{Owner, WidgetKey};
pub use scheduler::{Fired, Scheduler, TimerHandle, TimerKind};
pub use scroll_lock::ScrollLock;
