//! Notifications emitted by widgets.
//!
//! Names are namespaced by widget identifier, e.g. `dropdown:opened` or
//! `toast:shown`. The host drains the queue after each interaction.

use trellis_core::alloc::HashMap;
use trellis_dom::ElementId;

/// Optional payload carried by a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// Carried by `toast:shown`.
    Toast { message: String, kind: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub name: String,
    /// Root element of the emitting widget.
    pub origin: ElementId,
    pub detail: Option<Detail>,
}

impl Notification {
    /// The part after the identifier, e.g. `opened`.
    pub fn event(&self) -> &str {
        self.name.split_once(':').map_or(self.name.as_str(), |(_, e)| e)
    }
}

#[derive(Debug, Default)]
pub struct NotificationBus {
    queue: Vec<Notification>,
    counts: HashMap<String, usize>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, identifier: &str, event: &str, origin: ElementId, detail: Option<Detail>) {
        let name = format!("{identifier}:{event}");
        tracing::debug!(%name, %origin, "notification");
        *self.counts.entry(name.clone()).or_default() += 1;
        self.queue.push(Notification { name, origin, detail });
    }

    /// Take everything emitted since the last drain.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.queue)
    }

    pub fn pending(&self) -> &[Notification] {
        &self.queue
    }

    /// How many times `name` was emitted over the bus's lifetime.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }
}
