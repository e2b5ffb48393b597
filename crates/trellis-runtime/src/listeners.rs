//! Bookkeeping for document-level listeners.
//!
//! Widgets install listeners while they are in an open-equivalent state and
//! remove them on every exit path. The registry refuses to install the same
//! `(owner, kind)` pair twice, so a double `open` can never stack listeners.

use crate::owner::Owner;

/// Identifier of an installed listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// What a listener listens for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer interaction anywhere in the document.
    Click,
    /// Key press anywhere in the document.
    KeyDown,
    /// A named global notification, e.g. `toast:show`.
    Notification(String),
}

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    owner: Owner,
    kind: ListenerKind,
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a listener. If `owner` already listens for `kind`, the existing
    /// id is returned and nothing is added.
    pub fn install(&mut self, owner: Owner, kind: ListenerKind) -> ListenerId {
        if let Some(existing) = self
            .listeners
            .iter()
            .find(|l| l.owner == owner && l.kind == kind)
        {
            tracing::warn!(?owner, ?kind, "listener already installed, ignoring");
            return existing.id;
        }
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        tracing::trace!(?owner, ?kind, ?id, "listener installed");
        self.listeners.push(Listener { id, owner, kind });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    /// Remove `owner`'s listener for `kind`, if any.
    pub fn uninstall(&mut self, owner: Owner, kind: &ListenerKind) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !(l.owner == owner && &l.kind == kind));
        before != self.listeners.len()
    }

    pub fn remove_owned(&mut self, owner: Owner) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.owner != owner);
        before - self.listeners.len()
    }

    pub fn is_installed(&self, owner: Owner, kind: &ListenerKind) -> bool {
        self.listeners.iter().any(|l| l.owner == owner && &l.kind == kind)
    }

    /// Owners listening for `kind`, in install order. A snapshot, so handlers
    /// may install or remove listeners while it is being walked.
    pub fn listeners_for(&self, kind: &ListenerKind) -> Vec<Owner> {
        self.listeners
            .iter()
            .filter(|l| &l.kind == kind)
            .map(|l| l.owner)
            .collect()
    }

    pub fn count_for(&self, owner: Owner) -> usize {
        self.listeners.iter().filter(|l| l.owner == owner).count()
    }

    /// Number of document-level (click/keydown) listeners installed.
    pub fn document_listeners(&self) -> usize {
        self.listeners
            .iter()
            .filter(|l| matches!(l.kind, ListenerKind::Click | ListenerKind::KeyDown))
            .count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
