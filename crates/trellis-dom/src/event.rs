//! Input events and dispatch flags.

use bitflags::bitflags;

use crate::element::ElementId;

bitflags! {
    /// Keyboard modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT   = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT     = 1 << 2;
        const META    = 1 << 3;
    }
}

bitflags! {
    /// Flags set by handlers while an event is being dispatched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventFlags: u8 {
        /// A handler suppressed the default action.
        const DEFAULT_PREVENTED    = 1 << 0;
        /// A handler stopped further propagation.
        const PROPAGATION_STOPPED  = 1 << 1;
    }
}

/// Logical keys the widget runtime reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Enter,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Character(char),
}

impl Key {
    /// Parse a `KeyboardEvent.key`-style name.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "Enter" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Home" => Key::Home,
            "End" => Key::End,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Character(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    pub fn new(key: Key) -> Self {
        Self { key, modifiers: Modifiers::empty() }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Event types that can be bound declaratively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "click" => Some(EventKind::Click),
            "keydown" => Some(EventKind::KeyDown),
            _ => None,
        }
    }
}

/// An event being dispatched through the page.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    /// Element the event originated on.
    pub target: ElementId,
    /// Element whose handler is currently running.
    pub current_target: Option<ElementId>,
    pub keyboard: Option<KeyboardEvent>,
    flags: EventFlags,
}

impl Event {
    pub fn click(target: ElementId) -> Self {
        Self {
            kind: EventKind::Click,
            target,
            current_target: None,
            keyboard: None,
            flags: EventFlags::empty(),
        }
    }

    pub fn key_down(target: ElementId, keyboard: KeyboardEvent) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target,
            current_target: None,
            keyboard: Some(keyboard),
            flags: EventFlags::empty(),
        }
    }

    pub fn key(&self) -> Option<Key> {
        self.keyboard.map(|k| k.key)
    }

    pub fn prevent_default(&mut self) {
        self.flags.insert(EventFlags::DEFAULT_PREVENTED);
    }

    pub fn stop_propagation(&mut self) {
        self.flags.insert(EventFlags::PROPAGATION_STOPPED);
    }

    pub fn default_prevented(&self) -> bool {
        self.flags.contains(EventFlags::DEFAULT_PREVENTED)
    }

    pub fn propagation_stopped(&self) -> bool {
        self.flags.contains(EventFlags::PROPAGATION_STOPPED)
    }

    pub fn flags(&self) -> EventFlags {
        self.flags
    }
}
