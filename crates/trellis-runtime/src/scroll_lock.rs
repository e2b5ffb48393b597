//! Page scroll lock shared by every modal on the page.

use trellis_dom::Document;

/// Reference-counted scroll lock.
///
/// The body style is applied when the first holder acquires and cleared when
/// the last holder releases, so nested modals never unlock early.
#[derive(Debug, Default)]
pub struct ScrollLock {
    holders: usize,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self, doc: &mut Document) {
        if self.holders == 0 {
            let body = doc.body();
            let width = doc.metrics().scrollbar_width();
            doc.set_style(body, "overflow", "hidden");
            doc.set_style(body, "padding-right", format!("{width}px"));
            tracing::debug!(scrollbar_width = width, "scroll locked");
        }
        self.holders += 1;
    }

    /// Returns false (and changes nothing) if there was no holder.
    pub fn release(&mut self, doc: &mut Document) -> bool {
        if self.holders == 0 {
            tracing::warn!("scroll lock released with no holders");
            return false;
        }
        self.holders -= 1;
        if self.holders == 0 {
            let body = doc.body();
            doc.remove_style(body, "overflow");
            doc.remove_style(body, "padding-right");
            tracing::debug!("scroll unlocked");
        }
        true
    }

    pub fn is_locked(&self) -> bool {
        self.holders > 0
    }

    pub fn holders(&self) -> usize {
        self.holders
    }
}
