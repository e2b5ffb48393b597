//! Profiling utilities based on the `puffin` crate.
//!
//! Routing hot paths (input dispatch, timer delivery) are wrapped in
//! `profile_function!` scopes. Scopes are free until [`enable`] is called.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Turn on puffin scope collection.
///
/// Only has an effect with the `profiling` feature (on by default).
pub fn enable() {
    if cfg!(feature = "profiling") {
        puffin::set_scopes_on(true);
        tracing::info!("puffin profiling scopes enabled");
    }
}

/// Whether scopes are currently being collected.
pub fn is_enabled() -> bool {
    puffin::are_scopes_on()
}

/// Mark the start of a new frame for profiling.
///
/// The page host calls this at the start of every `advance`.
#[inline]
pub fn new_frame() {
    if puffin::are_scopes_on() {
        puffin::GlobalProfiler::lock().new_frame();
    }
}
