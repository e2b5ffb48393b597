//! Trellis Core
//!
//! Shared building blocks for the trellis widget runtime: collection aliases,
//! logging setup, profiling scopes and the runtime [`Config`].

pub mod alloc;
pub mod config;
pub mod logging;
pub mod profiling;

pub use config::Config;
