use std::time::Duration;

/// Runtime configuration for a trellis page.
///
/// Per-widget behavior is configured declaratively on the markup; this holds
/// the timing constants and identifiers the runtime itself relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Delay between applying exit animation markers and the terminal hide.
    pub exit_animation: Duration,
    /// Interval between paint opportunities ("next frame" callbacks).
    pub frame_interval: Duration,
    /// Element id of the singleton toast container created on demand.
    pub toast_container_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exit_animation: Duration::from_millis(200),
            frame_interval: Duration::from_millis(16),
            toast_container_id: "toast-container".to_string(),
        }
    }
}

impl Config {
    pub fn with_exit_animation(mut self, delay: Duration) -> Self {
        self.exit_animation = delay;
        self
    }

    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    pub fn with_toast_container_id(mut self, id: impl Into<String>) -> Self {
        self.toast_container_id = id.into();
        self
    }
}
