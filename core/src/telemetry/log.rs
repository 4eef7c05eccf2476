use log::{info, warn};

/// Session-scoped logger that tags every line with the scanner target.
pub struct LogManager {
    target: String,
}

impl LogManager {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = target.into();
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.target, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.target, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("scanner")
    }
}
