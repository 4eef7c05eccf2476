//! Collaborators a scan session talks to but does not own the behaviour of.

use tokio::sync::mpsc;

use crate::detection::{DetectionEvent, DetectorConfig};
use crate::prelude::{ScanError, ScanResult};

/// Opaque barcode detector fed by a camera stream.
pub trait Detector {
    fn initialize(&mut self, config: &DetectorConfig) -> ScanResult<()>;

    /// Starts decoding and returns the stream of detections in emission order.
    fn start(&mut self) -> mpsc::Receiver<DetectionEvent>;
}

/// Render target for accepted codes and user feedback.
pub trait Presenter {
    fn append_result(&mut self, code: &str);
    fn show_transient_message(&mut self, text: &str, display_ms: u64, transition_ms: u64);
    fn report_error(&mut self, error: &ScanError);
    fn hide_debug_overlay(&mut self);
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> ScanResult<()>;
}

/// Audible confirmation played for every accepted detection.
pub trait ConfirmationSound {
    fn play(&mut self) -> ScanResult<()>;
}

/// Sound that never plays anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ConfirmationSound for Silent {
    fn play(&mut self) -> ScanResult<()> {
        Ok(())
    }
}
