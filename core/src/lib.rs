//! Scan-session core for the camera barcode scanner.
//!
//! Raw detections from an opaque decoder pass through a short filter
//! pipeline (confidence, then duplicate suppression) before they are tallied
//! and handed to the presentation layer. Every external surface (detector,
//! presenter, clipboard, confirmation sound) is a trait so drivers can plug
//! in real devices or stand-ins.

pub mod detection;
pub mod filter;
pub mod prelude;
pub mod session;
pub mod tally;
pub mod telemetry;

pub use detection::{DecodeAttempt, DetectionEvent};
pub use filter::{FilterOutcome, FilterPipeline};
pub use prelude::{FilterStage, ScanError, ScanResult, SessionConfig};
pub use session::{ScanSession, SessionState};
pub use tally::TallyStore;
