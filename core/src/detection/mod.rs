pub mod config;
pub mod event;

pub use config::{
    DecoderConfig, DetectorConfig, InputKind, InputStream, Orientation, Symbology,
    VideoConstraints,
};
pub use event::{DecodeAttempt, DetectionEvent};
