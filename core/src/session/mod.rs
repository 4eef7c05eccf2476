pub mod boundary;
pub mod controller;

pub use boundary::{Clipboard, ConfirmationSound, Detector, Presenter, Silent};
pub use controller::{ScanSession, SessionState};
