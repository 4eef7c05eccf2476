//! Stand-ins for the browser collaborators of a scan session.

use log::debug;
use scancore::detection::{DetectionEvent, DetectorConfig};
use scancore::filter::Clock;
use scancore::prelude::{ScanError, ScanResult};
use scancore::session::{Clipboard, ConfirmationSound, Detector, Presenter};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const REPLAY_QUEUE_DEPTH: usize = 16;

/// Clock that follows tokio time, so paused runtimes drive cooldowns too.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Detector that replays pre-generated frames at a fixed interval.
pub struct ReplayDetector {
    events: Vec<DetectionEvent>,
    frame_interval: Duration,
    deny_camera: bool,
    config: Option<DetectorConfig>,
}

impl ReplayDetector {
    pub fn new(events: Vec<DetectionEvent>, frame_interval: Duration) -> Self {
        Self {
            events,
            frame_interval,
            deny_camera: false,
            config: None,
        }
    }

    /// Makes initialization fail the way a refused camera permission does.
    pub fn deny_camera(mut self, deny: bool) -> Self {
        self.deny_camera = deny;
        self
    }

    #[cfg(test)]
    pub fn config(&self) -> Option<&DetectorConfig> {
        self.config.as_ref()
    }
}

impl Detector for ReplayDetector {
    fn initialize(&mut self, config: &DetectorConfig) -> ScanResult<()> {
        if self.deny_camera {
            return Err(ScanError::Initialization("camera permission denied".into()));
        }
        if config.input_stream.target.trim().is_empty() {
            return Err(ScanError::Initialization("no target element".into()));
        }
        if config.decoder.readers.is_empty() {
            return Err(ScanError::Initialization("no decoder readers".into()));
        }
        self.config = Some(config.clone());
        Ok(())
    }

    fn start(&mut self) -> mpsc::Receiver<DetectionEvent> {
        let (tx, rx) = mpsc::channel(REPLAY_QUEUE_DEPTH);
        let events = std::mem::take(&mut self.events);
        let interval = self.frame_interval;
        if let Some(config) = self.config.as_ref() {
            debug!(
                "replaying {} frames into {} every {:?}",
                events.len(),
                config.input_stream.target,
                interval
            );
        }

        tokio::spawn(async move {
            for event in events {
                tokio::time::sleep(interval).await;
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        rx
    }
}

/// Presenter that prints to the terminal and remembers what it showed.
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    results: Vec<String>,
    messages: Vec<String>,
    errors: Vec<String>,
    quiet: bool,
}

impl ConsolePresenter {
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            ..Default::default()
        }
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl Presenter for ConsolePresenter {
    fn append_result(&mut self, code: &str) {
        self.results.push(code.to_string());
        if !self.quiet {
            println!("[SCAN] {}", code);
        }
    }

    fn show_transient_message(&mut self, text: &str, display_ms: u64, transition_ms: u64) {
        self.messages.push(text.to_string());
        if !self.quiet {
            println!("[HINT] {} ({}ms, fade {}ms)", text, display_ms, transition_ms);
        }
    }

    fn report_error(&mut self, error: &ScanError) {
        self.errors.push(error.to_string());
        eprintln!("[ERROR] {}", error);
    }

    fn hide_debug_overlay(&mut self) {
        debug!("debug overlay hidden");
    }
}

/// Clipboard that lands the exported CSV in a file.
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Clipboard for FileClipboard {
    fn write_text(&mut self, text: &str) -> ScanResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| ScanError::Clipboard(format!("{}: {}", parent.display(), err)))?;
        }
        fs::write(&self.path, text)
            .map_err(|err| ScanError::Clipboard(format!("{}: {}", self.path.display(), err)))
    }
}

/// Rings the terminal bell for each accepted code.
pub struct BellSound {
    muted: bool,
}

impl BellSound {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }
}

impl ConfirmationSound for BellSound {
    fn play(&mut self) -> ScanResult<()> {
        if self.muted {
            return Ok(());
        }
        let mut stdout = std::io::stdout();
        stdout
            .write_all(b"\x07")
            .and_then(|_| stdout.flush())
            .map_err(|err| ScanError::Playback(err.to_string()))
    }
}
