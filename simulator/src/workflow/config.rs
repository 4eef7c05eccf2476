use anyhow::Context;
use scancore::detection::{Orientation, Symbology};
use scancore::prelude::SessionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::profile::GeneratorConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub target: String,
    pub portrait: bool,
    pub workers: usize,
    pub error_threshold: f64,
    pub cooldown_ms: u64,
    pub readers: Vec<Symbology>,
    pub frame_interval_ms: u64,
    pub generator: GeneratorConfig,
    pub csv_path: Option<PathBuf>,
    pub mute: bool,
    pub deny_camera: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            target: "#barcode-scanner".into(),
            portrait: false,
            workers: session.workers,
            error_threshold: session.error_threshold,
            cooldown_ms: session.cooldown_ms,
            readers: session.readers,
            frame_interval_ms: 100,
            generator: GeneratorConfig::default(),
            csv_path: None,
            mute: false,
            deny_camera: false,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(frames: usize, frame_interval_ms: u64, seed: u64, portrait: bool) -> Self {
        Self {
            portrait,
            frame_interval_ms,
            generator: GeneratorConfig {
                frames,
                seed,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.portrait {
            Orientation::PortraitPrimary
        } else {
            Orientation::LandscapePrimary
        }
    }

    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            workers: self.workers,
            error_threshold: self.error_threshold,
            cooldown_ms: self.cooldown_ms,
            readers: self.readers.clone(),
            ..Default::default()
        }
    }
}
