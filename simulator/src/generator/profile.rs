use anyhow::{bail, Context};
use rand::{rngs::StdRng, Rng, SeedableRng};
use scancore::detection::{DecodeAttempt, DetectionEvent};
use serde::{Deserialize, Serialize};

use crate::generator::template::with_check_digit;

const DEFAULT_PAYLOADS: [&str; 4] = ["590123412345", "400638133393", "04210000526", "871125300120"];

/// Configuration for generating a synthetic detection stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Codes shown to the camera. Empty means the built-in sample shelf.
    pub codes: Vec<String>,
    pub frames: usize,
    /// Consecutive frames the same code stays in view.
    pub dwell_frames: usize,
    /// Modules decoded per frame.
    pub modules: usize,
    /// Probability that a frame carries a poorly decoded module.
    pub noise: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            codes: Vec::new(),
            frames: 40,
            dwell_frames: 5,
            modules: 12,
            noise: 0.15,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    fn resolved_codes(&self) -> anyhow::Result<Vec<String>> {
        if !self.codes.is_empty() {
            return Ok(self.codes.clone());
        }
        DEFAULT_PAYLOADS
            .iter()
            .map(|payload| {
                with_check_digit(payload)
                    .with_context(|| format!("building sample code from {}", payload))
            })
            .collect()
    }
}

fn build_attempts(rng: &mut StdRng, modules: usize, noisy: bool) -> Vec<DecodeAttempt> {
    let modules = modules.max(1);
    let mut attempts = Vec::with_capacity(modules);
    let mut offset = 0u32;

    for index in 0..modules {
        let width = rng.gen_range(6..12);
        let error = if index == 0 {
            None
        } else {
            Some(rng.gen_range(0.0..0.15))
        };
        attempts.push(DecodeAttempt {
            error,
            start: Some(offset),
            end: Some(offset + width),
        });
        offset += width;
    }

    if noisy {
        let victim = rng.gen_range(0..modules);
        attempts[victim].error = Some(rng.gen_range(0.2..0.6));
    }

    attempts
}

/// Builds the frames a camera pointed at a shelf of codes would produce.
pub fn build_detection_stream(config: &GeneratorConfig) -> anyhow::Result<Vec<DetectionEvent>> {
    if !(0.0..=1.0).contains(&config.noise) {
        bail!("noise probability {} outside [0, 1]", config.noise);
    }

    let codes = config.resolved_codes()?;
    let dwell = config.dwell_frames.max(1);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut events = Vec::with_capacity(config.frames);
    let mut current = rng.gen_range(0..codes.len());

    for frame in 0..config.frames {
        if frame > 0 && frame % dwell == 0 {
            current = rng.gen_range(0..codes.len());
        }
        let noisy = rng.gen_bool(config.noise);
        let attempts = build_attempts(&mut rng, config.modules, noisy);
        events.push(DetectionEvent::new(codes[current].clone(), attempts));
    }

    Ok(events)
}
