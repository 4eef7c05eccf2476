use serde::{Deserialize, Serialize};

/// Decoder symbology handed to the detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Symbology {
    #[serde(rename = "upc_reader")]
    Upc,
    #[serde(rename = "ean_reader")]
    Ean,
}

/// Device screen orientation sampled when the session is initialized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    PortraitPrimary,
    PortraitSecondary,
    LandscapePrimary,
    LandscapeSecondary,
}

impl Orientation {
    pub fn is_portrait(self) -> bool {
        matches!(self, Self::PortraitPrimary | Self::PortraitSecondary)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InputKind {
    LiveStream,
}

/// Camera resolution profile requested from the detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoConstraints {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
}

impl VideoConstraints {
    pub fn portrait() -> Self {
        Self {
            width: 480,
            height: 640,
            aspect_ratio: 480.0 / 640.0,
        }
    }

    pub fn landscape() -> Self {
        Self {
            width: 640,
            height: 480,
            aspect_ratio: 640.0 / 480.0,
        }
    }

    pub fn for_orientation(orientation: Orientation) -> Self {
        if orientation.is_portrait() {
            Self::portrait()
        } else {
            Self::landscape()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputStream {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub target: String,
    pub constraints: VideoConstraints,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecoderConfig {
    pub readers: Vec<Symbology>,
}

/// Full configuration consumed by the detector on initialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectorConfig {
    pub num_of_workers: usize,
    pub input_stream: InputStream,
    pub decoder: DecoderConfig,
}

impl DetectorConfig {
    /// Builds a live-video configuration bound to `target`. The resolution
    /// profile is fixed from `orientation` here and never re-evaluated.
    pub fn live(
        target: impl Into<String>,
        orientation: Orientation,
        workers: usize,
        readers: Vec<Symbology>,
    ) -> Self {
        Self {
            num_of_workers: workers,
            input_stream: InputStream {
                name: "Live".into(),
                kind: InputKind::LiveStream,
                target: target.into(),
                constraints: VideoConstraints::for_orientation(orientation),
            },
            decoder: DecoderConfig { readers },
        }
    }
}
