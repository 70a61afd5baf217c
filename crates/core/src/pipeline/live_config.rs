use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detection::domain::detector_parameters::{DetectorParameters, ParameterError};
use crate::shared::constants::{
    APP_DIR_NAME, DEFAULT_KEY_WAIT_MS, DEFAULT_LINE_THICKNESS, DEFAULT_QUIT_KEY,
    DEFAULT_WINDOW_TITLE, DEFAULT_WORKING_SCALE, SKIN_HSV_LOWER, SKIN_HSV_UPPER,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid detector parameters: {0}")]
    Detector(#[from] ParameterError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// What the window shows each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// The annotated working frame alone.
    #[default]
    Working,
    /// Annotated working frame beside its skin-tone mask.
    Skin,
    /// 2x2 grid: annotated, skin mask, gray, HSV.
    Quad,
}

impl ViewMode {
    pub const ALL: &[ViewMode] = &[ViewMode::Working, ViewMode::Skin, ViewMode::Quad];
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Working => write!(f, "working"),
            ViewMode::Skin => write!(f, "skin"),
            ViewMode::Quad => write!(f, "quad"),
        }
    }
}

/// Settings for one live detection session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Factor applied to both axes of every captured frame.
    pub working_scale: f64,
    pub detector: DetectorParameters,
    pub line_thickness: u32,
    pub view: ViewMode,
    pub skin_lower: [u8; 3],
    pub skin_upper: [u8; 3],
    pub key_wait_ms: u64,
    pub quit_key: char,
    pub window_title: String,
    /// Stop after this many frames; run until quit otherwise.
    pub max_frames: Option<usize>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            working_scale: DEFAULT_WORKING_SCALE,
            detector: DetectorParameters::default(),
            line_thickness: DEFAULT_LINE_THICKNESS,
            view: ViewMode::default(),
            skin_lower: SKIN_HSV_LOWER,
            skin_upper: SKIN_HSV_UPPER,
            key_wait_ms: DEFAULT_KEY_WAIT_MS,
            quit_key: DEFAULT_QUIT_KEY,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            max_frames: None,
        }
    }
}

impl LiveConfig {
    /// `<config dir>/FaceWatch/config.json`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.json"))
    }

    /// Load from `explicit`, else from the default location when a file
    /// exists there, else defaults. An explicit path must be readable.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.working_scale.is_finite() && self.working_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "working scale must be positive, got {}",
                self.working_scale
            )));
        }
        if self.quit_key.is_control() {
            return Err(ConfigError::Invalid(format!(
                "quit key must be printable, got {:?}",
                self.quit_key
            )));
        }
        if self.window_title.trim().is_empty() {
            return Err(ConfigError::Invalid("window title is empty".into()));
        }
        if self.max_frames == Some(0) {
            return Err(ConfigError::Invalid("max frames must be at least 1".into()));
        }
        self.detector.validate()?;
        Ok(())
    }

    pub fn key_wait(&self) -> Duration {
        Duration::from_millis(self.key_wait_ms)
    }
}
