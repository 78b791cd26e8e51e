//! Configuration management for the face direction tracker

use crate::{
    bucket::Thresholds,
    constants::{DEFAULT_FRAME_INTERVAL_MS, DEFAULT_INPUT_HEIGHT, DEFAULT_INPUT_WIDTH, DEFAULT_UP_OFFSET},
    keys::KeyTiming,
    landmarks::LandmarkLayout,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reference landmark selectors
    pub landmarks: LandmarkLayout,

    /// Direction estimator parameters
    pub estimator: EstimatorConfig,

    /// Bucketing cutoffs in pixels
    pub thresholds: Thresholds,

    /// Key-press bridge
    pub keys: KeysConfig,

    /// Frame stream parameters
    pub frames: FrameConfig,
}

/// Direction estimator parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Height of the synthetic reference point above the nose midpoint
    pub up_offset: f64,
}

/// Key-press bridge configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Emit key events
    pub enabled: bool,

    #[serde(flatten)]
    pub timing: KeyTiming,
}

/// Frame stream configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Assumed time between frames that carry no timestamp
    pub frame_interval_ms: u64,

    /// Width of the video the landmarks were detected in
    pub input_width: u32,

    /// Height of the video the landmarks were detected in
    pub input_height: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self { up_offset: DEFAULT_UP_OFFSET }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timing: KeyTiming::default(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            input_width: DEFAULT_INPUT_WIDTH,
            input_height: DEFAULT_INPUT_HEIGHT,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] naming the first invalid value
    pub fn validate(&self) -> Result<()> {
        if !self.estimator.up_offset.is_finite() || self.estimator.up_offset <= 0.0 {
            return Err(Error::ConfigError("Up offset must be a positive number".to_string()));
        }

        self.thresholds
            .validate()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let width = f64::from(self.frames.input_width);
        let height = f64::from(self.frames.input_height);
        if self.frames.input_width == 0 || self.frames.input_height == 0 {
            return Err(Error::ConfigError("Input resolution must be non-zero".to_string()));
        }
        if self.thresholds.right > width || self.thresholds.down > height {
            log::warn!(
                "Thresholds extend past the {}x{} input; some buckets are unreachable",
                self.frames.input_width,
                self.frames.input_height
            );
        }

        if self.frames.frame_interval_ms == 0 {
            return Err(Error::ConfigError("Frame interval must be greater than 0".to_string()));
        }

        self.keys
            .timing
            .validate()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Direction Configuration

# Reference landmarks (MediaPipe face mesh indices by default).
# A number selects by position, a string by the keypoint's name.
landmarks:
  tip: 1
  side_a: 279
  side_b: 49

# Direction estimator
estimator:
  up_offset: 50.0

# Bucketing cutoffs in pixels
thresholds:
  left: 250.0
  right: 450.0
  up: 200.0
  down: 350.0

# Key-press bridge
keys:
  enabled: false
  repeat_interval_ms: 300
  release_delay_ms: 100
  sequence_delay_ms: 300

# Frame stream
frames:
  frame_interval_ms: 300
  input_width: 640
  input_height: 480
"#;
