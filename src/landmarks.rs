//! Facial landmark types and reference landmark resolution.
//!
//! A landmark detector produces a list of keypoints per video frame. The
//! direction estimator needs exactly three of them: the nose tip and the two
//! nose wings. [`LandmarkLayout`] names those three, either by the label the
//! detector attaches to a keypoint or by position in the list.

use crate::{
    constants::{LEFT_NOSE_INDEX, NOSE_TIP_INDEX, RIGHT_NOSE_INDEX},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A labeled point in image pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Depth relative to the face centre; detectors without depth leave it at 0
    #[serde(default)]
    pub z: f64,
    /// Semantic label, when the detector provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Landmark {
    /// Create an unlabeled 2D landmark
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0, name: None }
    }

    /// Create an unlabeled 3D landmark
    #[must_use]
    pub const fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, name: None }
    }

    /// Attach a semantic label
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True when every coordinate is a finite number
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Landmarks detected in one video frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Capture time in milliseconds, if the detector reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// Keypoints in detector order; empty when no face was found
    #[serde(default)]
    pub keypoints: Vec<Landmark>,
}

impl LandmarkFrame {
    #[must_use]
    pub const fn new(keypoints: Vec<Landmark>) -> Self {
        Self { timestamp_ms: None, keypoints }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    /// A frame in which no face was detected
    #[must_use]
    pub const fn empty() -> Self {
        Self { timestamp_ms: None, keypoints: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// How to find one reference landmark in a frame
///
/// Serialized as a bare number (index) or string (label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LandmarkSelector {
    /// Position in the detector's keypoint list
    Index(usize),
    /// Semantic label attached by the detector
    Label(String),
}

impl LandmarkSelector {
    /// Find the selected landmark in a frame
    #[must_use]
    pub fn select<'a>(&self, keypoints: &'a [Landmark]) -> Option<&'a Landmark> {
        match self {
            Self::Index(index) => keypoints.get(*index),
            Self::Label(label) => keypoints.iter().find(|p| p.name.as_deref() == Some(label.as_str())),
        }
    }
}

impl fmt::Display for LandmarkSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Label(label) => write!(f, "'{label}'"),
        }
    }
}

/// The three reference landmarks used every frame
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTriple {
    pub tip: Landmark,
    pub side_a: Landmark,
    pub side_b: Landmark,
}

/// Selectors for the nose tip and the two nose wings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkLayout {
    pub tip: LandmarkSelector,
    pub side_a: LandmarkSelector,
    pub side_b: LandmarkSelector,
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self::mediapipe()
    }
}

impl LandmarkLayout {
    /// Positional layout of the MediaPipe 468-point face mesh
    #[must_use]
    pub const fn mediapipe() -> Self {
        Self {
            tip: LandmarkSelector::Index(NOSE_TIP_INDEX),
            side_a: LandmarkSelector::Index(LEFT_NOSE_INDEX),
            side_b: LandmarkSelector::Index(RIGHT_NOSE_INDEX),
        }
    }

    /// Layout resolving all three landmarks by label
    #[must_use]
    pub fn labeled(tip: &str, side_a: &str, side_b: &str) -> Self {
        Self {
            tip: LandmarkSelector::Label(tip.to_string()),
            side_a: LandmarkSelector::Label(side_a.to_string()),
            side_b: LandmarkSelector::Label(side_b.to_string()),
        }
    }

    /// Pick the reference triple out of a frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if any selector finds nothing or the
    /// selected landmark has non-finite coordinates.
    pub fn resolve(&self, frame: &LandmarkFrame) -> Result<ReferenceTriple> {
        let pick = |role: &str, selector: &LandmarkSelector| -> Result<Landmark> {
            let landmark = selector.select(&frame.keypoints).ok_or_else(|| {
                Error::MissingLandmark(format!(
                    "{role} {selector} not found among {} keypoints",
                    frame.keypoints.len()
                ))
            })?;
            if !landmark.is_finite() {
                return Err(Error::MissingLandmark(format!("{role} {selector} has non-finite coordinates")));
            }
            Ok(landmark.clone())
        };

        Ok(ReferenceTriple {
            tip: pick("tip", &self.tip)?,
            side_a: pick("side_a", &self.side_a)?,
            side_b: pick("side_b", &self.side_b)?,
        })
    }
}
