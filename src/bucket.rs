//! Coarse direction buckets from a face position.

use crate::{
    constants::{DEFAULT_DOWN_THRESHOLD, DEFAULT_LEFT_THRESHOLD, DEFAULT_RIGHT_THRESHOLD, DEFAULT_UP_THRESHOLD},
    utils::PixelPosition,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Horizontal bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalDirection {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalDirection {
    Up,
    #[default]
    Center,
    Down,
}

impl fmt::Display for HorizontalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        })
    }
}

impl fmt::Display for VerticalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Center => "center",
            Self::Down => "down",
        })
    }
}

/// Horizontal and vertical bucket of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DirectionBucket {
    pub horizontal: HorizontalDirection,
    pub vertical: VerticalDirection,
}

impl DirectionBucket {
    #[must_use]
    pub const fn new(horizontal: HorizontalDirection, vertical: VerticalDirection) -> Self {
        Self { horizontal, vertical }
    }

    /// Both axes centred
    #[must_use]
    pub fn is_center(&self) -> bool {
        self.horizontal == HorizontalDirection::Center && self.vertical == VerticalDirection::Center
    }
}

impl fmt::Display for DirectionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H:{} V:{}", self.horizontal, self.vertical)
    }
}

/// Pixel cutoffs for bucketing
///
/// Calibration values for one camera setup. The defaults suit a 640x480 input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// x below this is `left`
    pub left: f64,
    /// x above this is `right`
    pub right: f64,
    /// y below this is `up`
    pub up: f64,
    /// y above this is `down`
    pub down: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            left: DEFAULT_LEFT_THRESHOLD,
            right: DEFAULT_RIGHT_THRESHOLD,
            up: DEFAULT_UP_THRESHOLD,
            down: DEFAULT_DOWN_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Check that every cutoff is finite and the bands are not inverted
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] describing the first bad cutoff
    pub fn validate(&self) -> Result<()> {
        if [self.left, self.right, self.up, self.down].iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidInput("Thresholds must be finite".to_string()));
        }
        if self.left > self.right {
            return Err(Error::InvalidInput(format!(
                "Left threshold {} exceeds right threshold {}",
                self.left, self.right
            )));
        }
        if self.up > self.down {
            return Err(Error::InvalidInput(format!(
                "Up threshold {} exceeds down threshold {}",
                self.up, self.down
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn horizontal(&self, x: f64) -> HorizontalDirection {
        if x < self.left {
            HorizontalDirection::Left
        } else if x > self.right {
            HorizontalDirection::Right
        } else {
            HorizontalDirection::Center
        }
    }

    #[must_use]
    pub fn vertical(&self, y: f64) -> VerticalDirection {
        if y < self.up {
            VerticalDirection::Up
        } else if y > self.down {
            VerticalDirection::Down
        } else {
            VerticalDirection::Center
        }
    }

    /// Classify a position on both axes
    #[must_use]
    pub fn classify(&self, x: f64, y: f64) -> DirectionBucket {
        DirectionBucket::new(self.horizontal(x), self.vertical(y))
    }

    #[must_use]
    pub fn classify_pixel(&self, position: PixelPosition) -> DirectionBucket {
        self.classify(f64::from(position.x), f64::from(position.y))
    }
}
