//! Face direction estimation from three nose landmarks.
//!
//! The nose tip is compared against the midpoint of the two nose wings. The
//! angle between the midpoint-to-tip vector and a vertical reference gives
//! `yaw`; the angle between the midpoint-to-wing vector and the midpoint-to-tip
//! vector gives `turn`. Both are measured in the image plane.

use crate::{
    constants::{DEFAULT_UP_OFFSET, EPSILON},
    landmarks::{Landmark, ReferenceTriple},
    Error, Result,
};
use nalgebra::{Point3, Vector2};
use serde::{Deserialize, Serialize};

/// Whether the angles of a result can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Normal,
    /// At least one angle hit a zero-length vector and was replaced by 0
    Low,
}

/// Angles and distances computed for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionResult {
    /// Degrees between midpoint->tip and straight up, in [0, 180]
    pub yaw: f64,
    /// Degrees between midpoint->side_b and midpoint->tip, in [0, 180]
    pub turn: f64,
    /// Pixels from the nose tip to the wing midpoint
    pub z_distance: f64,
    /// Pixels between the two nose wings
    pub x_distance: f64,
    /// `Low` when an angle fell back to the 0 sentinel
    pub confidence: Confidence,
}

impl DirectionResult {
    #[must_use]
    pub fn is_low_confidence(&self) -> bool {
        self.confidence == Confidence::Low
    }
}

/// Direction estimator with a configurable reference offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionEstimator {
    up_offset: f64,
}

impl Default for DirectionEstimator {
    fn default() -> Self {
        Self { up_offset: DEFAULT_UP_OFFSET }
    }
}

impl DirectionEstimator {
    /// Create an estimator whose synthetic "above" point sits `up_offset` pixels above the midpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is not a positive finite number
    pub fn new(up_offset: f64) -> Result<Self> {
        if !up_offset.is_finite() || up_offset <= 0.0 {
            return Err(Error::InvalidInput(format!("Up offset must be positive, got {up_offset}")));
        }
        Ok(Self { up_offset })
    }

    #[must_use]
    pub const fn up_offset(&self) -> f64 {
        self.up_offset
    }

    /// Compute the direction for one frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if any point is absent, has
    /// non-finite coordinates, or lies so far out that the distances
    /// overflow. The caller should skip the frame.
    pub fn compute(
        &self,
        tip: Option<&Landmark>,
        side_a: Option<&Landmark>,
        side_b: Option<&Landmark>,
    ) -> Result<DirectionResult> {
        let tip = require("tip", tip)?;
        let side_a = require("side_a", side_a)?;
        let side_b = require("side_b", side_b)?;

        let midpoint = midpoint(side_a, side_b);
        let above = Point3::new(midpoint.x, midpoint.y - self.up_offset, midpoint.z);
        let tip_p = to_point(tip);
        let side_b_p = to_point(side_b);

        let z_distance = planar_distance(&tip_p, &midpoint);
        let x_distance = planar_distance(&to_point(side_a), &side_b_p);
        if !(midpoint.coords.iter().all(|c| c.is_finite()) && z_distance.is_finite() && x_distance.is_finite()) {
            return Err(Error::MissingLandmark("coordinates out of range".to_string()));
        }

        let yaw = angle_between(&midpoint, &tip_p, &above);
        let turn = angle_between(&midpoint, &side_b_p, &tip_p);

        let confidence = if yaw.is_none() || turn.is_none() {
            log::debug!("Degenerate landmark geometry, angle sentinel used");
            Confidence::Low
        } else {
            Confidence::Normal
        };

        Ok(DirectionResult {
            yaw: yaw.unwrap_or(0.0),
            turn: turn.unwrap_or(0.0),
            z_distance,
            x_distance,
            confidence,
        })
    }

    /// Compute the direction from an already resolved triple
    ///
    /// # Errors
    ///
    /// See [`DirectionEstimator::compute`]
    pub fn compute_triple(&self, triple: &ReferenceTriple) -> Result<DirectionResult> {
        self.compute(Some(&triple.tip), Some(&triple.side_a), Some(&triple.side_b))
    }
}

/// Compute the direction with the default 50 px reference offset
///
/// # Errors
///
/// See [`DirectionEstimator::compute`]
pub fn compute_direction(
    tip: Option<&Landmark>,
    side_a: Option<&Landmark>,
    side_b: Option<&Landmark>,
) -> Result<DirectionResult> {
    DirectionEstimator::default().compute(tip, side_a, side_b)
}

fn require<'a>(role: &str, landmark: Option<&'a Landmark>) -> Result<&'a Landmark> {
    let landmark = landmark.ok_or_else(|| Error::MissingLandmark(format!("{role} point is absent")))?;
    if landmark.is_finite() {
        Ok(landmark)
    } else {
        Err(Error::MissingLandmark(format!("{role} point has non-finite coordinates")))
    }
}

fn to_point(landmark: &Landmark) -> Point3<f64> {
    Point3::new(landmark.x, landmark.y, landmark.z)
}

/// Componentwise mean of the two side points
#[must_use]
pub fn midpoint(side_a: &Landmark, side_b: &Landmark) -> Point3<f64> {
    nalgebra::center(&to_point(side_a), &to_point(side_b))
}

fn planar(vector: nalgebra::Vector3<f64>) -> Vector2<f64> {
    Vector2::new(vector.x, vector.y)
}

/// Angle in degrees at `vertex` between the rays to `a` and `b`
///
/// Returns `None` when either ray has zero length or the angle is not
/// representable.
fn angle_between(vertex: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> Option<f64> {
    let v1 = planar(a - vertex);
    let v2 = planar(b - vertex);

    let (n1, n2) = (v1.norm(), v2.norm());
    if !(n1.is_finite() && n2.is_finite()) || n1 < EPSILON || n2 < EPSILON {
        return None;
    }

    // Unit vectors keep the dot product in range for large inputs
    let cosine = (v1 / n1).dot(&(v2 / n2));
    if !cosine.is_finite() {
        return None;
    }
    Some(cosine.clamp(-1.0, 1.0).acos().to_degrees().clamp(0.0, 180.0))
}

fn planar_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    planar(a - b).norm()
}
