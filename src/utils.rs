//! Utility functions for coordinate conversions.

pub mod safe_cast;

use crate::{landmarks::Landmark, Result};
use safe_cast::f64_to_i32_round;

/// Whole-pixel position of a landmark in the image plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelPosition {
    pub x: i32,
    pub y: i32,
}

/// Round a landmark to the nearest pixel
///
/// # Errors
///
/// Returns an error if a coordinate is not finite or outside i32 range
pub fn round_to_pixel(landmark: &Landmark) -> Result<PixelPosition> {
    Ok(PixelPosition {
        x: f64_to_i32_round(landmark.x)?,
        y: f64_to_i32_round(landmark.y)?,
    })
}
