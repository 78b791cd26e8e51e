//! Helper functions and utilities for tests

use face_direction::landmarks::{Landmark, LandmarkFrame, LandmarkLayout};

/// Labeled layout used by the helpers below
pub fn test_layout() -> LandmarkLayout {
    LandmarkLayout::labeled("noseTip", "leftNose", "rightNose")
}

/// A three-keypoint frame with the nose tip at `(x, y)` and the wings 50 px below
pub fn face_frame(x: f64, y: f64) -> LandmarkFrame {
    LandmarkFrame::new(vec![
        Landmark::new(x, y).named("noseTip"),
        Landmark::new(x - 20.0, y + 50.0).named("leftNose"),
        Landmark::new(x + 20.0, y + 50.0).named("rightNose"),
    ])
}

/// JSON line for [`face_frame`]
pub fn face_line(x: f64, y: f64) -> String {
    serde_json::to_string(&face_frame(x, y)).expect("frame serializes")
}
