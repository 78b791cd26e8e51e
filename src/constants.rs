//! Constants used throughout the library

/// Nose tip keypoint index in the MediaPipe face mesh
pub const NOSE_TIP_INDEX: usize = 1;

/// Left nose-wing keypoint index in the MediaPipe face mesh
pub const LEFT_NOSE_INDEX: usize = 279;

/// Right nose-wing keypoint index in the MediaPipe face mesh
pub const RIGHT_NOSE_INDEX: usize = 49;

/// Distance of the synthetic "above" point from the nose midpoint (pixels, towards -y)
pub const DEFAULT_UP_OFFSET: f64 = 50.0;

/// Bucketing thresholds for a 640x480 input
pub const DEFAULT_LEFT_THRESHOLD: f64 = 250.0;
pub const DEFAULT_RIGHT_THRESHOLD: f64 = 450.0;
pub const DEFAULT_UP_THRESHOLD: f64 = 200.0;
pub const DEFAULT_DOWN_THRESHOLD: f64 = 350.0;

/// Default input resolution
pub const DEFAULT_INPUT_WIDTH: u32 = 640;
pub const DEFAULT_INPUT_HEIGHT: u32 = 480;

/// Delay between detection frames when the input carries no timestamps
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 300;

/// Key bridge timing
pub const DEFAULT_KEY_REPEAT_MS: u64 = 300;
pub const DEFAULT_KEY_RELEASE_MS: u64 = 100;
pub const DEFAULT_KEY_SEQUENCE_MS: u64 = 300;

/// Vector magnitudes below this are treated as zero
pub const EPSILON: f64 = 1e-10;
