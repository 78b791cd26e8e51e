//! Coarse face direction estimation from facial landmarks.
//!
//! This library turns the keypoints of an external face landmark detector into
//! a per-frame direction estimate:
//! - two angles (`yaw`, `turn`) and two distances computed from the nose tip
//!   and the two nose wings
//! - a `left`/`center`/`right` and `up`/`center`/`down` bucket from the nose
//!   tip position
//! - optionally, simulated key presses for the active bucket
//!
//! The pipeline per frame is:
//! 1. Resolve the three reference landmarks by label or index
//! 2. Compute the direction (pure, stateless)
//! 3. Classify the tip position into a bucket
//! 4. Feed the bucket to the key bridge
//!
//! # Examples
//!
//! ## Direction from three points
//!
//! ```
//! use face_direction::{direction::compute_direction, landmarks::Landmark};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tip = Landmark::new(100.0, 50.0);
//! let left = Landmark::new(80.0, 100.0);
//! let right = Landmark::new(120.0, 100.0);
//!
//! let direction = compute_direction(Some(&tip), Some(&left), Some(&right))?;
//! assert!(direction.yaw.abs() < 1e-9);
//! assert!((direction.x_distance - 40.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! ## Frame loop with key presses
//!
//! ```
//! use face_direction::{
//!     config::Config,
//!     keys::KeyBridge,
//!     landmarks::{Landmark, LandmarkFrame, LandmarkLayout},
//!     tracker::DirectionTracker,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::default();
//! config.landmarks = LandmarkLayout::labeled("tip", "left", "right");
//!
//! let mut tracker = DirectionTracker::from_config(&config)?;
//! let mut bridge = KeyBridge::new(config.keys.timing)?;
//!
//! let frame = LandmarkFrame::new(vec![
//!     Landmark::new(100.0, 240.0).named("tip"),
//!     Landmark::new(80.0, 290.0).named("left"),
//!     Landmark::new(120.0, 290.0).named("right"),
//! ]);
//!
//! if let Some(update) = tracker.process_frame(&frame) {
//!     bridge.set_bucket(update.bucket, update.at_ms);
//!     for event in bridge.tick(update.at_ms) {
//!         println!("{:?} {}", event.kind, event.key);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Landmark types and reference landmark resolution
pub mod landmarks;

/// Direction estimation from the nose tip and nose wings
pub mod direction;

/// Coarse direction buckets
pub mod bucket;

/// Per-frame driver
pub mod tracker;

/// Key-press bridge state machine
pub mod keys;

/// JSON Lines landmark input
pub mod frame_source;

/// Utility functions for coordinate conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

/// Application driver for the command-line tool
pub mod app;

pub use error::{Error, Result};
