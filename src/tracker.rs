//! Per-frame driver tying landmark resolution, direction estimation and
//! bucketing together.
//!
//! The tracker is invoked once per detected video frame by whatever loop the
//! host runs. A frame whose reference landmarks are missing is skipped and the
//! previous bucket is kept; nothing else carries over between frames.

use crate::{
    bucket::{DirectionBucket, Thresholds},
    config::Config,
    direction::{DirectionEstimator, DirectionResult},
    landmarks::{LandmarkFrame, LandmarkLayout},
    utils::{round_to_pixel, PixelPosition},
    Result,
};
use log::{debug, warn};
use serde::Serialize;

/// What the tracker reports for a successfully processed frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameUpdate {
    /// Zero-based index of the frame in arrival order, skipped frames included
    #[serde(rename = "frame")]
    pub frame_index: u64,
    /// Frame time in milliseconds
    pub at_ms: u64,
    /// Nose tip rounded to whole pixels
    pub position: PixelPosition,
    pub direction: DirectionResult,
    pub bucket: DirectionBucket,
    /// The bucket differs from the previous successful frame
    #[serde(rename = "changed")]
    pub bucket_changed: bool,
}

/// Counters for a tracking run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub processed: u64,
    pub skipped: u64,
}

/// Frame loop state: the last bucket and a frame clock
pub struct DirectionTracker {
    estimator: DirectionEstimator,
    layout: LandmarkLayout,
    thresholds: Thresholds,
    frame_interval_ms: u64,
    last_bucket: DirectionBucket,
    next_frame: u64,
    clock_ms: Option<u64>,
    stats: TrackerStats,
}

impl DirectionTracker {
    /// Create a tracker
    ///
    /// # Errors
    ///
    /// Returns an error if the thresholds are inverted or not finite
    pub fn new(
        estimator: DirectionEstimator,
        layout: LandmarkLayout,
        thresholds: Thresholds,
        frame_interval_ms: u64,
    ) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self {
            estimator,
            layout,
            thresholds,
            frame_interval_ms,
            last_bucket: DirectionBucket::default(),
            next_frame: 0,
            clock_ms: None,
            stats: TrackerStats::default(),
        })
    }

    /// Build a tracker from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the estimator offset or thresholds are invalid
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            DirectionEstimator::new(config.estimator.up_offset)?,
            config.landmarks.clone(),
            config.thresholds,
            config.frames.frame_interval_ms,
        )
    }

    /// Bucket of the last successful frame, center/center before any
    #[must_use]
    pub const fn current_bucket(&self) -> DirectionBucket {
        self.last_bucket
    }

    /// Time of the last frame seen, skipped frames included
    #[must_use]
    pub const fn clock_ms(&self) -> Option<u64> {
        self.clock_ms
    }

    #[must_use]
    pub const fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// Process one frame
    ///
    /// Returns `None` when the frame has to be skipped. The retained bucket is
    /// left untouched in that case.
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> Option<FrameUpdate> {
        let frame_index = self.next_frame;
        self.next_frame += 1;
        let at_ms = self.advance_clock(frame.timestamp_ms);

        match self.evaluate(frame) {
            Ok((position, direction)) => {
                let bucket = self.thresholds.classify_pixel(position);
                let bucket_changed = bucket != self.last_bucket;
                if bucket_changed {
                    debug!("Frame {frame_index}: bucket {} -> {}", self.last_bucket, bucket);
                }
                self.last_bucket = bucket;
                self.stats.processed += 1;

                Some(FrameUpdate {
                    frame_index,
                    at_ms,
                    position,
                    direction,
                    bucket,
                    bucket_changed,
                })
            }
            Err(e) => {
                debug!("Skipping frame {frame_index}: {e}");
                self.stats.skipped += 1;
                None
            }
        }
    }

    /// Process frames in arrival order, invoking `callback` once per successful frame
    pub fn run<I, F>(&mut self, frames: I, mut callback: F) -> TrackerStats
    where
        I: IntoIterator<Item = LandmarkFrame>,
        F: FnMut(&FrameUpdate),
    {
        for frame in frames {
            if let Some(update) = self.process_frame(&frame) {
                callback(&update);
            }
        }
        self.stats
    }

    fn evaluate(&self, frame: &LandmarkFrame) -> Result<(PixelPosition, DirectionResult)> {
        let triple = self.layout.resolve(frame)?;
        let direction = self.estimator.compute_triple(&triple)?;
        let position = round_to_pixel(&triple.tip)?;
        Ok((position, direction))
    }

    /// The clock never runs backwards; an earlier timestamp is held at the last time
    fn advance_clock(&mut self, timestamp_ms: Option<u64>) -> u64 {
        let now = match (timestamp_ms, self.clock_ms) {
            (Some(ts), Some(last)) if ts < last => {
                warn!("Frame timestamp {ts} ms is before the previous frame at {last} ms");
                last
            }
            (Some(ts), _) => ts,
            (None, Some(last)) => last.saturating_add(self.frame_interval_ms),
            (None, None) => 0,
        };
        self.clock_ms = Some(now);
        now
    }
}
