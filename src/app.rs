//! Application driver: landmark frames in, JSON direction records and key events out.

use crate::{
    config::Config,
    keys::{KeyBridge, KeyEvent, KeyEventSink, LogSink},
    landmarks::LandmarkFrame,
    tracker::{DirectionTracker, TrackerStats},
    Error, Result,
};
use log::{info, warn};
use std::io::Write;
use std::path::Path;

/// Load and validate a configuration file, falling back to defaults
///
/// A missing path gives the defaults silently; a file that cannot be read,
/// parsed or validated gives the defaults with a warning.
#[must_use]
pub fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };

    info!("Loading configuration from: {}", path.display());
    match Config::from_file(path).and_then(|cfg| cfg.validate().map(|()| cfg)) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Failed to load config file: {}. Using defaults.", e);
            Config::default()
        }
    }
}

/// Writes key events as `{"key_event": ...}` lines and logs them
pub struct JsonLinesSink<W: Write> {
    out: W,
    log: LogSink,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, log: LogSink }
    }
}

impl<W: Write> KeyEventSink for JsonLinesSink<W> {
    fn send(&mut self, event: &KeyEvent) -> Result<()> {
        self.log.send(event)?;
        let line = serde_json::json!({ "key_event": event });
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}

/// Frame loop writing one JSON line per processed frame
pub struct App<W: Write> {
    tracker: DirectionTracker,
    bridge: Option<KeyBridge>,
    out: W,
}

impl<W: Write> App<W> {
    /// Create the application from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the estimator, thresholds or key timing are invalid
    pub fn new(config: &Config, out: W) -> Result<Self> {
        let tracker = DirectionTracker::from_config(config)?;
        let bridge = if config.keys.enabled {
            info!("Key events enabled");
            Some(KeyBridge::new(config.keys.timing)?)
        } else {
            None
        };
        Ok(Self { tracker, bridge, out })
    }

    /// Process frames until the input ends
    ///
    /// Malformed lines are logged and counted as frames without a face.
    ///
    /// # Errors
    ///
    /// Returns an error on input I/O failures or if the output cannot be written
    pub fn run<I>(&mut self, frames: I) -> Result<TrackerStats>
    where
        I: IntoIterator<Item = Result<LandmarkFrame>>,
    {
        info!("Starting frame loop");

        for frame in frames {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e @ Error::Parse { .. }) => {
                    warn!("{e}, frame skipped");
                    LandmarkFrame::empty()
                }
                Err(e) => return Err(e),
            };
            self.process_frame(&frame)?;
        }

        self.out.flush()?;

        let stats = self.tracker.stats();
        info!(
            "Processed {} frames, skipped {}; final direction {}",
            stats.processed,
            stats.skipped,
            self.tracker.current_bucket()
        );
        Ok(stats)
    }

    fn process_frame(&mut self, frame: &LandmarkFrame) -> Result<()> {
        if let Some(update) = self.tracker.process_frame(frame) {
            serde_json::to_writer(&mut self.out, &update)?;
            writeln!(self.out)?;
            if let Some(bridge) = self.bridge.as_mut() {
                bridge.set_bucket(update.bucket, update.at_ms);
            }
        }

        if let (Some(bridge), Some(now)) = (self.bridge.as_mut(), self.tracker.clock_ms()) {
            bridge.tick_into(now, &mut JsonLinesSink::new(&mut self.out))?;
        }
        Ok(())
    }

    /// Consume the application and return the output writer
    pub fn into_inner(self) -> W {
        self.out
    }
}
