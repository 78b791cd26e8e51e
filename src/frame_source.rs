//! Landmark frame input in JSON Lines form.
//!
//! Each line holds one frame, either as an object
//! `{"timestamp_ms": 1234, "keypoints": [{"x": .., "y": .., "z": .., "name": ..}, ..]}`
//! or as a bare keypoint array. Blank lines and `null` are frames in which the
//! detector found no face.

use crate::{
    landmarks::{Landmark, LandmarkFrame},
    Error, Result,
};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameLine {
    Keypoints(Vec<Landmark>),
    Frame(LandmarkFrame),
}

/// Parse one input line into a frame
///
/// # Errors
///
/// Returns [`Error::Parse`] if the line is neither a frame, a keypoint array nor `null`
pub fn parse_frame_line(line: &str, line_number: usize) -> Result<LandmarkFrame> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(LandmarkFrame::empty());
    }

    let parsed: Option<FrameLine> = serde_json::from_str(trimmed).map_err(|e| Error::Parse {
        line: line_number,
        message: e.to_string(),
    })?;

    Ok(match parsed {
        None => LandmarkFrame::empty(),
        Some(FrameLine::Keypoints(keypoints)) => LandmarkFrame::new(keypoints),
        Some(FrameLine::Frame(frame)) => frame,
    })
}

/// Iterator over frames read line by line
pub struct FrameReader<R> {
    reader: R,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
        }
    }
}

impl FrameReader<BufReader<File>> {
    /// Read frames from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::info!("Reading landmark frames from {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl FrameReader<io::StdinLock<'static>> {
    /// Read frames from standard input
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<LandmarkFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                Some(parse_frame_line(&self.buffer, self.line_number))
            }
            Err(e) => Some(Err(Error::Io(e))),
        }
    }
}
