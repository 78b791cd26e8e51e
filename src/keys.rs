//! Key-press bridge from direction buckets to simulated keyboard input.
//!
//! Each active direction maps to a letter key and an arrow key which are
//! pressed together, released shortly after, and pressed again on a fixed
//! interval while the bucket holds. When both axes are active the horizontal
//! keys go first and the bridge switches to the vertical keys after a delay.
//!
//! The bridge is a plain state machine owned by the caller. It never reads a
//! clock: [`KeyBridge::set_bucket`] and [`KeyBridge::tick`] take the current
//! time in milliseconds, and `tick` returns every event due up to that time.

use crate::{
    bucket::{DirectionBucket, HorizontalDirection, VerticalDirection},
    constants::{DEFAULT_KEY_RELEASE_MS, DEFAULT_KEY_REPEAT_MS, DEFAULT_KEY_SEQUENCE_MS},
    Error, Result,
};
use log::{debug, info};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use std::collections::VecDeque;
use std::fmt;

/// Arrow keys with their legacy DOM key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowKey {
    Left,
    Up,
    Right,
    Down,
}

impl ArrowKey {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "ArrowLeft",
            Self::Up => "ArrowUp",
            Self::Right => "ArrowRight",
            Self::Down => "ArrowDown",
        }
    }

    #[must_use]
    pub const fn key_code(self) -> u32 {
        match self {
            Self::Left => 37,
            Self::Up => 38,
            Self::Right => 39,
            Self::Down => 40,
        }
    }
}

/// A simulated key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Letter(char),
    Arrow(ArrowKey),
}

impl Key {
    /// DOM `key` value
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Letter(c) => c.to_string(),
            Self::Arrow(arrow) => arrow.name().to_string(),
        }
    }

    /// DOM `code` value, `KeyL` for `l`
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Letter(c) => format!("Key{}", c.to_ascii_uppercase()),
            Self::Arrow(arrow) => arrow.name().to_string(),
        }
    }

    /// Legacy key code; letters use the character code of the key itself
    #[must_use]
    pub fn key_code(&self) -> u32 {
        match self {
            Self::Letter(c) => u32::from(*c),
            Self::Arrow(arrow) => arrow.key_code(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Letter and arrow pressed together for one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub letter: char,
    pub arrow: ArrowKey,
}

impl KeyPair {
    #[must_use]
    pub const fn horizontal(direction: HorizontalDirection) -> Option<Self> {
        match direction {
            HorizontalDirection::Left => Some(Self { letter: 'l', arrow: ArrowKey::Left }),
            HorizontalDirection::Right => Some(Self { letter: 'r', arrow: ArrowKey::Right }),
            HorizontalDirection::Center => None,
        }
    }

    #[must_use]
    pub const fn vertical(direction: VerticalDirection) -> Option<Self> {
        match direction {
            VerticalDirection::Up => Some(Self { letter: 'u', arrow: ArrowKey::Up }),
            VerticalDirection::Down => Some(Self { letter: 'd', arrow: ArrowKey::Down }),
            VerticalDirection::Center => None,
        }
    }

    const fn keys(self) -> [Key; 2] {
        [Key::Letter(self.letter), Key::Arrow(self.arrow)]
    }
}

/// Letter key pressed first for a bucket; horizontal takes precedence
#[must_use]
pub fn active_key(bucket: DirectionBucket) -> Option<char> {
    KeyPair::horizontal(bucket.horizontal)
        .or_else(|| KeyPair::vertical(bucket.vertical))
        .map(|pair| pair.letter)
}

/// Direction of a key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeyEventKind {
    #[serde(rename = "keydown")]
    Down,
    #[serde(rename = "keyup")]
    Up,
}

/// A key transition at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: Key,
    pub at_ms: u64,
}

impl Serialize for KeyEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("KeyEvent", 5)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("key", &self.key.name())?;
        state.serialize_field("code", &self.key.code())?;
        state.serialize_field("key_code", &self.key.key_code())?;
        state.serialize_field("at_ms", &self.at_ms)?;
        state.end()
    }
}

/// Press timing of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyTiming {
    /// Interval between repeated presses while a direction holds
    pub repeat_interval_ms: u64,
    /// Time between key-down and key-up of one press
    pub release_delay_ms: u64,
    /// Time spent on horizontal keys before switching to vertical keys
    pub sequence_delay_ms: u64,
}

impl Default for KeyTiming {
    fn default() -> Self {
        Self {
            repeat_interval_ms: DEFAULT_KEY_REPEAT_MS,
            release_delay_ms: DEFAULT_KEY_RELEASE_MS,
            sequence_delay_ms: DEFAULT_KEY_SEQUENCE_MS,
        }
    }
}

impl KeyTiming {
    /// Check that every press is released before the next one is due
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the repeat interval is zero or not
    /// longer than the release delay
    pub fn validate(&self) -> Result<()> {
        if self.repeat_interval_ms == 0 {
            return Err(Error::InvalidInput("Key repeat interval must be greater than 0".to_string()));
        }
        if self.release_delay_ms >= self.repeat_interval_ms {
            return Err(Error::InvalidInput(format!(
                "Key release delay ({} ms) must be shorter than the repeat interval ({} ms)",
                self.release_delay_ms, self.repeat_interval_ms
            )));
        }
        Ok(())
    }
}

/// Bridge state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// No direction active
    Idle,
    /// Keys up, next press due at `next_at`
    Pressing { keys: KeyPair, next_at: u64 },
    /// Keys down, release due at `release_at`, next press at `next_at`
    Releasing { keys: KeyPair, release_at: u64, next_at: u64 },
}

/// Destination for key events
pub trait KeyEventSink {
    /// Deliver one event
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered
    fn send(&mut self, event: &KeyEvent) -> Result<()>;
}

impl KeyEventSink for Vec<KeyEvent> {
    fn send(&mut self, event: &KeyEvent) -> Result<()> {
        self.push(*event);
        Ok(())
    }
}

/// Sink that only logs events
#[derive(Debug, Default)]
pub struct LogSink;

impl KeyEventSink for LogSink {
    fn send(&mut self, event: &KeyEvent) -> Result<()> {
        match event.kind {
            KeyEventKind::Down => info!("Key {} pressed based on face direction", event.key),
            KeyEventKind::Up => debug!("Key {} released", event.key),
        }
        Ok(())
    }
}

/// Key-press state machine driven by bucket changes and time
#[derive(Debug, Clone)]
pub struct KeyBridge {
    timing: KeyTiming,
    bucket: DirectionBucket,
    state: KeyState,
    /// Vertical keys waiting to take over from horizontal ones
    switch: Option<(KeyPair, u64)>,
    pending: VecDeque<KeyEvent>,
}

impl Default for KeyBridge {
    fn default() -> Self {
        Self::with_timing(KeyTiming::default())
    }
}

impl KeyBridge {
    /// Create an idle bridge
    ///
    /// # Errors
    ///
    /// Returns an error if the timing would never let time advance, see
    /// [`KeyTiming::validate`]
    pub fn new(timing: KeyTiming) -> Result<Self> {
        timing.validate()?;
        Ok(Self::with_timing(timing))
    }

    fn with_timing(timing: KeyTiming) -> Self {
        Self {
            timing,
            bucket: DirectionBucket::default(),
            state: KeyState::Idle,
            switch: None,
            pending: VecDeque::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> KeyState {
        self.state
    }

    #[must_use]
    pub const fn bucket(&self) -> DirectionBucket {
        self.bucket
    }

    /// Report the current bucket
    ///
    /// A changed bucket cancels the running schedule: held keys are released
    /// at `now_ms` and the new direction's first press is due at `now_ms`.
    pub fn set_bucket(&mut self, bucket: DirectionBucket, now_ms: u64) {
        if bucket == self.bucket {
            return;
        }
        debug!("Key bridge: {} -> {}", self.bucket, bucket);
        self.bucket = bucket;
        self.release_held(now_ms);
        self.switch = None;

        let horizontal = KeyPair::horizontal(bucket.horizontal);
        let vertical = KeyPair::vertical(bucket.vertical);

        self.state = match (horizontal, vertical) {
            (Some(keys), vertical) => {
                self.switch = vertical.map(|v| (v, now_ms.saturating_add(self.timing.sequence_delay_ms)));
                KeyState::Pressing { keys, next_at: now_ms }
            }
            (None, Some(keys)) => KeyState::Pressing { keys, next_at: now_ms },
            (None, None) => KeyState::Idle,
        };
    }

    /// Advance to `now_ms`, returning every event due in time order
    pub fn tick(&mut self, now_ms: u64) -> Vec<KeyEvent> {
        let mut events: Vec<KeyEvent> = self.pending.drain(..).collect();

        loop {
            let state_due = match self.state {
                KeyState::Idle => None,
                KeyState::Pressing { next_at, .. } => Some(next_at),
                KeyState::Releasing { release_at, .. } => Some(release_at),
            };

            // A switch wins ties with a repeat press of the horizontal keys
            if let Some((keys, switch_at)) = self.switch {
                if switch_at <= now_ms && state_due.map_or(true, |due| switch_at <= due) {
                    self.switch = None;
                    self.release_held(switch_at);
                    events.extend(self.pending.drain(..));
                    self.state = KeyState::Pressing { keys, next_at: switch_at };
                    continue;
                }
            }

            match self.state {
                KeyState::Pressing { keys, next_at } if next_at <= now_ms => {
                    events.extend(keys.keys().map(|key| KeyEvent { kind: KeyEventKind::Down, key, at_ms: next_at }));
                    self.state = KeyState::Releasing {
                        keys,
                        release_at: next_at.saturating_add(self.timing.release_delay_ms),
                        next_at: next_at.saturating_add(self.timing.repeat_interval_ms),
                    };
                }
                KeyState::Releasing { keys, release_at, next_at } if release_at <= now_ms => {
                    events.extend(keys.keys().map(|key| KeyEvent { kind: KeyEventKind::Up, key, at_ms: release_at }));
                    self.state = KeyState::Pressing { keys, next_at: next_at.max(release_at) };
                }
                _ => break,
            }
        }

        events
    }

    /// Advance to `now_ms` and deliver due events to `sink`
    ///
    /// # Errors
    ///
    /// Returns the first error reported by the sink
    pub fn tick_into<S: KeyEventSink + ?Sized>(&mut self, now_ms: u64, sink: &mut S) -> Result<usize> {
        let events = self.tick(now_ms);
        for event in &events {
            sink.send(event)?;
        }
        Ok(events.len())
    }

    fn release_held(&mut self, at_ms: u64) {
        if let KeyState::Releasing { keys, .. } = self.state {
            self.pending
                .extend(keys.keys().map(|key| KeyEvent { kind: KeyEventKind::Up, key, at_ms }));
            self.state = KeyState::Idle;
        }
    }
}
