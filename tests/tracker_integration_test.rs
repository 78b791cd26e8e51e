//! Integration tests for the frame loop: input parsing, tracking, bucketing and key presses

mod test_helpers;

use face_direction::{
    bucket::{DirectionBucket, HorizontalDirection, Thresholds, VerticalDirection},
    config::Config,
    frame_source::FrameReader,
    keys::{KeyBridge, KeyEvent, KeyEventKind},
    landmarks::LandmarkFrame,
    tracker::{DirectionTracker, FrameUpdate},
    Result,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::Write;
use test_helpers::{face_frame, face_line, test_layout};

fn labeled_config() -> Config {
    let mut config = Config::default();
    config.landmarks = test_layout();
    config
}

#[test]
fn test_frames_file_through_tracker() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{}", face_line(320.0, 240.0)).unwrap();
    writeln!(file).unwrap();
    writeln!(file, "{}", face_line(100.0, 240.0)).unwrap();
    writeln!(file, "null").unwrap();
    writeln!(file, "{}", face_line(100.0, 400.0)).unwrap();
    file.flush().unwrap();

    let frames: Vec<LandmarkFrame> = FrameReader::open(file.path())
        .unwrap()
        .collect::<Result<Vec<_>>>()
        .unwrap();
    assert_eq!(frames.len(), 5);

    let mut tracker = DirectionTracker::from_config(&labeled_config()).unwrap();
    let mut updates: Vec<FrameUpdate> = Vec::new();
    let stats = tracker.run(frames, |update| updates.push(*update));

    assert_eq!(stats.processed, 3);
    assert_eq!(stats.skipped, 2);
    let indices: Vec<u64> = updates.iter().map(|u| u.frame_index).collect();
    assert_eq!(indices, vec![0, 2, 4]);
    assert!(updates[0].bucket.is_center());
    assert_eq!(updates[1].bucket.horizontal, HorizontalDirection::Left);
    assert_eq!(
        updates[2].bucket,
        DirectionBucket::new(HorizontalDirection::Left, VerticalDirection::Down)
    );
    assert_eq!(updates[2].at_ms, 4 * 300);
}

#[test]
fn test_mediapipe_layout_skips_short_frames() {
    // Default layout expects a full face mesh; three keypoints are not enough
    let mut tracker = DirectionTracker::from_config(&Config::default()).unwrap();
    assert!(tracker.process_frame(&face_frame(320.0, 240.0)).is_none());
    assert_eq!(tracker.stats().skipped, 1);
}

#[test]
fn test_random_positions_match_thresholds() {
    let thresholds = Thresholds::default();
    let mut tracker = DirectionTracker::from_config(&labeled_config()).unwrap();
    let mut rng = StdRng::seed_from_u64(12345);

    for _ in 0..500 {
        let x: f64 = rng.gen_range(0.0..640.0);
        let y: f64 = rng.gen_range(0.0..480.0);
        let update = tracker.process_frame(&face_frame(x, y)).unwrap();

        let expected = thresholds.classify(x.round(), y.round());
        assert_eq!(update.bucket, expected, "position ({x}, {y})");
        assert_eq!(tracker.current_bucket(), expected);
    }
}

#[test]
fn test_tracker_drives_key_bridge() {
    let config = labeled_config();
    let mut tracker = DirectionTracker::from_config(&config).unwrap();
    let mut bridge = KeyBridge::new(config.keys.timing).unwrap();
    let mut events: Vec<KeyEvent> = Vec::new();

    // Look left for three frames, lose the face, then return to center
    let frames = vec![
        face_frame(100.0, 240.0),
        face_frame(105.0, 240.0),
        LandmarkFrame::empty(),
        face_frame(320.0, 240.0),
    ];
    for frame in &frames {
        if let Some(update) = tracker.process_frame(frame) {
            bridge.set_bucket(update.bucket, update.at_ms);
        }
        if let Some(now) = tracker.clock_ms() {
            events.extend(bridge.tick(now));
        }
    }

    let downs: Vec<(String, u64)> = events
        .iter()
        .filter(|e| e.kind == KeyEventKind::Down)
        .map(|e| (e.key.name(), e.at_ms))
        .collect();
    assert_eq!(
        downs,
        vec![
            ("l".to_string(), 0),
            ("ArrowLeft".to_string(), 0),
            ("l".to_string(), 300),
            ("ArrowLeft".to_string(), 300),
            ("l".to_string(), 600),
            ("ArrowLeft".to_string(), 600),
        ]
    );
    // Every press was released
    let ups = events.iter().filter(|e| e.kind == KeyEventKind::Up).count();
    assert_eq!(ups, downs.len());
    assert!(tracker.current_bucket().is_center());
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = labeled_config();
    config.thresholds.left = 200.0;
    config.keys.enabled = true;
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_missing_config_file_is_io_error() {
    let err = Config::from_file("does/not/exist.yaml").unwrap_err();
    assert!(matches!(err, face_direction::Error::Io(_)));
}

#[test]
fn test_update_json_shape() {
    let mut tracker = DirectionTracker::from_config(&labeled_config()).unwrap();
    let update = tracker.process_frame(&face_frame(500.0, 100.0)).unwrap();
    let value: serde_json::Value = serde_json::to_value(update).unwrap();

    assert_eq!(value["frame"], 0);
    assert_eq!(value["position"]["x"], 500);
    assert_eq!(value["bucket"]["horizontal"], "right");
    assert_eq!(value["bucket"]["vertical"], "up");
    assert_eq!(value["direction"]["confidence"], "normal");
    assert_eq!(value["changed"], true);
}

#[test]
fn test_out_of_order_timestamps_keep_key_events_ordered() {
    let config = labeled_config();
    let mut tracker = DirectionTracker::from_config(&config).unwrap();
    let mut bridge = KeyBridge::new(config.keys.timing).unwrap();
    let mut events: Vec<KeyEvent> = Vec::new();

    let frames = vec![
        face_frame(100.0, 240.0).with_timestamp(1_000),
        face_frame(320.0, 100.0).with_timestamp(400),
        face_frame(500.0, 240.0).with_timestamp(1_700),
    ];
    for frame in &frames {
        if let Some(update) = tracker.process_frame(frame) {
            bridge.set_bucket(update.bucket, update.at_ms);
        }
        if let Some(now) = tracker.clock_ms() {
            events.extend(bridge.tick(now));
        }
    }

    assert!(events.windows(2).all(|pair| pair[0].at_ms <= pair[1].at_ms));
    let first_up = events.iter().find(|e| e.key.name() == "u").unwrap();
    assert_eq!(first_up.at_ms, 1_000);
}
