use trackgate_rs::{
    CaptureEngine, CaptureEvent, CaptureSubject, FrameSource, FrameView, Point, SnapshotEncoder,
    SnapshotRef, TrackId, TrackingSource, TriggerLine,
};

struct StaticFrames {
    data: Vec<u8>,
}

impl StaticFrames {
    fn new() -> Self {
        Self {
            data: [80u8, 80, 80].repeat(64 * 64),
        }
    }
}

impl FrameSource for StaticFrames {
    fn frame(&self) -> Option<FrameView<'_>> {
        Some(FrameView::new(&self.data, 64, 64))
    }
}

struct NullEncoder;

impl SnapshotEncoder for NullEncoder {
    type Error = String;

    fn encode(&mut self, _frame: &FrameView<'_>) -> Result<SnapshotRef, Self::Error> {
        Ok(SnapshotRef("snapshot".to_string()))
    }
}

fn feed_message(camera: &str, id: u64, cy: f32) -> String {
    // A 0.10 x 0.08 box centered at (0.40, cy).
    format!(
        r#"{{"cameraId": "{camera}", "objects": [{{"id": {id}, "bbox": [{}, {}, {}, {}]}}]}}"#,
        0.35,
        cy - 0.04,
        0.45,
        cy + 0.04
    )
}

fn new_engine() -> CaptureEngine<StaticFrames, NullEncoder, Vec<CaptureEvent>> {
    let mut engine = CaptureEngine::with_defaults(StaticFrames::new(), NullEncoder, Vec::new());
    engine.set_camera("cam-1");
    engine
}

#[test]
fn test_external_feed_is_authoritative_while_connected() {
    let mut engine = new_engine();
    assert_eq!(engine.source(), TrackingSource::None);

    engine.handle_feed_message(&feed_message("cam-1", 7, 0.5), 100);
    assert_eq!(engine.source(), TrackingSource::External);

    engine.tick(150);
    // The local tracker does not run while the feed is authoritative.
    assert!(engine.tracker().tracks().is_empty());
    assert_eq!(engine.arbiter().external_tracks().len(), 1);
}

#[test]
fn test_disconnect_switches_to_local_within_one_tick() {
    let mut engine = new_engine();
    engine.handle_feed_message(&feed_message("cam-1", 7, 0.5), 100);
    assert_eq!(engine.source(), TrackingSource::External);

    engine.handle_feed_disconnect(200);
    assert_eq!(engine.source(), TrackingSource::Local);

    engine.tick(250);
    assert_eq!(engine.source(), TrackingSource::Local);
    // Reconnect is scheduled for after the backoff.
    assert!(!engine.arbiter().reconnect_due(300));
    assert!(engine.arbiter().reconnect_due(5000));
}

#[test]
fn test_silent_feed_goes_stale() {
    let mut engine = new_engine();
    engine.handle_feed_message(&feed_message("cam-1", 7, 0.5), 0);
    assert_eq!(engine.source(), TrackingSource::External);

    engine.tick(1000);
    assert_eq!(engine.source(), TrackingSource::External);

    // No message for longer than the staleness window.
    engine.tick(4000);
    assert_eq!(engine.source(), TrackingSource::Local);
}

#[test]
fn test_line_crossing_captures_exactly_once() {
    let mut engine = new_engine();
    engine.triggers_mut().set_line(Some(TriggerLine::new(
        Point::new(0.0, 0.76),
        Point::new(1.0, 0.76),
    )));

    // Track 7 approaches, crosses, and keeps going.
    engine.handle_feed_message(&feed_message("cam-1", 7, 0.74), 0);
    engine.tick(0);
    engine.handle_feed_message(&feed_message("cam-1", 7, 0.78), 100);
    engine.tick(100);
    engine.handle_feed_message(&feed_message("cam-1", 7, 0.85), 200);
    engine.tick(200);

    let events = engine.sink();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].subject, CaptureSubject::Track(TrackId::Num(7)));
    assert_eq!(events[0].timestamp_ms, 100);
    assert_eq!(events[0].snapshot, Some(SnapshotRef("snapshot".to_string())));
}

#[test]
fn test_camera_switch_discards_feed_state() {
    let mut engine = new_engine();
    engine.handle_feed_message(&feed_message("cam-1", 7, 0.5), 0);
    assert_eq!(engine.source(), TrackingSource::External);

    engine.set_camera("cam-2");
    assert_eq!(engine.source(), TrackingSource::None);
    assert!(engine.arbiter().external_tracks().is_empty());

    // Messages for the old camera are now ignored.
    engine.handle_feed_message(&feed_message("cam-1", 7, 0.5), 100);
    assert_eq!(engine.source(), TrackingSource::None);
}
