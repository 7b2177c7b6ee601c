//! The per-tick pipeline combining all components.

use tracing::{debug, warn};

use crate::motion::{BlobExtractor, MotionConfig, MotionDetector};
use crate::pipeline::frame::FrameSource;
use crate::pipeline::sink::CaptureSink;
use crate::pipeline::snapshot::SnapshotEncoder;
use crate::source::{ArbiterConfig, SourceArbiter, TrackingSource};
use crate::tracker::{CentroidTracker, Track, TrackerConfig};
use crate::trigger::{CaptureEvent, TriggerConfig, TriggerEngine};

/// Aggregated configuration for every component in the pipeline. Each
/// empirical threshold is reachable here; the defaults are the values tuned
/// in production.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub motion: MotionConfig,
    pub tracker: TrackerConfig,
    pub arbiter: ArbiterConfig,
    pub trigger: TriggerConfig,
    pub min_blob_area: Option<usize>,
}

/// The tracking + capture-trigger engine.
///
/// Drives the fixed per-tick order: motion detection → blob extraction →
/// local tracking (only while the external feed is not authoritative) →
/// source arbitration → trigger evaluation → capture emission. Everything
/// runs synchronously inside [`CaptureEngine::tick`], so the trigger engine
/// always sees a track list and motion mask from the same tick.
pub struct CaptureEngine<F, E, S> {
    frame_source: F,
    encoder: E,
    sink: S,
    detector: MotionDetector,
    extractor: BlobExtractor,
    tracker: CentroidTracker,
    arbiter: SourceArbiter,
    triggers: TriggerEngine,
}

impl<F, E, S> CaptureEngine<F, E, S>
where
    F: FrameSource,
    E: SnapshotEncoder,
    S: CaptureSink,
{
    pub fn new(frame_source: F, encoder: E, sink: S, config: EngineConfig) -> Self {
        let min_area = config
            .min_blob_area
            .unwrap_or(BlobExtractor::DEFAULT_MIN_AREA);
        Self {
            frame_source,
            encoder,
            sink,
            detector: MotionDetector::new(config.motion),
            extractor: BlobExtractor::new(min_area),
            tracker: CentroidTracker::new(config.tracker),
            arbiter: SourceArbiter::new(config.arbiter),
            triggers: TriggerEngine::new(config.trigger),
        }
    }

    pub fn with_defaults(frame_source: F, encoder: E, sink: S) -> Self {
        Self::new(frame_source, encoder, sink, EngineConfig::default())
    }

    /// Select the active camera: resets motion state, local tracks, trigger
    /// bookkeeping and feed arbitration so nothing leaks across cameras.
    pub fn set_camera(&mut self, camera_id: impl Into<String>) {
        self.detector.reset();
        self.tracker.reset();
        self.triggers.reset();
        self.arbiter.set_camera(camera_id);
    }

    /// Forward a raw external feed message to the arbiter.
    pub fn handle_feed_message(&mut self, raw: &str, now_ms: u64) {
        // Recoverable either way; the arbiter has already logged the detail.
        let _ = self.arbiter.handle_message(raw, now_ms);
    }

    /// Forward a feed connection loss to the arbiter.
    pub fn handle_feed_disconnect(&mut self, now_ms: u64) {
        self.arbiter.handle_disconnect(now_ms);
    }

    /// Run one tick of the pipeline.
    ///
    /// Skips entirely (no state change) while the frame source is not
    /// ready.
    pub fn tick(&mut self, now_ms: u64) {
        let Some(frame) = self.frame_source.frame() else {
            debug!("frame source not ready, skipping tick");
            return;
        };

        let mask = self.detector.process(&frame);
        self.arbiter.check_staleness(now_ms);

        if self.arbiter.local_tracking_active() {
            let blobs = match &mask {
                Some(mask) => self.extractor.extract(mask),
                None => Vec::new(),
            };
            self.tracker.update(&blobs, now_ms);
        }

        let tracks: &[Track] = if self.arbiter.source() == TrackingSource::External {
            self.arbiter.external_tracks()
        } else {
            self.tracker.tracks()
        };

        let hits = self.triggers.evaluate(tracks, mask.as_ref(), now_ms);
        if hits.is_empty() {
            return;
        }

        // One snapshot covers every event fired in this tick.
        let snapshot = match self.encoder.encode(&frame) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(%err, "snapshot encoding failed, emitting capture without image");
                None
            }
        };

        for hit in hits {
            self.sink.on_capture(CaptureEvent {
                subject: hit.into(),
                timestamp_ms: now_ms,
                snapshot: snapshot.clone(),
            });
        }
    }

    pub fn source(&self) -> TrackingSource {
        self.arbiter.source()
    }

    pub fn arbiter(&self) -> &SourceArbiter {
        &self.arbiter
    }

    pub fn arbiter_mut(&mut self) -> &mut SourceArbiter {
        &mut self.arbiter
    }

    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }

    pub fn triggers(&self) -> &TriggerEngine {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut TriggerEngine {
        &mut self.triggers
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
