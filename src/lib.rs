//! Tracking and capture-trigger engine for a license-plate-recognition
//! operator console.
//!
//! The crate implements the in-process core of the console: a motion-based
//! fallback tracker (frame differencing, blob extraction, nearest-centroid
//! association), arbitration between an external track feed and the local
//! tracker, and trigger evaluation (line crossing and zone fill) with
//! one-shot-per-object and cooldown semantics.
//!
//! The surrounding system (HTTP dashboard, OCR backend, video decoding,
//! snapshot encoding) is reached through the traits in [`pipeline`]; the
//! engine itself is single-threaded and driven by a periodic tick.

pub mod error;
pub mod geometry;
pub mod motion;
pub mod pipeline;
pub mod source;
pub mod tracker;
pub mod trigger;

pub use error::FeedError;
pub use geometry::{BoundingBox, Point, Polygon, TriggerLine};
pub use motion::{Blob, BlobExtractor, MotionConfig, MotionDetector, MotionMask};
pub use pipeline::{
    CaptureEngine, CaptureSink, EngineConfig, FrameSource, FrameView, SnapshotEncoder, SnapshotRef,
};
pub use source::{ArbiterConfig, SourceArbiter, TrackingSource};
pub use tracker::{CentroidTracker, Track, TrackId, TrackerConfig};
pub use trigger::{
    CaptureEvent, CaptureSubject, TriggerConfig, TriggerEngine, TriggerHit, TriggerZone,
};
