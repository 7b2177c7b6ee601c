//! Arbitration between the external track feed and the local tracker.
//!
//! The backend's OCR pipeline is the authoritative track producer whenever
//! it is connected and delivering valid objects for the active camera; the
//! local motion tracker only runs while that feed is down or stale. The
//! arbiter owns that decision plus the reconnect/backoff bookkeeping, while
//! the actual connection lives at the system boundary and reports in via
//! [`SourceArbiter::handle_message`] and [`SourceArbiter::handle_disconnect`].

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::source::feed;
use crate::tracker::Track;

/// Which producer is currently authoritative for the track list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingSource {
    /// No camera selected, or nothing has produced tracks yet.
    #[default]
    None,
    /// External feed delivering valid objects.
    External,
    /// Local motion tracker supplying results.
    Local,
}

impl fmt::Display for TrackingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingSource::None => write!(f, "none"),
            TrackingSource::External => write!(f, "external"),
            TrackingSource::Local => write!(f, "local"),
        }
    }
}

/// Arbiter timing configuration.
#[derive(Debug, Clone)]
pub struct ArbiterConfig {
    /// Delay before a reconnect attempt after the feed drops.
    pub reconnect_backoff_ms: u64,
    /// An external feed silent for longer than this is considered down.
    pub stale_after_ms: u64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            reconnect_backoff_ms: 2500,
            stale_after_ms: 3000,
        }
    }
}

/// Chooses between the external feed and the local tracker.
#[derive(Debug)]
pub struct SourceArbiter {
    config: ArbiterConfig,
    active_camera: Option<String>,
    source: TrackingSource,
    external_tracks: Vec<Track>,
    last_message_ms: u64,
    next_reconnect_ms: Option<u64>,
}

impl SourceArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            config,
            active_camera: None,
            source: TrackingSource::None,
            external_tracks: Vec::new(),
            last_message_ms: 0,
            next_reconnect_ms: None,
        }
    }

    pub fn source(&self) -> TrackingSource {
        self.source
    }

    pub fn active_camera(&self) -> Option<&str> {
        self.active_camera.as_deref()
    }

    /// External track projections; meaningful only while the source is
    /// [`TrackingSource::External`].
    pub fn external_tracks(&self) -> &[Track] {
        &self.external_tracks
    }

    /// Whether the local tracker should run its per-frame tick loop.
    pub fn local_tracking_active(&self) -> bool {
        self.source != TrackingSource::External
    }

    /// Select the active camera, cancelling pending reconnects and
    /// discarding all feed state from the previous selection.
    pub fn set_camera(&mut self, camera_id: impl Into<String>) {
        let camera_id = camera_id.into();
        info!(camera = %camera_id, "camera selected, resetting tracking source");
        self.active_camera = Some(camera_id);
        self.source = TrackingSource::None;
        self.external_tracks.clear();
        self.last_message_ms = 0;
        self.next_reconnect_ms = None;
    }

    /// Ingest a raw feed message.
    ///
    /// A message with at least one valid object for the active camera makes
    /// the external feed authoritative. Unusable messages leave the state
    /// untouched; they are recoverable conditions, not failures.
    pub fn handle_message(&mut self, raw: &str, now_ms: u64) -> Result<(), FeedError> {
        let Some(camera) = self.active_camera.clone() else {
            debug!("feed message ignored, no active camera");
            return Ok(());
        };

        match feed::parse_message(raw, &camera, now_ms) {
            Ok(tracks) => {
                self.external_tracks = tracks;
                self.last_message_ms = now_ms;
                self.next_reconnect_ms = None;
                self.transition(TrackingSource::External);
                Ok(())
            }
            Err(err @ FeedError::WrongCamera { .. }) => {
                debug!(%err, "feed message for inactive camera ignored");
                Err(err)
            }
            Err(err) => {
                warn!(%err, "unusable feed message");
                Err(err)
            }
        }
    }

    /// The feed connection closed or errored: fall back to local tracking
    /// and schedule a reconnect after the backoff.
    pub fn handle_disconnect(&mut self, now_ms: u64) {
        if self.active_camera.is_none() {
            return;
        }
        self.external_tracks.clear();
        self.next_reconnect_ms = Some(now_ms + self.config.reconnect_backoff_ms);
        self.transition(TrackingSource::Local);
    }

    /// Degrade a silent external feed to local tracking. Called once per
    /// tick.
    pub fn check_staleness(&mut self, now_ms: u64) {
        if self.source == TrackingSource::External
            && now_ms.saturating_sub(self.last_message_ms) > self.config.stale_after_ms
        {
            warn!(
                silent_ms = now_ms.saturating_sub(self.last_message_ms),
                "external feed stale"
            );
            self.handle_disconnect(now_ms);
        }
    }

    /// Whether a scheduled reconnect attempt is due. Reconnects repeat
    /// indefinitely while a camera is selected: a failed attempt ends in
    /// [`SourceArbiter::handle_disconnect`], which schedules the next one.
    pub fn reconnect_due(&self, now_ms: u64) -> bool {
        self.active_camera.is_some() && self.next_reconnect_ms.is_some_and(|at| now_ms >= at)
    }

    /// The boundary has started a reconnect attempt for the pending
    /// schedule.
    pub fn mark_reconnect_started(&mut self) {
        self.next_reconnect_ms = None;
    }

    fn transition(&mut self, to: TrackingSource) {
        if self.source != to {
            info!(from = %self.source, to = %to, "tracking source changed");
            self.source = to;
        }
    }
}

impl Default for SourceArbiter {
    fn default() -> Self {
        Self::new(ArbiterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(camera: &str, id: u64) -> String {
        format!(r#"{{"cameraId": "{camera}", "objects": [{{"id": {id}, "bbox": [0.1, 0.1, 0.3, 0.3]}}]}}"#)
    }

    #[test]
    fn test_valid_message_switches_to_external() {
        let mut arbiter = SourceArbiter::default();
        arbiter.set_camera("cam-1");
        assert_eq!(arbiter.source(), TrackingSource::None);

        arbiter.handle_message(&message("cam-1", 5), 100).unwrap();
        assert_eq!(arbiter.source(), TrackingSource::External);
        assert_eq!(arbiter.external_tracks().len(), 1);
        assert!(!arbiter.local_tracking_active());
    }

    #[test]
    fn test_disconnect_falls_back_to_local() {
        let mut arbiter = SourceArbiter::default();
        arbiter.set_camera("cam-1");
        arbiter.handle_message(&message("cam-1", 5), 100).unwrap();

        arbiter.handle_disconnect(200);
        assert_eq!(arbiter.source(), TrackingSource::Local);
        assert!(arbiter.local_tracking_active());
        assert!(arbiter.external_tracks().is_empty());

        // Backoff: not due immediately, due after the configured delay.
        assert!(!arbiter.reconnect_due(1000));
        assert!(arbiter.reconnect_due(2700));
    }

    #[test]
    fn test_feed_resume_returns_to_external() {
        let mut arbiter = SourceArbiter::default();
        arbiter.set_camera("cam-1");
        arbiter.handle_disconnect(0);
        assert_eq!(arbiter.source(), TrackingSource::Local);

        arbiter.handle_message(&message("cam-1", 9), 5000).unwrap();
        assert_eq!(arbiter.source(), TrackingSource::External);
        assert!(!arbiter.reconnect_due(10_000));
    }

    #[test]
    fn test_stale_feed_degrades_to_local() {
        let mut arbiter = SourceArbiter::default();
        arbiter.set_camera("cam-1");
        arbiter.handle_message(&message("cam-1", 5), 100).unwrap();

        arbiter.check_staleness(2000);
        assert_eq!(arbiter.source(), TrackingSource::External);

        arbiter.check_staleness(3200);
        assert_eq!(arbiter.source(), TrackingSource::Local);
    }

    #[test]
    fn test_wrong_camera_message_leaves_state_untouched() {
        let mut arbiter = SourceArbiter::default();
        arbiter.set_camera("cam-1");
        let result = arbiter.handle_message(&message("cam-2", 5), 100);
        assert!(result.is_err());
        assert_eq!(arbiter.source(), TrackingSource::None);
        assert!(arbiter.external_tracks().is_empty());
    }

    #[test]
    fn test_camera_switch_cancels_reconnects() {
        let mut arbiter = SourceArbiter::default();
        arbiter.set_camera("cam-1");
        arbiter.handle_disconnect(0);
        assert!(arbiter.reconnect_due(5000));

        arbiter.set_camera("cam-2");
        assert!(!arbiter.reconnect_due(5000));
        assert_eq!(arbiter.source(), TrackingSource::None);
    }

    #[test]
    fn test_mark_reconnect_started_clears_schedule() {
        let mut arbiter = SourceArbiter::default();
        arbiter.set_camera("cam-1");
        arbiter.handle_disconnect(0);
        assert!(arbiter.reconnect_due(3000));
        arbiter.mark_reconnect_started();
        assert!(!arbiter.reconnect_due(3000));
    }
}
