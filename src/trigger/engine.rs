//! Trigger evaluation: line crossing and zone fill with one-shot and
//! cooldown semantics.

use tracing::debug;

use crate::geometry::{Polygon, TriggerLine};
use crate::motion::MotionMask;
use crate::pipeline::SnapshotRef;
use crate::tracker::{Track, TrackId};
use crate::trigger::state::CrossingTable;

/// A polygonal trigger zone: fires when motion fills enough of it.
#[derive(Debug, Clone)]
pub struct TriggerZone {
    pub polygon: Polygon,
    /// Fraction of the zone that must be motion-covered, in `(0, 1]`.
    pub min_fill: f32,
    /// Minimum time between successive fires of this zone.
    pub cooldown_ms: u64,
}

/// What a trigger fired for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerHit {
    /// A specific track crossed the trigger line.
    Line(TrackId),
    /// The zone at this index filled with motion. Zone fill is
    /// object-agnostic, so no track id is attached.
    Zone(usize),
}

/// The entity a capture event is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureSubject {
    Track(TrackId),
    Zone(usize),
}

impl From<TriggerHit> for CaptureSubject {
    fn from(hit: TriggerHit) -> Self {
        match hit {
            TriggerHit::Line(id) => CaptureSubject::Track(id),
            TriggerHit::Zone(idx) => CaptureSubject::Zone(idx),
        }
    }
}

/// A capture request emitted to the sink.
///
/// At most one event per (track, trigger) within a cooldown window. The
/// snapshot is absent when encoding failed; a missed single capture is
/// non-fatal.
#[derive(Debug, Clone)]
pub struct CaptureEvent {
    pub subject: CaptureSubject,
    pub timestamp_ms: u64,
    pub snapshot: Option<SnapshotRef>,
}

/// Trigger engine configuration.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Minimum time between line-crossing fires for the same track.
    pub line_cooldown_ms: u64,
    /// Minimum centroid displacement since the last evaluation for a sign
    /// flip to count as a crossing. Rejects jitter on a stationary object
    /// sitting on the line.
    pub min_movement: f32,
    /// Crossing-state entries idle longer than this are pruned.
    pub state_ttl_ms: u64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            line_cooldown_ms: 1500,
            min_movement: 0.005,
            state_ttl_ms: 8000,
        }
    }
}

/// Evaluates every track against the configured triggers once per tick.
#[derive(Debug)]
pub struct TriggerEngine {
    config: TriggerConfig,
    line: Option<TriggerLine>,
    zones: Vec<TriggerZone>,
    crossings: CrossingTable,
    zone_last_fired: Vec<Option<u64>>,
}

impl TriggerEngine {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            line: None,
            zones: Vec::new(),
            crossings: CrossingTable::new(),
            zone_last_fired: Vec::new(),
        }
    }

    pub fn line(&self) -> Option<&TriggerLine> {
        self.line.as_ref()
    }

    pub fn zones(&self) -> &[TriggerZone] {
        &self.zones
    }

    /// Replace the trigger line. Crossing state belongs to the old line's
    /// geometry and is discarded.
    pub fn set_line(&mut self, line: Option<TriggerLine>) {
        self.line = line;
        self.crossings.clear();
    }

    /// Replace the trigger zones, resetting their cooldown timers.
    pub fn set_zones(&mut self, zones: Vec<TriggerZone>) {
        self.zone_last_fired = vec![None; zones.len()];
        self.zones = zones;
    }

    /// Discard all per-track and per-zone bookkeeping (camera switch).
    pub fn reset(&mut self) {
        self.crossings.clear();
        for slot in &mut self.zone_last_fired {
            *slot = None;
        }
    }

    /// Evaluate all triggers for one tick.
    ///
    /// `mask` is the current motion mask; without one, zone-fill triggers
    /// are skipped for this tick (line crossing only needs centroids).
    pub fn evaluate(
        &mut self,
        tracks: &[Track],
        mask: Option<&MotionMask>,
        now_ms: u64,
    ) -> Vec<TriggerHit> {
        let mut hits = Vec::new();

        if let Some(line) = self.line {
            for track in tracks {
                if let Some(hit) = self.evaluate_line(&line, track, now_ms) {
                    hits.push(hit);
                }
            }
        }

        if let Some(mask) = mask {
            for idx in 0..self.zones.len() {
                if let Some(hit) = self.evaluate_zone(idx, mask, now_ms) {
                    hits.push(hit);
                }
            }
        }

        self.crossings.prune(now_ms, self.config.state_ttl_ms);
        hits
    }

    fn evaluate_line(
        &mut self,
        line: &TriggerLine,
        track: &Track,
        now_ms: u64,
    ) -> Option<TriggerHit> {
        let side = line.side_of(&track.centroid);

        // First observation only records state, never fires.
        let state = self
            .crossings
            .get_or_observe(&track.id, side, track.centroid, now_ms)?;

        let sign_flipped = side * state.side < 0.0;
        let moved = state.center.distance(&track.centroid) >= self.config.min_movement;
        let cooled = state
            .last_cross_ms
            .is_none_or(|at| now_ms.saturating_sub(at) > self.config.line_cooldown_ms);

        let mut hit = None;
        if sign_flipped && moved && cooled {
            debug!(track = %track.id, "line crossing detected");
            state.last_cross_ms = Some(now_ms);
            hit = Some(TriggerHit::Line(track.id.clone()));
        }

        // State always advances, crossing or not.
        state.side = side;
        state.center = track.centroid;
        state.updated_ms = now_ms;
        hit
    }

    fn evaluate_zone(&mut self, idx: usize, mask: &MotionMask, now_ms: u64) -> Option<TriggerHit> {
        let zone = &self.zones[idx];
        let fill = mask.fill_ratio(&zone.polygon);
        if fill < zone.min_fill {
            return None;
        }

        let cooled = self.zone_last_fired[idx]
            .is_none_or(|at| now_ms.saturating_sub(at) > zone.cooldown_ms);
        if !cooled {
            return None;
        }

        debug!(zone = idx, fill, "zone fill trigger");
        self.zone_last_fired[idx] = Some(now_ms);
        Some(TriggerHit::Zone(idx))
    }
}

impl Default for TriggerEngine {
    fn default() -> Self {
        Self::new(TriggerConfig::default())
    }
}
