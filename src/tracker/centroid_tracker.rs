//! Greedy nearest-centroid tracker used as a fallback when no external
//! track feed is available.
//!
//! Intentionally simple: no motion model, no appearance model, single-pass
//! greedy association. It trades robustness for predictable, cheap,
//! explainable behavior, which is what a fallback needs. A proper
//! assignment solver could be substituted behind the same interface without
//! touching any other component.

use crate::motion::Blob;
use crate::tracker::track::{Track, TrackId};

/// Configuration for the local tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Maximum centroid distance (normalized, Euclidean) for a blob to be
    /// associated with an existing track.
    pub max_distance: f32,
    /// A track unmatched for longer than this window is removed.
    pub expiry_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_distance: 0.15,
            expiry_ms: 2000,
        }
    }
}

/// Local motion tracker: persistent track identities over blob lists.
#[derive(Debug)]
pub struct CentroidTracker {
    config: TrackerConfig,
    tracks: Vec<Track>,
    next_id: u64,
}

impl CentroidTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    /// Current live track list.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Advance the tracker by one frame's blob list.
    ///
    /// Expires stale tracks, greedily matches each blob to the nearest
    /// unmatched track (ties resolve to the lowest track id), and creates
    /// new tracks for unmatched blobs. Tracks that missed this frame are
    /// kept until the expiry window lapses.
    pub fn update(&mut self, blobs: &[Blob], now_ms: u64) -> &[Track] {
        let expiry = self.config.expiry_ms;
        self.tracks
            .retain(|t| now_ms.saturating_sub(t.last_seen_ms) <= expiry);

        // Tracks are stored in id order, so a strict `<` comparison during
        // the scan resolves distance ties to the lowest id.
        let mut consumed = vec![false; self.tracks.len()];

        for blob in blobs {
            let mut best: Option<(usize, f32)> = None;
            for (i, track) in self.tracks.iter().enumerate() {
                if consumed[i] {
                    continue;
                }
                let dist = track.centroid.distance(&blob.centroid);
                if dist < self.config.max_distance
                    && best.is_none_or(|(_, best_dist)| dist < best_dist)
                {
                    best = Some((i, dist));
                }
            }

            match best {
                Some((i, _)) => {
                    let track = &mut self.tracks[i];
                    track.centroid = blob.centroid;
                    track.bbox = blob.bbox;
                    track.age += 1;
                    track.last_seen_ms = now_ms;
                    consumed[i] = true;
                }
                None => {
                    let id = TrackId::Num(self.next_id);
                    self.next_id += 1;
                    self.tracks
                        .push(Track::new(id, blob.centroid, blob.bbox, now_ms));
                    consumed.push(true);
                }
            }
        }

        &self.tracks
    }

    /// Drop all tracks (camera switch). Track ids keep rising so stale
    /// downstream state can never alias a new track.
    pub fn reset(&mut self) {
        self.tracks.clear();
    }
}

impl Default for CentroidTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
