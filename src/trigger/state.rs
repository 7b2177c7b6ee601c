//! Per-track crossing bookkeeping for the line trigger.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::geometry::Point;
use crate::tracker::TrackId;

/// Last evaluated line-side and position for one track.
#[derive(Debug, Clone)]
pub struct CrossingState {
    /// Signed side value at the last evaluation.
    pub side: f32,
    /// Centroid at the last evaluation.
    pub center: Point,
    /// When this track last fired the line trigger.
    pub last_cross_ms: Option<u64>,
    /// When this entry was last touched; drives pruning.
    pub updated_ms: u64,
}

/// Map from track id to crossing state with explicit lifetime bounds.
///
/// Tracks churn constantly (the local tracker hands out fresh ids for every
/// reappearing object), so entries that stop being updated are pruned to
/// keep the table bounded.
#[derive(Debug, Default)]
pub struct CrossingTable {
    entries: HashMap<TrackId, CrossingState>,
}

impl CrossingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_mut(&mut self, id: &TrackId) -> Option<&mut CrossingState> {
        self.entries.get_mut(id)
    }

    /// Insert the first observation of a track.
    pub fn observe(&mut self, id: TrackId, side: f32, center: Point, now_ms: u64) {
        self.entries.insert(
            id,
            CrossingState {
                side,
                center,
                last_cross_ms: None,
                updated_ms: now_ms,
            },
        );
    }

    /// Return the existing state for a track, or record the first
    /// observation and return `None` (a first observation never fires).
    pub fn get_or_observe(
        &mut self,
        id: &TrackId,
        side: f32,
        center: Point,
        now_ms: u64,
    ) -> Option<&mut CrossingState> {
        match self.entries.entry(id.clone()) {
            Entry::Occupied(entry) => Some(entry.into_mut()),
            Entry::Vacant(entry) => {
                entry.insert(CrossingState {
                    side,
                    center,
                    last_cross_ms: None,
                    updated_ms: now_ms,
                });
                None
            }
        }
    }

    /// Remove entries not updated within `ttl_ms`.
    pub fn prune(&mut self, now_ms: u64, ttl_ms: u64) {
        self.entries
            .retain(|_, state| now_ms.saturating_sub(state.updated_ms) <= ttl_ms);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_removes_stale_entries() {
        let mut table = CrossingTable::new();
        table.observe(TrackId::Num(1), 1.0, Point::new(0.5, 0.5), 0);
        table.observe(TrackId::Num(2), -1.0, Point::new(0.2, 0.2), 5000);

        table.prune(9000, 8000);
        assert_eq!(table.len(), 2);

        table.prune(9000, 3000);
        assert_eq!(table.len(), 1);
        assert!(table.get_mut(&TrackId::Num(2)).is_some());
    }
}
