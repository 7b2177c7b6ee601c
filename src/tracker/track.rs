//! Track identity and per-track state shared by the local tracker and the
//! external feed projection.

use std::fmt;

use crate::geometry::{BoundingBox, Point};

/// Identifier of a tracked object.
///
/// The local tracker issues monotonically increasing numeric ids; the
/// external feed may deliver either numeric or string ids, which are kept
/// verbatim so capture events can be correlated with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrackId {
    Num(u64),
    Name(String),
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Num(n) => write!(f, "{n}"),
            TrackId::Name(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for TrackId {
    fn from(n: u64) -> Self {
        TrackId::Num(n)
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        TrackId::Name(s)
    }
}

/// A persistent identity for a spatially coherent moving region.
///
/// Owned by the local tracker for locally created tracks; externally
/// supplied tracks are transient projections refreshed on every feed
/// message.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    /// Centroid at the last matched frame.
    pub centroid: Point,
    /// Last observed extent.
    pub bbox: BoundingBox,
    /// Consecutive successful matches since creation.
    pub age: u32,
    /// Timestamp of the last update, engine milliseconds.
    pub last_seen_ms: u64,
}

impl Track {
    pub fn new(id: TrackId, centroid: Point, bbox: BoundingBox, now_ms: u64) -> Self {
        Self {
            id,
            centroid,
            bbox,
            age: 0,
            last_seen_ms: now_ms,
        }
    }
}
