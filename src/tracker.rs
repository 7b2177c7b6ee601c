mod centroid_tracker;
mod track;

pub use centroid_tracker::{CentroidTracker, TrackerConfig};
pub use track::{Track, TrackId};
