use std::fmt;

use crate::pipeline::frame::FrameView;

/// Opaque reference to an encoded snapshot image, produced by the external
/// encoding collaborator (typically a storage key or data URI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRef(pub String);

impl fmt::Display for SnapshotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encoder turning the current frame into an attachable snapshot.
///
/// Encoding may fail; the engine then emits the capture event without a
/// snapshot and reports the failure once, without retrying.
pub trait SnapshotEncoder {
    type Error: fmt::Display;

    fn encode(&mut self, frame: &FrameView<'_>) -> Result<SnapshotRef, Self::Error>;
}
