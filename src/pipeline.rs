//! Tick orchestration and the traits at the system boundary.
//!
//! Frame decoding, snapshot encoding and capture persistence all live
//! outside this crate; implement the traits here to connect them. The
//! engine itself never blocks inside a tick: boundary events (new frame,
//! feed message, disconnect) update state that the next tick consumes.

mod engine;
mod frame;
mod sink;
mod snapshot;

pub use engine::{CaptureEngine, EngineConfig};
pub use frame::{FrameSource, FrameView};
pub use sink::CaptureSink;
pub use snapshot::{SnapshotEncoder, SnapshotRef};
