mod engine;
mod state;

pub use engine::{
    CaptureEvent, CaptureSubject, TriggerConfig, TriggerEngine, TriggerHit, TriggerZone,
};
pub use state::{CrossingState, CrossingTable};
