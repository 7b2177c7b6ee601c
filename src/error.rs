//! Error types for the external track feed boundary.
//!
//! Most failure modes in this crate are recoverable by design (skip the
//! tick, drop the object, fall back to the local tracker) and are logged
//! rather than propagated. The feed parser is the one place a caller needs
//! a structured error to decide whether a message was usable at all.

use thiserror::Error;

/// Failure to extract usable track objects from a feed message.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The message body was not valid JSON of the expected shape.
    #[error("malformed feed message: {0}")]
    Parse(#[from] serde_json::Error),

    /// The message addressed a camera other than the active one.
    #[error("message for camera {got:?} ignored (active camera {active:?})")]
    WrongCamera { got: String, active: String },

    /// The message parsed but every object in it failed validation.
    #[error("feed message carried no valid objects")]
    NoValidObjects,
}
