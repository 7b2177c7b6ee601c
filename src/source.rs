mod arbiter;
mod feed;

pub use arbiter::{ArbiterConfig, SourceArbiter, TrackingSource};
pub use feed::parse_message;
