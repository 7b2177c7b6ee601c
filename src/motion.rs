mod blob;
mod detector;

pub use blob::{Blob, BlobExtractor};
pub use detector::{MotionConfig, MotionDetector, MotionMask};
