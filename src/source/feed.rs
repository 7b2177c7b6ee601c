//! Wire format of the external track feed.
//!
//! Each message carries a camera id and a list of objects with normalized
//! bounding boxes. Objects are decoded individually so one malformed entry
//! is dropped with a warning without discarding the rest of the message.

use serde::Deserialize;
use tracing::warn;

use crate::error::FeedError;
use crate::geometry::BoundingBox;
use crate::tracker::{Track, TrackId};

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(rename = "cameraId")]
    camera_id: String,
    objects: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    id: RawId,
    bbox: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(u64),
    Name(String),
}

impl From<RawId> for TrackId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Num(n) => TrackId::Num(n),
            RawId::Name(s) => TrackId::Name(s),
        }
    }
}

/// Parse a feed message into track projections for the active camera.
///
/// Malformed objects (missing/null id, bbox not 4 finite numbers) are
/// dropped individually. Returns an error if the message as a whole is
/// unusable: not JSON, addressed to another camera, or without a single
/// valid object.
pub fn parse_message(raw: &str, active_camera: &str, now_ms: u64) -> Result<Vec<Track>, FeedError> {
    let message: RawMessage = serde_json::from_str(raw)?;

    if message.camera_id != active_camera {
        return Err(FeedError::WrongCamera {
            got: message.camera_id,
            active: active_camera.to_string(),
        });
    }

    let mut tracks = Vec::with_capacity(message.objects.len());
    for value in message.objects {
        match decode_object(value, now_ms) {
            Ok(track) => tracks.push(track),
            Err(reason) => warn!(camera = %active_camera, %reason, "dropping invalid feed object"),
        }
    }

    if tracks.is_empty() {
        return Err(FeedError::NoValidObjects);
    }
    Ok(tracks)
}

fn decode_object(value: serde_json::Value, now_ms: u64) -> Result<Track, String> {
    let object: RawObject =
        serde_json::from_value(value).map_err(|e| format!("bad object shape: {e}"))?;

    if object.bbox.len() != 4 {
        return Err(format!("bbox has {} elements, expected 4", object.bbox.len()));
    }
    if object.bbox.iter().any(|v| !v.is_finite()) {
        return Err("bbox contains non-finite coordinates".to_string());
    }

    let bbox = BoundingBox::new(
        object.bbox[0] as f32,
        object.bbox[1] as f32,
        object.bbox[2] as f32,
        object.bbox[3] as f32,
    );
    Ok(Track::new(object.id.into(), bbox.center(), bbox, now_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_message() {
        let raw = r#"{
            "cameraId": "cam-1",
            "objects": [
                {"id": 7, "bbox": [0.1, 0.2, 0.3, 0.4]},
                {"id": "plate-9", "bbox": [0.5, 0.5, 0.7, 0.8]}
            ]
        }"#;
        let tracks = parse_message(raw, "cam-1", 1000).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, TrackId::Num(7));
        assert_eq!(tracks[1].id, TrackId::Name("plate-9".to_string()));
        assert!((tracks[0].centroid.x - 0.2).abs() < 1e-6);
        assert_eq!(tracks[0].last_seen_ms, 1000);
    }

    #[test]
    fn test_invalid_object_dropped_individually() {
        let raw = r#"{
            "cameraId": "cam-1",
            "objects": [
                {"id": null, "bbox": [0.1, 0.2, 0.3, 0.4]},
                {"id": 2, "bbox": [0.1, 0.2, 0.3]},
                {"id": 3, "bbox": [0.1, 0.2, 0.3, 0.4]}
            ]
        }"#;
        let tracks = parse_message(raw, "cam-1", 0).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, TrackId::Num(3));
    }

    #[test]
    fn test_wrong_camera_rejected() {
        let raw = r#"{"cameraId": "cam-2", "objects": [{"id": 1, "bbox": [0.0, 0.0, 0.1, 0.1]}]}"#;
        assert!(matches!(
            parse_message(raw, "cam-1", 0),
            Err(FeedError::WrongCamera { .. })
        ));
    }

    #[test]
    fn test_all_objects_invalid() {
        let raw = r#"{"cameraId": "cam-1", "objects": [{"id": null, "bbox": []}]}"#;
        assert!(matches!(
            parse_message(raw, "cam-1", 0),
            Err(FeedError::NoValidObjects)
        ));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_message("garbage", "cam-1", 0),
            Err(FeedError::Parse(_))
        ));
    }
}
