//! Wire shapes shared by the CLI and the streaming service

use serde::{Deserialize, Serialize};

use crate::types::{DistanceReading, EmotionReading};

/// `{"facePoints": [...]}`
///
/// The key name is fixed by the visualizer regardless of what the points are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacePointsResponse<T> {
    #[serde(rename = "facePoints")]
    pub face_points: Vec<T>,
}

impl<T> FacePointsResponse<T> {
    pub fn new(face_points: Vec<T>) -> Self {
        Self { face_points }
    }

    pub fn len(&self) -> usize {
        self.face_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.face_points.is_empty()
    }
}

pub type EmotionResponse = FacePointsResponse<EmotionReading>;
pub type DistanceResponse = FacePointsResponse<DistanceReading>;

/// Centre of a detected face, in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacePoint {
    pub x: i32,
    pub y: i32,
}

impl FacePoint {
    /// Centre of an `(x, y, w, h)` bounding box
    pub fn from_bounds(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x: x + w / 2,
            y: y + h / 2,
        }
    }
}

/// Result of a face-point detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetectionResponse {
    Failed {
        error: String,
        #[serde(rename = "facePoints")]
        face_points: Option<Vec<FacePoint>>,
    },
    Found(FacePointsResponse<FacePoint>),
}

impl DetectionResponse {
    pub fn found(points: Vec<FacePoint>) -> Self {
        Self::Found(FacePointsResponse::new(points))
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
            face_points: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EmotionLabel;

    #[test]
    fn test_face_points_key() {
        let resp = EmotionResponse::new(vec![EmotionReading::new(EmotionLabel::Neutral, 1)]);
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"facePoints":[{"label":"neutral","value":1}]}"#);
    }

    #[test]
    fn test_bounds_centre_truncates() {
        assert_eq!(FacePoint::from_bounds(10, 20, 31, 41), FacePoint { x: 25, y: 40 });
    }

    #[test]
    fn test_detection_failure_shape() {
        let json = serde_json::to_string(&DetectionResponse::failed("Image decode failed")).unwrap();
        assert_eq!(json, r#"{"error":"Image decode failed","facePoints":null}"#);
    }

    #[test]
    fn test_detection_found_shape() {
        let json = serde_json::to_string(&DetectionResponse::found(vec![FacePoint { x: 3, y: 4 }])).unwrap();
        assert_eq!(json, r#"{"facePoints":[{"x":3,"y":4}]}"#);
    }
}
