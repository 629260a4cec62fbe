//! Response Assembler: decode → generate → package, with fallbacks
//!
//! The emotion and distance paths never fail outward: a bad payload or a
//! generator error becomes a well-formed fallback response. Detection is the
//! exception and reports its error.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::Engine as _;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::detector::{detect_face_points, FaceDetector};
use crate::core::distance::DistanceEngine;
use crate::core::emotion::EmotionSampler;
use crate::core::history::DistanceHistory;
use crate::core::session::DistanceSession;
use crate::core::source::{DefaultSource, SignalSource};
use crate::types::{
    DetectionResponse, DistanceReading, DistanceResponse, EmotionReading, EmotionResponse,
    FacePointsResponse, Result, ServiceKind, SimConfig, SimError,
};

/// Standard alphabet, padding required, non-zero trailing bits tolerated
const PAYLOAD_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, PAD.with_decode_allow_trailing_bits(true));

/// Decode a Base64 image payload, ignoring ASCII whitespace
///
/// An empty payload decodes to zero bytes.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    PAYLOAD_ENGINE
        .decode(compact.as_bytes())
        .map_err(|e| SimError::InputDecode(e.to_string()))
}

/// `{"facePoints": [{"label": "neutral", "value": 1}]}`
pub fn fallback_emotion_response() -> EmotionResponse {
    FacePointsResponse::new(vec![EmotionReading::fallback()])
}

/// `{"facePoints": [{"timestamp": now, "distance": 50}]}`
pub fn fallback_distance_response() -> DistanceResponse {
    FacePointsResponse::new(vec![DistanceReading::fallback()])
}

/// Per-session simulation state: one per connection, never shared
#[derive(Debug)]
pub struct SimulationContext<S = DefaultSource> {
    sampler: EmotionSampler,
    engine: DistanceEngine,
    history: DistanceHistory,
    source: S,
    frames: u64,
}

impl<S: SignalSource> SimulationContext<S> {
    /// Fresh state at the optimal distance
    pub fn with_source(config: SimConfig, source: S) -> Self {
        Self::resume(config, DistanceSession::default(), source)
    }

    /// Continue from a host-supplied session
    pub fn resume(config: SimConfig, session: DistanceSession, source: S) -> Self {
        let DistanceSession { state, mut history } = session;
        history.set_capacity(config.history_length);
        Self {
            sampler: EmotionSampler::new(),
            engine: DistanceEngine::with_state(config, state),
            history,
            source,
            frames: 0,
        }
    }

    /// Emotion path: 1-3 unique emotions, or `[neutral: 1]`
    pub fn emotion_response(&mut self, payload: &str) -> EmotionResponse {
        self.frames += 1;
        debug!(chars = payload.len(), "Emotion frame received");

        let image = match decode_payload(payload) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "Error processing image, sending fallback emotions");
                return fallback_emotion_response();
            }
        };
        debug!(bytes = image.len(), "Decoded payload");

        let readings = self.sampler.sample_or_fallback(&mut self.source);
        let response = FacePointsResponse::new(readings);
        info!(emotions = response.len(), "Sending emotion response");
        response
    }

    /// Distance path: the updated history, oldest first
    ///
    /// A decode failure leaves state and history untouched and returns the
    /// current history (or a single unpersisted fallback reading).
    pub fn distance_response(&mut self, payload: &str) -> DistanceResponse {
        self.frames += 1;
        debug!(chars = payload.len(), "Distance frame received");

        let image = match decode_payload(payload) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "Error processing image, sending existing history");
                return FacePointsResponse::new(self.history.snapshot_or_fallback());
            }
        };
        debug!(bytes = image.len(), "Decoded payload");

        let distance = self.engine.next_distance(&mut self.source);
        self.history.append(DistanceReading::now(distance));

        let response = FacePointsResponse::new(self.history.snapshot());
        info!(readings = response.len(), distance, "Sending distance response");
        response
    }

    /// Face-point path: centres of detected faces, or an explicit error
    pub fn detection_response(&mut self, payload: &str, detector: &dyn FaceDetector) -> DetectionResponse {
        self.frames += 1;

        let points = decode_payload(payload).and_then(|image| detect_face_points(detector, &image));
        match points {
            Ok(points) => {
                info!(faces = points.len(), "Sending face points");
                DetectionResponse::found(points)
            }
            Err(e) => {
                warn!(error = %e, "Face detection failed");
                DetectionResponse::failed(e.to_string())
            }
        }
    }

    /// Dispatch one frame; detection failures are returned as errors
    pub fn respond(&mut self, kind: ServiceKind, payload: &str, detector: &dyn FaceDetector) -> Result<Value> {
        let value = match kind {
            ServiceKind::Pie => serde_json::to_value(self.emotion_response(payload))?,
            ServiceKind::Line => serde_json::to_value(self.distance_response(payload))?,
            ServiceKind::Heatmap => match self.detection_response(payload, detector) {
                DetectionResponse::Failed { error, .. } => return Err(SimError::Detection(error)),
                found => serde_json::to_value(found)?,
            },
        };
        Ok(value)
    }

    /// Copy of the distance state and history for persistence
    pub fn session(&self) -> DistanceSession {
        DistanceSession {
            state: *self.engine.state(),
            history: self.history.clone(),
        }
    }

    pub fn engine(&self) -> &DistanceEngine {
        &self.engine
    }

    pub fn history(&self) -> &DistanceHistory {
        &self.history
    }

    /// Frames handled, successful or not
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

// =============================================================================
// TESTS
// =============================================================================
