//! Core modules for facesim

pub mod source;
pub mod emotion;
pub mod distance;
pub mod history;
pub mod session;
pub mod detector;
pub mod assembler;
pub mod invocation;
pub mod api;

pub use source::{DefaultSource, RngSource, ScriptedSource, SignalSource};
pub use emotion::EmotionSampler;
pub use distance::DistanceEngine;
pub use history::DistanceHistory;
pub use session::{DistanceSession, save_session, load_session};
pub use detector::{FaceBox, FaceDetector, ImageFormat, NullDetector, detect_face_points};
pub use assembler::{SimulationContext, decode_payload, fallback_distance_response, fallback_emotion_response};
pub use invocation::{run_invocation, Invocation, Mode};
pub use api::{create_router, create_router_with_detector, handle_frame, process_text_frame, run_server};
