//! Core types for facesim

mod config;
mod distance;
mod emotion;
mod error;
mod request;
mod response;

pub use config::SimConfig;
pub use distance::{format_timestamp, DistanceReading, DistanceState, TrendDirection};
pub use emotion::{EmotionLabel, EmotionReading};
pub use error::{Result, SimError};
pub use request::{FrameError, FrameReply, FrameRequest, ServiceKind};
pub use response::{
    DetectionResponse, DistanceResponse, EmotionResponse, FacePoint, FacePointsResponse,
};
