//! Error taxonomy for the simulator
//!
//! None of these reach a caller of the emotion or distance paths: the
//! assembler turns every one of them into a fallback response. Only face-point
//! detection reports them outward.

use thiserror::Error;

/// Errors raised while decoding input or generating a reading
#[derive(Error, Debug)]
pub enum SimError {
    /// Payload is not valid for the transport encoding
    #[error("Invalid payload encoding: {0}")]
    InputDecode(String),

    /// A sampler or random-walk computation failed
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Generator produced zero entries
    #[error("Generator returned no readings")]
    EmptyResult,

    /// Face-point detection could not run on the decoded image
    #[error("{0}")]
    Detection(String),

    /// Invalid tunables
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Short machine-readable kind (for logging)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputDecode(_) => "input_decode",
            Self::Generation(_) => "generation",
            Self::EmptyResult => "empty_result",
            Self::Detection(_) => "detection",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = SimError::InputDecode("Invalid padding".to_string());
        assert_eq!(err.to_string(), "Invalid payload encoding: Invalid padding");
        assert_eq!(err.kind(), "input_decode");
    }

    #[test]
    fn test_detection_message_is_bare() {
        let err = SimError::Detection("Image decode failed".to_string());
        assert_eq!(err.to_string(), "Image decode failed");
    }
}
