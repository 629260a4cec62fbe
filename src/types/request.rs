//! Frame requests sent by the visualizer

use serde::{Deserialize, Serialize};

/// Which visualization a frame feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Face-point heatmap (detector)
    Heatmap,
    /// Emotion pie chart (sampler)
    Pie,
    /// Distance line chart (random walk)
    Line,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Heatmap => "heatmap",
            ServiceKind::Pie => "pie",
            ServiceKind::Line => "line",
        }
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heatmap" => Ok(ServiceKind::Heatmap),
            "pie" => Ok(ServiceKind::Pie),
            "line" => Ok(ServiceKind::Line),
            other => Err(format!("Unknown service type: {}", other)),
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `{"type": "...", "data": "<base64>"}`
///
/// Fields stay loose so that incomplete frames can be logged and dropped
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<String>,
}

/// `{"type": "...", "data": <response>}`
#[derive(Debug, Clone, Serialize)]
pub struct FrameReply {
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    pub data: serde_json::Value,
}

/// `{"error": "..."}`
#[derive(Debug, Clone, Serialize)]
pub struct FrameError {
    pub error: String,
}
