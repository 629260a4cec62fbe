//! One-shot invocation: one payload in, one JSON document out
//!
//! Emotion and distance runs always produce a response and exit 0. Detection
//! exits 1 when it fails. If anything outside the generators goes wrong
//! (unreadable input, a broken output stream), a minimal response that needs
//! no random draws is written instead.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::{error, info, warn};

use crate::core::assembler::{fallback_distance_response, fallback_emotion_response, SimulationContext};
use crate::core::detector::FaceDetector;
use crate::core::session::{load_session, save_session, DistanceSession};
use crate::core::source::RngSource;
use crate::types::{DetectionResponse, Result, SimConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Weighted emotion sample
    Emotion,
    /// Next distance reading plus history
    Distance,
    /// Face-point detection
    Detect,
}

/// What to run for one payload
#[derive(Debug, Clone)]
pub struct Invocation {
    pub mode: Mode,
    /// Reproducible stream; the wall clock seeds it otherwise
    pub seed: Option<u64>,
    /// Distance state carried between runs
    pub state: Option<PathBuf>,
}

impl Invocation {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            seed: None,
            state: None,
        }
    }
}

/// Handle one payload from `input`, writing the response to `out`
///
/// Returns the process exit code.
pub fn run_invocation<R: Read, W: Write>(
    invocation: &Invocation,
    config: SimConfig,
    detector: &dyn FaceDetector,
    input: R,
    mut out: W,
) -> i32 {
    info!(cwd = ?std::env::current_dir().ok(), mode = ?invocation.mode, "facesim started");

    match invoke(invocation, config, detector, input, &mut out) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Unexpected error");
            match emit_minimal_fallback(invocation.mode, &e.to_string(), &mut out) {
                Ok(code) => code,
                Err(e) => {
                    error!(error = %e, "Could not write fallback response");
                    1
                }
            }
        }
    }
}

fn invoke<R: Read, W: Write>(
    invocation: &Invocation,
    config: SimConfig,
    detector: &dyn FaceDetector,
    mut input: R,
    out: &mut W,
) -> Result<i32> {
    info!("Reading payload...");
    let mut payload = String::new();
    input.read_to_string(&mut payload)?;
    info!(chars = payload.len(), "Read payload");

    let source = match invocation.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_clock(),
    };
    let state_path = match invocation.mode {
        Mode::Distance => invocation.state.as_deref(),
        _ => None,
    };
    let session = state_path.map(restore_session).unwrap_or_default();
    let mut context = SimulationContext::resume(config, session, source);

    let (json, code) = match invocation.mode {
        Mode::Emotion => (serde_json::to_string(&context.emotion_response(&payload))?, 0),
        Mode::Distance => (serde_json::to_string(&context.distance_response(&payload))?, 0),
        Mode::Detect => {
            let response = context.detection_response(&payload, detector);
            let code = if response.is_failure() { 1 } else { 0 };
            (serde_json::to_string(&response)?, code)
        }
    };
    write_json(out, &json)?;

    if let Some(path) = state_path {
        if let Err(e) = save_session(&context.session(), path) {
            warn!(error = %e, path = %path.display(), "Could not save distance state");
        }
    }
    Ok(code)
}

/// Host-supplied state, or a fresh session if missing or unreadable
fn restore_session(path: &Path) -> DistanceSession {
    match load_session(path) {
        Ok(Some(session)) => {
            info!(readings = session.history.len(), "Resumed distance state");
            session
        }
        Ok(None) => DistanceSession::default(),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Ignoring unreadable distance state");
            DistanceSession::default()
        }
    }
}

/// Generator-independent response for the outermost failure path
fn emit_minimal_fallback<W: Write>(mode: Mode, reason: &str, out: &mut W) -> Result<i32> {
    let (json, code) = match mode {
        Mode::Emotion => (serde_json::to_string(&fallback_emotion_response())?, 0),
        Mode::Distance => (serde_json::to_string(&fallback_distance_response())?, 0),
        Mode::Detect => (serde_json::to_string(&DetectionResponse::failed(reason))?, 1),
    };
    write_json(out, &json)?;
    Ok(code)
}

fn write_json<W: Write>(out: &mut W, json: &str) -> Result<()> {
    writeln!(out, "{}", json)?;
    out.flush()?;
    Ok(())
}
