//! Integration tests for one-shot invocations
//!
//! Tests the CLI path: input stream → response on the output stream → exit code

use facesim::core::{run_invocation, Invocation, Mode, NullDetector};
use facesim::types::SimConfig;
use facesim::OPTIMAL_DISTANCE;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::io::{self, Write};

/// Not valid UTF-8, so reading the payload fails
const GARBLED: &[u8] = &[0xFF, 0xFE, 0x00, 0xC3];

fn seeded(mode: Mode) -> Invocation {
    Invocation {
        seed: Some(42),
        ..Invocation::new(mode)
    }
}

fn run(invocation: &Invocation, input: &[u8]) -> (i32, String) {
    let mut out = Vec::new();
    let code = run_invocation(invocation, SimConfig::default(), &NullDetector, input, &mut out);
    (code, String::from_utf8(out).unwrap())
}

/// Rejects the first `failures` writes, then records everything
struct BrokenPipe {
    failures: usize,
    written: Vec<u8>,
}

impl BrokenPipe {
    fn new(failures: usize) -> Self {
        Self {
            failures,
            written: Vec::new(),
        }
    }
}

impl Write for BrokenPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Unreadable input on the emotion path: neutral fallback, exit 0
#[test]
fn test_garbled_input_emotion_fallback() {
    let (code, out) = run(&seeded(Mode::Emotion), GARBLED);

    assert_eq!(code, 0);
    assert_eq!(out, "{\"facePoints\":[{\"label\":\"neutral\",\"value\":1}]}\n");
}

/// Unreadable input on the distance path: one reading at the optimal distance
#[test]
fn test_garbled_input_distance_fallback() {
    let dir = std::env::temp_dir().join(format!("facesim_invocation_it_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("state.json");
    let invocation = Invocation {
        state: Some(path.clone()),
        ..seeded(Mode::Distance)
    };

    let (code, out) = run(&invocation, GARBLED);

    assert_eq!(code, 0);
    let json: Value = serde_json::from_str(&out).unwrap();
    let points = json["facePoints"].as_array().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["distance"], OPTIMAL_DISTANCE);
    assert!(points[0]["timestamp"].is_string());

    // Nothing was generated, so nothing is persisted
    assert!(!path.exists());
}

/// Detection on a payload that is not an image reports the error, exit 1
#[test]
fn test_detect_non_image_exits_nonzero() {
    let (code, out) = run(&seeded(Mode::Detect), b"aGVsbG8=");

    assert_eq!(code, 1);
    assert_eq!(out, "{\"error\":\"Image decode failed\",\"facePoints\":null}\n");
}

/// Unreadable input on the detect path still exits 1 with the error shape
#[test]
fn test_garbled_input_detect_fallback() {
    let (code, out) = run(&seeded(Mode::Detect), GARBLED);

    assert_eq!(code, 1);
    let json: Value = serde_json::from_str(&out).unwrap();
    assert!(json["error"].is_string());
    assert_eq!(json["facePoints"], Value::Null);
}

/// A failed write is followed by the minimal fallback
#[test]
fn test_failed_write_falls_back() {
    let mut out = BrokenPipe::new(1);
    let code = run_invocation(
        &seeded(Mode::Emotion),
        SimConfig::default(),
        &NullDetector,
        &b"/9j/4AAQSkZJRg=="[..],
        &mut out,
    );

    assert_eq!(code, 0);
    assert_eq!(
        String::from_utf8(out.written).unwrap(),
        "{\"facePoints\":[{\"label\":\"neutral\",\"value\":1}]}\n"
    );
}

/// When the fallback cannot be written either, the run fails
#[test]
fn test_unwritable_output_exits_nonzero() {
    let mut out = BrokenPipe::new(usize::MAX);
    let code = run_invocation(
        &seeded(Mode::Distance),
        SimConfig::default(),
        &NullDetector,
        &b"/9j/4AAQSkZJRg=="[..],
        &mut out,
    );

    assert_eq!(code, 1);
    assert!(out.written.is_empty());
}

/// State threads through the file across runs
#[test]
fn test_distance_runs_thread_state_file() {
    let dir = std::env::temp_dir().join(format!("facesim_invocation_state_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("state.json");
    let invocation = Invocation {
        state: Some(path.clone()),
        ..seeded(Mode::Distance)
    };

    let (_, first) = run(&invocation, b"iVBORw0KGgo=");
    let (code, second) = run(&invocation, b"iVBORw0KGgo=");

    assert_eq!(code, 0);
    let first: Value = serde_json::from_str(&first).unwrap();
    let second: Value = serde_json::from_str(&second).unwrap();
    assert_eq!(first["facePoints"].as_array().unwrap().len(), 1);
    assert_eq!(second["facePoints"].as_array().unwrap().len(), 2);
    assert_eq!(second["facePoints"][0], first["facePoints"][0]);

    let _ = std::fs::remove_dir_all(&dir);
}
