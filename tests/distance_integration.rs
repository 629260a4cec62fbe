//! Integration tests for the distance path
//!
//! Tests the full path: payload → decode → random walk → history → JSON

use facesim::core::{load_session, save_session, RngSource, ScriptedSource, SimulationContext};
use facesim::types::{SimConfig, TrendDirection};
use facesim::{MAX_DISTANCE, MAX_HISTORY_LENGTH, MIN_DISTANCE, OPTIMAL_DISTANCE};
use pretty_assertions::assert_eq;

const PAYLOAD: &str = "iVBORw0KGgo=";

/// Source that never trends and moves the walk +1cm per call, noise-free
fn steady_climb(calls: usize) -> ScriptedSource {
    ScriptedSource::new()
        .units(std::iter::repeat(0.9).take(calls))
        .normals(std::iter::repeat([1.0, 0.0]).take(calls).flatten())
}

/// Fresh state, invalid payload: single fallback reading, nothing persisted
#[test]
fn test_fresh_invalid_payload() {
    let mut context = SimulationContext::with_source(SimConfig::default(), ScriptedSource::new());

    let response = context.distance_response("!!!");
    assert_eq!(response.face_points.len(), 1);
    assert_eq!(response.face_points[0].distance, 50.0);
    assert_eq!(context.history().len(), 0);
}

/// 35 calls: history holds exactly calls 6 through 35
#[test]
fn test_history_keeps_last_thirty() {
    let mut context = SimulationContext::with_source(SimConfig::default(), steady_climb(35));

    let mut last = None;
    for _ in 0..35 {
        last = Some(context.distance_response(PAYLOAD));
    }
    let response = last.unwrap();

    assert_eq!(response.face_points.len(), MAX_HISTORY_LENGTH);
    let distances: Vec<f64> = response.face_points.iter().map(|r| r.distance).collect();
    let expected: Vec<f64> = (6..=35).map(|call| OPTIMAL_DISTANCE + call as f64).collect();
    assert_eq!(distances, expected);
}

/// Timestamps ascend through the history
#[test]
fn test_history_is_chronological() {
    let mut context = SimulationContext::with_source(SimConfig::default(), RngSource::seeded(8));
    for _ in 0..40 {
        context.distance_response(PAYLOAD);
    }

    let stamps: Vec<String> = context.history().readings().map(|r| r.timestamp.clone()).collect();
    let mut sorted = stamps.clone();
    sorted.sort();
    assert_eq!(stamps, sorted);
}

/// A decode failure between good frames changes nothing
#[test]
fn test_decode_failure_is_idempotent() {
    let mut context = SimulationContext::with_source(SimConfig::default(), RngSource::seeded(21));
    for _ in 0..5 {
        context.distance_response(PAYLOAD);
    }
    let state_before = *context.engine().state();
    let history_before = context.history().snapshot();

    let response = context.distance_response("%%%");

    assert_eq!(*context.engine().state(), state_before);
    assert_eq!(context.history().snapshot(), history_before);
    assert_eq!(response.face_points, history_before);
}

/// Persisted walk stays clamped; trends count down without re-triggering
#[test]
fn test_walk_invariants_over_many_frames() {
    let mut context = SimulationContext::with_source(SimConfig::default(), RngSource::seeded(1234));
    let mut previous = *context.engine().state();
    let mut trends_seen = 0;

    for _ in 0..3000 {
        context.distance_response(PAYLOAD);
        let state = *context.engine().state();

        assert!(state.last_distance >= MIN_DISTANCE && state.last_distance <= MAX_DISTANCE);
        assert!(context.history().len() <= MAX_HISTORY_LENGTH);

        if previous.trend_steps_remaining > 0 {
            assert_eq!(state.trend_steps_remaining, previous.trend_steps_remaining - 1);
        } else if state.trend_steps_remaining > 0 {
            trends_seen += 1;
        }
        if state.trend_steps_remaining == 0 {
            assert_eq!(state.trend_direction, TrendDirection::None);
        }
        previous = state;
    }

    assert!(trends_seen > 0);
}

/// State threaded through a file continues the same walk
#[test]
fn test_state_file_threads_invocations() {
    let dir = std::env::temp_dir().join(format!("facesim_distance_it_{}", std::process::id()));
    let path = dir.join("state.json");

    let mut first = SimulationContext::with_source(SimConfig::default(), steady_climb(2));
    first.distance_response(PAYLOAD);
    first.distance_response(PAYLOAD);
    save_session(&first.session(), &path).unwrap();

    let session = load_session(&path).unwrap().unwrap();
    let mut second = SimulationContext::resume(SimConfig::default(), session, steady_climb(1));
    let response = second.distance_response(PAYLOAD);

    let distances: Vec<f64> = response.face_points.iter().map(|r| r.distance).collect();
    assert_eq!(distances, vec![51.0, 52.0, 53.0]);

    let _ = std::fs::remove_dir_all(&dir);
}

/// A smaller configured history evicts sooner
#[test]
fn test_configured_history_length() {
    let config = SimConfig {
        history_length: 5,
        ..SimConfig::default()
    };
    let mut context = SimulationContext::with_source(config, steady_climb(8));
    for _ in 0..8 {
        context.distance_response(PAYLOAD);
    }

    let distances: Vec<f64> = context.history().readings().map(|r| r.distance).collect();
    assert_eq!(distances, vec![54.0, 55.0, 56.0, 57.0, 58.0]);
}
