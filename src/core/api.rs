//! HTTP + WebSocket API for the visualizer
//!
//! Endpoints:
//! - WS / and WS /ws - Frame stream, one simulation context per connection
//! - POST /session/new - Create a shared session
//! - GET /session/{id} - Session status
//! - DELETE /session/{id} - Close a session
//! - POST /session/{id}/frame - Process one frame in a session
//! - WS /ws/{id} - Live replies for a session
//! - GET /health - Health check

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};

use crate::core::assembler::SimulationContext;
use crate::core::detector::{FaceDetector, NullDetector};
use crate::core::source::RngSource;
use crate::types::{FrameError, FrameReply, FrameRequest, Result, ServiceKind, SimConfig};

/// Reply sent when a frame could not be processed
pub const PROCESSING_FAILED: &str = "Processing failed";

/// Shared HTTP session
pub struct Session {
    pub id: String,
    pub context: SimulationContext,
    pub update_tx: broadcast::Sender<String>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
    pub config: SimConfig,
    pub detector: Arc<dyn FaceDetector>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub frames: u64,
    pub history_len: usize,
    pub last_distance: f64,
    pub trend_steps_remaining: u32,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Why a frame produced no reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameRejection {
    /// Unparseable, incomplete or unknown frame: logged and dropped
    Malformed(String),
    /// Detection failed: the client gets `{"error": "Processing failed"}`
    Failed(String),
}

/// Run one frame through a context
pub fn handle_frame(
    context: &mut SimulationContext,
    detector: &dyn FaceDetector,
    request: &FrameRequest,
) -> std::result::Result<FrameReply, FrameRejection> {
    let (kind, data) = match (request.kind.as_deref(), request.data.as_deref()) {
        (Some(kind), Some(data)) if !kind.is_empty() && !data.is_empty() => (kind, data),
        _ => return Err(FrameRejection::Malformed("Missing type or image data".to_string())),
    };
    let kind: ServiceKind = kind.parse().map_err(FrameRejection::Malformed)?;

    context
        .respond(kind, data, detector)
        .map(|data| FrameReply { kind, data })
        .map_err(|e| FrameRejection::Failed(e.to_string()))
}

/// Parse a text frame and produce the text to send back, if any
pub fn process_text_frame(
    context: &mut SimulationContext,
    detector: &dyn FaceDetector,
    text: &str,
) -> Option<String> {
    let request: FrameRequest = match serde_json::from_str(text) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Invalid frame JSON");
            return None;
        }
    };

    let reply = match handle_frame(context, detector, &request) {
        Ok(reply) => serde_json::to_string(&reply),
        Err(FrameRejection::Malformed(reason)) => {
            error!(%reason, "Dropping frame");
            return None;
        }
        Err(FrameRejection::Failed(reason)) => {
            error!(%reason, "Frame processing failed");
            serde_json::to_string(&FrameError {
                error: PROCESSING_FAILED.to_string(),
            })
        }
    };

    match reply {
        Ok(json) => Some(json),
        Err(e) => {
            error!(error = %e, "Failed to serialize reply");
            None
        }
    }
}

/// Create the API router with the bundled detector
pub fn create_router(config: SimConfig) -> Router {
    create_router_with_detector(config, Arc::new(NullDetector))
}

/// Create the API router with a specific face detector
pub fn create_router_with_detector(config: SimConfig, detector: Arc<dyn FaceDetector>) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        config,
        detector,
    });

    Router::new()
        .route("/", get(stream_handler))
        .route("/ws", get(stream_handler))
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/frame", post(post_frame))
        .route("/ws/:id", get(session_websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let session_id = generate_session_id();
    let (tx, _) = broadcast::channel(100);

    let session = Session {
        id: session_id.clone(),
        context: SimulationContext::with_source(state.config.clone(), RngSource::from_entropy()),
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), session);
    info!(%session_id, "Session created");

    Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    })
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> std::result::Result<Json<SessionStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let engine = session.context.engine();

    Ok(Json(SessionStatusResponse {
        session_id: session.id.clone(),
        frames: session.context.frames(),
        history_len: session.context.history().len(),
        last_distance: engine.last_distance(),
        trend_steps_remaining: engine.trend_steps_remaining(),
    }))
}

/// Close a session; its live subscribers are disconnected
async fn delete_session(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> StatusCode {
    let mut sessions = state.sessions.write().await;
    match sessions.remove(&id) {
        Some(session) => {
            info!(session_id = %id, frames = session.context.frames(), "Session closed");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Process one frame inside a session
///
/// The write lock serializes each read-modify-write of the session's walk
/// state and history.
async fn post_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<FrameRequest>,
) -> std::result::Result<Response, StatusCode> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    match handle_frame(&mut session.context, state.detector.as_ref(), &req) {
        Ok(reply) => {
            if let Ok(json) = serde_json::to_string(&reply) {
                let _ = session.update_tx.send(json);
            }
            Ok(Json(reply).into_response())
        }
        Err(FrameRejection::Malformed(reason)) => {
            warn!(session_id = %id, %reason, "Rejected frame");
            Err(StatusCode::BAD_REQUEST)
        }
        Err(FrameRejection::Failed(reason)) => {
            warn!(session_id = %id, %reason, "Frame processing failed");
            let body = FrameError {
                error: PROCESSING_FAILED.to_string(),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response())
        }
    }
}

/// WebSocket handler for the frame stream
async fn stream_handler(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

/// Serve one streaming client with its own simulation context
async fn handle_stream(mut socket: WebSocket, state: Arc<AppState>) {
    let mut context = SimulationContext::with_source(state.config.clone(), RngSource::from_entropy());
    info!("Client connected");

    while let Some(msg) = socket.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "WebSocket receive failed");
                break;
            }
        };

        if let Some(reply) = process_text_frame(&mut context, state.detector.as_ref(), &text) {
            if socket.send(Message::Text(reply)).await.is_err() {
                break;
            }
        }
    }

    info!(frames = context.frames(), "Client disconnected");
}

/// WebSocket handler for live session replies
async fn session_websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> std::result::Result<impl IntoResponse, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        forward_updates(socket, rx).await;
    }))
}

/// Push every session reply to the socket until either side goes away
async fn forward_updates(socket: WebSocket, mut rx: broadcast::Receiver<String>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(update) => {
                    if sender.send(Message::Text(update)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Session subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

/// Generate session ID
fn generate_session_id() -> String {
    format!("session_{:016x}", rand::random::<u64>())
}

/// Run the API server
pub async fn run_server(addr: &str, config: SimConfig) -> Result<()> {
    let router = create_router(config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "facesim API listening");
    info!("  WS   /  or /ws              - Frame stream");
    info!("  POST /session/new           - Create session");
    info!("  GET  /session/:id           - Get status");
    info!("  DEL  /session/:id           - Close session");
    info!("  POST /session/:id/frame     - Process frame");
    info!("  WS   /ws/:id                - Live session replies");
    info!("  GET  /health                - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
