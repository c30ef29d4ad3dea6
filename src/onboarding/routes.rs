//! REST + WebSocket endpoints for a mobile onboarding client.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::error::{Error, FlowError};

use super::field::FieldKey;
use super::manager::{FlowEvent, OnboardingManager};
use super::model::FileReference;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingManager>,
}

/// Body of `POST /api/onboarding/messages`.
#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub text: String,
}

/// Frames a WebSocket client may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Message { text: String },
    Edit,
    SelectField { field: String },
    File { field: String, file: FileReference },
    Reset,
    Save,
}

/// Frames sent to a WebSocket client besides snapshots.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerNotice {
    Error { message: String },
}

/// Build the onboarding routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws/onboarding", get(ws_handler))
        .route("/api/onboarding", get(get_snapshot))
        .route("/api/onboarding/profile", get(get_profile))
        .route("/api/onboarding/messages", post(post_message))
        .route("/api/onboarding/edit", post(begin_edit))
        .route("/api/onboarding/edit/{field}", post(select_edit_field))
        .route("/api/onboarding/files/{field}", post(complete_file))
        .route("/api/onboarding/reset", post(reset))
        .route("/api/onboarding/save", post(save))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chat-onboard"
    }))
}

// ── REST Endpoints ──────────────────────────────────────────────────────

/// GET /api/onboarding
///
/// The full snapshot: mode, step, affordance, answers, and transcript.
async fn get_snapshot(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.manager.snapshot().await)
}

/// GET /api/onboarding/profile
async fn get_profile(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.manager.profile().await)
}

/// POST /api/onboarding/messages
///
/// One line of chat text, routed the same way the terminal routes it.
async fn post_message(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<MessageBody>,
) -> Response {
    match state.manager.handle_text(&body.text).await {
        Ok(_) => snapshot_response(&state).await,
        Err(e) => error_response(&e),
    }
}

/// POST /api/onboarding/edit
async fn begin_edit(State(state): State<OnboardingRouteState>) -> Response {
    match state.manager.begin_edit().await {
        Ok(()) => snapshot_response(&state).await,
        Err(e) => flow_error_response(&e),
    }
}

/// POST /api/onboarding/edit/{field}
async fn select_edit_field(
    State(state): State<OnboardingRouteState>,
    Path(field): Path<String>,
) -> Response {
    let key = match parse_field(&field) {
        Ok(key) => key,
        Err(e) => return flow_error_response(&e),
    };
    match state.manager.select_edit_field(key).await {
        Ok(()) => snapshot_response(&state).await,
        Err(e) => flow_error_response(&e),
    }
}

/// POST /api/onboarding/files/{field}
///
/// The client picked a file natively and reports it here.
async fn complete_file(
    State(state): State<OnboardingRouteState>,
    Path(field): Path<String>,
    Json(file): Json<FileReference>,
) -> Response {
    let key = match parse_field(&field) {
        Ok(key) => key,
        Err(e) => return flow_error_response(&e),
    };
    match state.manager.complete_file_selection(key, file).await {
        Ok(_) => snapshot_response(&state).await,
        Err(e) => flow_error_response(&e),
    }
}

/// POST /api/onboarding/reset
async fn reset(State(state): State<OnboardingRouteState>) -> Response {
    state.manager.reset().await;
    snapshot_response(&state).await
}

/// POST /api/onboarding/save
async fn save(State(state): State<OnboardingRouteState>) -> Response {
    match state.manager.save().await {
        Ok(profile) => (StatusCode::OK, Json(serde_json::json!(profile))).into_response(),
        Err(e) => error_response(&e),
    }
}

fn parse_field(field: &str) -> Result<FieldKey, FlowError> {
    field
        .parse::<FieldKey>()
        .map_err(|_| FlowError::UnknownField(field.to_string()))
}

async fn snapshot_response(state: &OnboardingRouteState) -> Response {
    (StatusCode::OK, Json(state.manager.snapshot().await)).into_response()
}

fn error_response(e: &Error) -> Response {
    let status = match e {
        Error::Flow(e) => return flow_error_response(e),
        Error::Store(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
}

fn flow_error_response(e: &FlowError) -> Response {
    let status = match e {
        FlowError::UnknownField(_) => StatusCode::BAD_REQUEST,
        FlowError::InvalidOperation { .. } | FlowError::FieldNotAwaited { .. } => {
            StatusCode::CONFLICT
        }
    };
    (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
}

// ── WebSocket ───────────────────────────────────────────────────────────

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<OnboardingRouteState>,
) -> impl IntoResponse {
    info!("Onboarding WebSocket client connecting");
    ws.on_upgrade(|socket| handle_socket(socket, state.manager))
}

async fn handle_socket(mut socket: WebSocket, manager: Arc<OnboardingManager>) {
    // Subscribe before the initial sync so no change slips between them
    let mut rx = manager.subscribe();

    if send_snapshot(&mut socket, &manager).await.is_err() {
        warn!("Failed to send initial snapshot, client disconnected");
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if send_json(&mut socket, &event).await.is_err() {
                            debug!("Client disconnected during send");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "Onboarding WS client lagged behind broadcast");
                        if send_snapshot(&mut socket, &manager).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = handle_client_message(text.as_str(), &manager).await {
                            let notice = ServerNotice::Error { message: e.to_string() };
                            if send_json(&mut socket, &notice).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Onboarding WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "Onboarding WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("Onboarding WebSocket connection closed");
}

/// Apply one client frame. Snapshots reach the client through the broadcast.
async fn handle_client_message(text: &str, manager: &OnboardingManager) -> Result<(), Error> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(m) => m,
        Err(e) => {
            debug!(error = %e, text = text, "Unrecognized WS message from client");
            return Ok(());
        }
    };

    match message {
        ClientMessage::Message { text } => {
            manager.handle_text(&text).await?;
        }
        ClientMessage::Edit => manager.begin_edit().await?,
        ClientMessage::SelectField { field } => {
            manager.select_edit_field(parse_field(&field)?).await?
        }
        ClientMessage::File { field, file } => {
            manager
                .complete_file_selection(parse_field(&field)?, file)
                .await?;
        }
        ClientMessage::Reset => manager.reset().await,
        ClientMessage::Save => {
            manager.save().await?;
        }
    }
    Ok(())
}

async fn send_snapshot(socket: &mut WebSocket, manager: &OnboardingManager) -> Result<(), axum::Error> {
    let event = FlowEvent::Snapshot {
        snapshot: manager.snapshot().await,
    };
    send_json(socket, &event).await
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), axum::Error> {
    match serde_json::to_string(value) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!(error = %e, "Failed to serialize WS frame");
            Ok(())
        }
    }
}
