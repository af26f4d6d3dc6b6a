use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::web::{
    protocol::{CreateSessionResponse, SendMessageRequest, SendMessageResponse, SessionHistory},
    session_manager::{SessionId, SessionManager},
};

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub session_manager: Arc<SessionManager>,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/:id", get(get_session_details).delete(close_session))
        .route("/api/sessions/:id/messages", post(send_message))
        .with_state(state)
}

/// GET / - Chat page
async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../../web/index.html"))
}

/// GET /api/sessions - List all active sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.session_manager.list_sessions().await;
    Json(serde_json::json!({ "sessions": sessions }))
}

/// POST /api/sessions - Create a new session
async fn create_session(State(state): State<AppState>) -> Json<CreateSessionResponse> {
    let session = state.session_manager.create_session().await;

    Json(CreateSessionResponse {
        session_id: session.id,
        thread_id: session.thread_id.clone(),
        messages: session.messages().await,
    })
}

/// GET /api/sessions/:id - Session details and history
async fn get_session_details(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionHistory>, AppError> {
    let session = state
        .session_manager
        .get_session(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".into()))?;

    Ok(Json(SessionHistory {
        info: session.get_info().await,
        messages: session.messages().await,
    }))
}

/// DELETE /api/sessions/:id - Close a session
async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.session_manager.remove_session(&id).await? {
        return Err(AppError::NotFound("Session not found".into()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Session closed successfully",
    })))
}

/// POST /api/sessions/:id/messages - Run one conversation turn
async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let content = request.content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("Message content must not be empty".into()));
    }

    let session = state
        .session_manager
        .get_session(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Session not found".into()))?;

    let (outcome, messages) = session.send(content).await.map_err(AppError::Upstream)?;

    Ok(Json(SendMessageResponse {
        reply: outcome.reply,
        complete: outcome.complete,
        messages,
    }))
}

/// Error handling
#[derive(Debug)]
enum AppError {
    Anyhow(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    /// The LLM or search API failed during a turn
    Upstream(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Anyhow(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Upstream(err) => {
                tracing::warn!("Conversation turn failed: {:#}", err);
                (StatusCode::BAD_GATEWAY, format!("{:#}", err))
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
