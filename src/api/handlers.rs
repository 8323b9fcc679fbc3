//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{DraftRequest, ErrorResponse, SubmitResponse};
use super::AppState;
use crate::conversation::ThreadSnapshot;
use crate::runtime::RuntimeError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Read model
        .route("/api/conversation", get(get_conversation))
        .route("/api/conversation/stream", get(stream_conversation))
        // Commands
        .route("/api/conversation/draft", put(update_draft))
        .route("/api/conversation/submit", post(submit))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Read Model
// ============================================================

async fn get_conversation(State(state): State<AppState>) -> Json<ThreadSnapshot> {
    Json(state.conversation.snapshot())
}

async fn stream_conversation(State(state): State<AppState>) -> impl IntoResponse {
    sse_stream(state.conversation.subscribe(), state.shutdown.clone())
}

// ============================================================
// Commands
// ============================================================

async fn update_draft(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<ThreadSnapshot>, AppError> {
    let snapshot = state.conversation.update_draft(req.text).await?;
    Ok(Json(snapshot))
}

/// Guard rejections (busy, empty draft) are reported in the body with 200:
/// they are a normal UI no-op, not a failed request
async fn submit(State(state): State<AppState>) -> Result<Json<SubmitResponse>, AppError> {
    let outcome = state.conversation.submit().await?;
    Ok(Json(SubmitResponse { outcome }))
}

async fn get_version() -> &'static str {
    concat!("chat-thread ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    Unavailable(String),
}

impl From<RuntimeError> for AppError {
    fn from(e: RuntimeError) -> Self {
        AppError::Unavailable(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
