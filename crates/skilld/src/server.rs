//! HTTP host for the skill.
//!
//! Accepts platform request envelopes on `POST /` and returns the response
//! envelope. Request signature verification happens in front of this server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use skill_core::{DispatchError, Dispatcher, RequestEnvelope, ResponseEnvelope};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handle_request))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn start_server(
    dispatcher: Arc<Dispatcher>,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = Arc::new(AppState { dispatcher });
    let router = create_router(state);

    info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// GET /health - status, registered intents and dispatch counters.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "application_id_check": state.dispatcher.config().application_id.is_some(),
        "intents": state.dispatcher.table().intent_names(),
        "metrics": state.dispatcher.metrics().snapshot(),
    }))
}

/// POST / - Dispatch one skill request.
async fn handle_request(
    State(state): State<Arc<AppState>>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, (StatusCode, Json<ErrorResponse>)> {
    state
        .dispatcher
        .handle(envelope)
        .map(Json)
        .map_err(|e| match e {
            DispatchError::Authorization { .. } => {
                error_response(StatusCode::FORBIDDEN, "request rejected")
            }
            DispatchError::Handler { .. } => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "request failed")
            }
        })
}
