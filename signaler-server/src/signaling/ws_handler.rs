use crate::SignalingService;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures::StreamExt;
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HashMap<String, String>>,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_failed_upgrade(|e| warn!("Failed to upgrade websocket: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, params, service))
}

async fn handle_socket(socket: WebSocket, params: HashMap<String, String>, service: SignalingService) {
    let (sender, receiver) = socket.split();

    let reason = service.serve(receiver, sender, &params).await;
    info!("WebSocket disconnected: {:?}", reason);
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "alive": true }))
}

/// Websocket upgrade at `/` and liveness at `/health`, also mounted under `/v1`.
pub fn router(service: SignalingService) -> Router {
    let routes = Router::new()
        .route("/", get(ws_handler))
        .route("/health", get(health_handler));

    Router::new()
        .merge(routes.clone())
        .nest("/v1", routes)
        .with_state(service)
}
