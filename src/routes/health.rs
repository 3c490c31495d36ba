use axum::response::Json;
use serde_json::json;

/// Health check endpoint handler.
///
/// Returns a fixed JSON body so load balancers and container probes can
/// tell the process is serving requests. It does not contact upstream.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
/// - **Response**: `{"status": "pong"}`
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}
