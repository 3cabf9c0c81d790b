//! Helpers for WebSocket close frames and HTTP error responses.
//!
//! Keeps close codes and error bodies consistent across handlers.
use actix_web::{HttpResponse, http::StatusCode};
use actix_web_actors::ws;

/// Close frame for a session the server refuses to keep (lobby full, replaced).
pub fn policy_close(reason: &str) -> ws::CloseReason {
    ws::CloseReason {
        code: ws::CloseCode::Policy,
        description: Some(reason.to_string()),
    }
}

/// Close frame sent when the server cannot encode its own message.
pub fn internal_close() -> ws::CloseReason {
    ws::CloseReason {
        code: ws::CloseCode::Error,
        description: Some("Internal server error".into()),
    }
}

/// Returns an HTTP error response with a JSON body.
///
/// # Arguments
/// - `code`: Unique error code.
/// - `message`: Human-readable error message.
/// - `status`: HTTP status code.
pub fn http_error_response(code: &str, message: &str, status: StatusCode) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": { "code": code, "message": message }
    }))
}
