use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Body of every `/api/*` reply that is not a data payload.
#[derive(Debug, Serialize, Clone)]
pub struct ApiMessage {
    pub message: String,
}

pub fn json_message(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiMessage>) {
    (
        status,
        Json(ApiMessage {
            message: message.into(),
        }),
    )
}
