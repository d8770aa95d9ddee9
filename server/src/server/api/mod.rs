//! REST API handlers grouped by domain.

pub mod merge;
pub mod settings;

use axum::Json;
use axum::http::StatusCode;
use image_processor::{MergeError, MergeErrorKind};
use serde_json::{Value, json};

/// Standard success response.
pub fn ok_json(data: Value) -> Json<Value> {
    Json(json!({ "status": "ok", "data": data }))
}

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// `InvalidInput` error response for requests rejected before planning.
pub fn invalid_input_json(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": "error",
            "kind": MergeErrorKind::InvalidInput.as_str(),
            "error": message,
        })),
    )
}

/// Error response for a failed merge, carrying its kind.
pub fn merge_err_json(err: &MergeError) -> (StatusCode, Json<Value>) {
    let kind = err.kind();
    let status = match kind {
        MergeErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        MergeErrorKind::DecodeFailure => StatusCode::UNPROCESSABLE_ENTITY,
        MergeErrorKind::CanvasTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        MergeErrorKind::EncodeFailure => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(json!({ "status": "error", "kind": kind.as_str(), "error": err.to_string() })),
    )
}
