//! The JSON envelopes shared by the API endpoints.
//!
//! Every response body is a JSON object with a `success` boolean. Failures
//! also carry a human readable `message`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

/// Respond with `{"success": true}` merged with `fields`.
///
/// `fields` should be a JSON object, anything else is ignored.
pub(crate) fn success(fields: Value) -> Response {
    let mut body = Map::new();
    body.insert("success".to_owned(), Value::Bool(true));

    if let Value::Object(fields) = fields {
        body.extend(fields);
    }

    (StatusCode::OK, Json(Value::Object(body))).into_response()
}

/// Respond with `{"success": false, "message": message}`.
pub(crate) fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "message": message,
        })),
    )
        .into_response()
}
