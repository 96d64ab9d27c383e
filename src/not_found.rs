//! Fallback handlers for requests that do not match a route.

use axum::{http::StatusCode, response::Response};

use crate::response::failure;

pub async fn get_404_not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "Not found")
}

pub async fn get_405_method_not_allowed() -> Response {
    failure(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
