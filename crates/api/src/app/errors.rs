use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use kilinc_infra::catalog::CatalogError;

pub fn catalog_error_to_response(err: CatalogError) -> Response {
    tracing::error!(error = %err, "catalog load failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "catalog_error", err.to_string())
}

/// 400 for a query parameter that failed validation. The message names the
/// parameter.
pub fn invalid_query(parameter: &'static str, message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "invalid_query",
            "parameter": parameter,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
