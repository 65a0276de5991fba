use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    params: Result<Query<dto::ProductQueryParams>, QueryRejection>,
) -> Response {
    // A query string that does not even deserialize (e.g. a repeated key).
    let Query(params) = match params {
        Ok(p) => p,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text());
        }
    };

    let criteria = match params.into_criteria() {
        Ok(c) => c,
        Err(response) => return response,
    };

    match services.query_products(&criteria).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
