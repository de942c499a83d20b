use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::IntoResponse,
    Json,
};

use crate::app::{dto, errors, AppServices};

/// Send one free-text SMS to every guardian in a batch.
pub async fn common_message(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CommonMessageRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.broadcast.broadcast(&body.batch, &body.message).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
