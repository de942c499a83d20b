use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use tutorbook_core::DomainError;

use crate::app::{dto, errors, AppServices};

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CredentialsRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.accounts.register(&body.username, &body.password).await {
        Ok(username) => (
            StatusCode::CREATED,
            Json(dto::AccountResponse {
                username: username.to_string(),
            }),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CredentialsRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .accounts
        .authenticate(&body.username, &body.password)
        .await
    {
        Ok(true) => Json(dto::LoginResponse {
            authenticated: true,
            username: body.username.trim().to_string(),
        })
        .into_response(),
        Ok(false) => errors::domain_error_to_response(DomainError::Unauthorized),
        Err(e) => errors::service_error_to_response(e),
    }
}
