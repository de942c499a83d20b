use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tutorbook_core::DomainError;
use tutorbook_infra::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Storage(e) => {
            tracing::error!(error = %e, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "storage unavailable",
            )
        }
        ServiceError::Internal(msg) => {
            tracing::error!(error = %msg, "internal failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        DomainError::InvalidRequest(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_request", msg)
        }
        DomainError::Unauthorized => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "invalid username or password",
        ),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
