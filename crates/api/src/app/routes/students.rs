use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_students).post(save_student))
        .route("/batches", get(list_batches))
        .route("/absentees", get(list_absentees))
        .route("/import", post(import_students))
}

pub async fn list_students(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::StudentsQuery>, QueryRejection>,
) -> axum::response::Response {
    let query = match dto::query_params(query) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.roster.students(query.batch.as_deref()).await {
        Ok(students) => Json(students).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Add a student, or update the one with the same index number and batch.
pub async fn save_student(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SaveStudentRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let row = match body.into_new_student() {
        Ok(row) => row,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.directory.save_student(row).await {
        Ok(saved) => {
            let status = if saved.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(saved.student)).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_batches(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.roster.batches().await {
        Ok(batches) => Json(batches).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_absentees(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::RosterQuery>, QueryRejection>,
) -> axum::response::Response {
    let query = match dto::query_params(query) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let date = match query.date() {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    match services
        .roster
        .absentees(&query.batch, &query.subject, date)
        .await
    {
        Ok(students) => Json(students).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn import_students(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::ImportRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let policy = body.policy.unwrap_or_default();
    match services.directory.import(body.rows, policy).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
