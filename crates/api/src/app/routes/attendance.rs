use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;

use tutorbook_infra::services::MarkAttendance;

use crate::app::{dto, errors, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", post(mark_attendance))
        .route("/records", get(list_records))
}

/// Front-desk card scan. The record is timestamped with server-local time.
pub async fn mark_attendance(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::MarkAttendanceRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match dto::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = MarkAttendance {
        batch: body.batch,
        index_number: body.index_number,
        subject: body.subject,
        recorded_at: Local::now().naive_local(),
    };

    match services.attendance.mark(cmd).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_records(
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
        .attendance_records(&query.batch, &query.subject, date)
        .await
    {
        Ok(records) => Json(records).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
