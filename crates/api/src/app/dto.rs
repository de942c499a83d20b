use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tutorbook_core::{Batch, DomainError, DomainResult, IndexNumber};
use tutorbook_roster::{ImportPolicy, NewStudent};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub batch: String,
    pub index_number: String,
    pub subject: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStudentRequest {
    pub index_number: String,
    pub name: String,
    pub phone_number: String,
    pub batch: String,
    #[serde(default)]
    pub chemistry_enrolled: bool,
    #[serde(default)]
    pub physics_enrolled: bool,
}

impl SaveStudentRequest {
    pub fn into_new_student(self) -> DomainResult<NewStudent> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid("name must not be empty"));
        }
        NewStudent::new(
            IndexNumber::parse(&self.index_number)?,
            name,
            &self.phone_number,
            Batch::parse(&self.batch)?,
            self.chemistry_enrolled,
            self.physics_enrolled,
        )
    }
}

/// Already-tabulated rows; each row is
/// `[indexNumber, name, phone, batch, chemistryFlag, physicsFlag]`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub policy: Option<ImportPolicy>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct CommonMessageRequest {
    pub batch: String,
    pub message: String,
}

/// `?batch=..&subject=..&date=YYYY-MM-DD`
#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    pub batch: String,
    pub subject: String,
    pub date: String,
}

impl RosterQuery {
    pub fn date(&self) -> Result<NaiveDate, axum::response::Response> {
        parse_date(&self.date)
    }
}

#[derive(Debug, Deserialize)]
pub struct StudentsQuery {
    pub batch: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authenticated: bool,
    pub username: String,
}

// -------------------------
// Extraction helpers
// -------------------------

/// Unwrap a JSON body, turning every rejection into a 400 error body.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    body.map(|Json(value)| value)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", e.body_text()))
}

pub fn query_params<T>(
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, axum::response::Response> {
    query
        .map(|Query(value)| value)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", e.body_text()))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, axum::response::Response> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_date",
            format!("date must be YYYY-MM-DD, got '{raw}'"),
        )
    })
}
