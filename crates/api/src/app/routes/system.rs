use axum::http::StatusCode;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn ping() -> &'static str {
    "pong"
}
