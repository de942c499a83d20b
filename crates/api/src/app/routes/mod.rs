use axum::{
    routing::{get, post},
    Router,
};

pub mod accounts;
pub mod attendance;
pub mod messages;
pub mod students;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/ping", get(system::ping))
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/common-message", post(messages::common_message))
        .nest("/attendance", attendance::router())
        .nest("/students", students::router())
}
