//! HTTP API: router, request/response mapping and server bootstrap helpers.

pub mod app;
pub mod middleware;
