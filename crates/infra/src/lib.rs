//! Infrastructure layer: storage, notifier clients, configuration, and the
//! application services that tie them to the roster domain.

pub mod config;
pub mod notify;
pub mod services;
pub mod store;
