//! Service wiring: stores + notifier → application services.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use tutorbook_auth::Argon2Hasher;
use tutorbook_infra::{
    config::{AppConfig, StorageBackend},
    notify::{build_notifier, Notifier},
    services::{
        AccountService, AttendanceService, BroadcastService, DirectoryService, RosterQueryService,
    },
    store::{AccountStore, AttendanceStore, InMemoryStore, PostgresStore, StudentStore},
};

/// Everything the handlers need, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub attendance: AttendanceService,
    pub roster: RosterQueryService,
    pub directory: DirectoryService,
    pub accounts: AccountService,
    pub broadcast: BroadcastService,
    postgres: Option<PostgresStore>,
}

impl AppServices {
    pub fn new(
        students: Arc<dyn StudentStore>,
        ledger: Arc<dyn AttendanceStore>,
        accounts: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            attendance: AttendanceService::new(
                students.clone(),
                ledger.clone(),
                notifier.clone(),
                notify_timeout,
            ),
            roster: RosterQueryService::new(students.clone(), ledger),
            directory: DirectoryService::new(students.clone()),
            accounts: AccountService::new(accounts, Arc::new(Argon2Hasher)),
            broadcast: BroadcastService::new(students, notifier, notify_timeout),
            postgres: None,
        }
    }

    /// Wiring over one Postgres store; the pool is closed by `shutdown`.
    pub fn postgres(
        store: PostgresStore,
        notifier: Arc<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        let shared = Arc::new(store.clone());
        let mut services = Self::new(
            shared.clone(),
            shared.clone(),
            shared,
            notifier,
            notify_timeout,
        );
        services.postgres = Some(store);
        services
    }

    /// Release backend resources once the server has stopped.
    pub async fn shutdown(&self) {
        if let Some(store) = &self.postgres {
            if !store.is_closed() {
                store.close().await;
                tracing::info!("Postgres pool closed");
            }
        }
    }

    /// Dev/test wiring over a fresh in-memory store.
    pub fn in_memory(notifier: Arc<dyn Notifier>, notify_timeout: Duration) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(
            store.clone(),
            store.clone(),
            store,
            notifier,
            notify_timeout,
        )
    }
}

/// Build services for the configured backend and notifier.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let notifier = build_notifier(&config.notifier, config.notify_timeout)
        .context("failed to build notifier")?;

    match &config.storage {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            Ok(AppServices::in_memory(notifier, config.notify_timeout))
        }
        StorageBackend::Postgres { database_url } => {
            let store = PostgresStore::connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            store
                .ensure_schema()
                .await
                .context("failed to create schema")?;
            tracing::info!("using Postgres storage");
            Ok(AppServices::postgres(store, notifier, config.notify_timeout))
        }
    }
}
