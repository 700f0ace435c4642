//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, Settings, StoreBackend};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::repositories::{AccountRepository, MemoryAccountStore};
use crate::services::{AccountService, AccountStore, Services, TracingObserver};
use crate::state::AppState;
use crate::utils::{Argon2Hasher, JwtIssuer};

/// HTTP server manager
pub struct Server {
    settings: Settings,
    environment: Environment,
}

impl Server {
    pub fn new(settings: Settings, environment: Environment) -> Self {
        Self {
            settings,
            environment,
        }
    }

    /// Start the server and run until shutdown signal
    ///
    /// # Errors
    /// - Database connection pool or migration errors (postgres backend)
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %self.environment.as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = self.settings.server.port,
            request_timeout = self.settings.server.request_timeout,
            keep_alive_timeout = self.settings.server.keep_alive_timeout,
            store = %self.settings.store.backend.as_str(),
            "Server configuration loaded"
        );

        tracing::info!(
            issuer = %self.settings.jwt.issuer,
            access_token_expiration_hours = self.settings.jwt.access_token_expiration,
            "JWT configuration loaded"
        );

        let services = build_services(&self.settings).await?;
        let address = self.settings.server.address();
        let state = AppState::new(self.settings, services);
        let router = create_router(state);
        tracing::info!("Router configured");

        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Wires the account service to the configured store backend.
async fn build_services(settings: &Settings) -> anyhow::Result<Services> {
    let store: Arc<dyn AccountStore> = match settings.store.backend {
        StoreBackend::Postgres => {
            if settings.database.auto_migrate {
                let applied = run_pending_migrations(settings.database.url.clone()).await?;
                tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");
            }

            tracing::info!(
                max_connections = settings.database.max_connections,
                min_connections = settings.database.min_connections,
                "Initializing database connection pool"
            );
            let pool = establish_async_connection_pool(&settings.database).await?;
            Arc::new(AccountRepository::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory account store; accounts are lost on shutdown");
            Arc::new(MemoryAccountStore::new())
        }
    };

    let accounts = AccountService::new(
        store,
        Arc::new(Argon2Hasher),
        Arc::new(JwtIssuer::new(&settings.jwt)),
        Arc::new(TracingObserver),
    );

    Ok(Services { accounts })
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
