//! ServerBuilder for fluent API to build the marketplace server

use super::exposure::RestExposure;
use super::host::{AppState, ServerHost};
use crate::config::MarketplaceConfig;
use crate::core::mailer::{LogMailer, Mailer};
use crate::core::store::MarketplaceStore;
use crate::storage::InMemoryMarketplaceStore;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the marketplace HTTP server
///
/// Without explicit components the server runs on an in-memory store and
/// writes outgoing mail to the log.
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(MarketplaceConfig::from_yaml_file("shadiejo.yaml")?)
///     .serve("0.0.0.0:8000")
///     .await?;
/// ```
pub struct ServerBuilder {
    configs: Vec<MarketplaceConfig>,
    store: Option<Arc<dyn MarketplaceStore>>,
    mailer: Option<Arc<dyn Mailer>>,
    custom_routes: Vec<Router<AppState>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            store: None,
            mailer: None,
            custom_routes: Vec::new(),
        }
    }

    /// Add a configuration layer
    ///
    /// Later layers override earlier ones; see [`MarketplaceConfig::merge`].
    pub fn with_config(mut self, config: MarketplaceConfig) -> Self {
        self.configs.push(config);
        self
    }

    pub fn with_store(mut self, store: impl MarketplaceStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Share a store with the caller, e.g. to seed or inspect it in tests
    pub fn with_shared_store(mut self, store: Arc<dyn MarketplaceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_mailer(mut self, mailer: impl Mailer + 'static) -> Self {
        self.mailer = Some(Arc::new(mailer));
        self
    }

    /// Add routes next to the built-in API
    ///
    /// Custom routes receive the same state, so the auth extractors work there.
    pub fn with_custom_routes(mut self, routes: Router<AppState>) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Merged configuration of every layer added so far
    pub fn config(&self) -> MarketplaceConfig {
        self.configs
            .iter()
            .cloned()
            .fold(MarketplaceConfig::default(), MarketplaceConfig::merge)
    }

    /// Build the transport-agnostic host
    pub fn build_host(mut self) -> Result<ServerHost> {
        let config = self.config();
        let store = self
            .store
            .take()
            .unwrap_or_else(|| Arc::new(InMemoryMarketplaceStore::new()));
        let mailer = self.mailer.take().unwrap_or_else(|| Arc::new(LogMailer));

        ServerHost::from_builder_components(config, store, mailer)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        self.serve_listener(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_listener(self, listener: TcpListener) -> Result<()> {
        let app = self.build()?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
