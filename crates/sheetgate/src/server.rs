use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::Router;
use axum::routing::{get, post};
use sheetgate_core::{SheetBackend, SheetService};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::handlers::{self, ServerState};
use crate::openapi::{self, ENDPOINTS};

/// Build the router for the given state.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(ENDPOINTS.home, get(handlers::home))
        .route(ENDPOINTS.preview, get(handlers::preview))
        .route(ENDPOINTS.list_sheets, get(handlers::list_sheets))
        .route(ENDPOINTS.get_lines, get(handlers::get_lines))
        .route(ENDPOINTS.add_entry, post(handlers::add_entry))
        .route(ENDPOINTS.update_entry, post(handlers::update_entry))
        .route(ENDPOINTS.update_cell, post(handlers::update_cell))
        .route(ENDPOINTS.openapi, get(handlers::openapi))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct SheetServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

pub struct SheetServerBuilder {
    listener: Option<TcpListener>,
    backend: Option<Arc<dyn SheetBackend>>,
    default_table: Option<String>,
    public_url: Option<String>,
}

impl SheetServerBuilder {
    fn new() -> Self {
        SheetServerBuilder {
            listener: None,
            backend: None,
            default_table: None,
            public_url: None,
        }
    }
    /// Tcp listener to serve http on.
    pub fn with_listener(mut self, listener: TcpListener) -> Self {
        self.listener = Some(listener);
        self
    }
    /// Backend all requests are served from.
    pub fn with_backend(mut self, backend: Arc<dyn SheetBackend>) -> Self {
        self.backend = Some(backend);
        self
    }
    /// Table used when a request doesn't name one. Defaults to the first
    /// table of the backend.
    pub fn with_default_table_opt(mut self, default_table: Option<String>) -> Self {
        self.default_table = default_table;
        self
    }
    /// Url advertised in the OpenAPI document.
    pub fn with_public_url_opt(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url;
        self
    }

    pub async fn connect(self) -> Result<SheetServer> {
        let SheetServerBuilder {
            listener,
            backend,
            default_table,
            public_url,
        } = self;

        let listener = listener.ok_or_else(|| anyhow!("missing listener"))?;
        let backend = backend.ok_or_else(|| anyhow!("missing backend"))?;

        let service = match default_table {
            Some(table) => SheetService::new(backend, table),
            None => SheetService::with_first_table(backend).await?,
        };
        debug!(default_table = %service.default_table(), "service ready");

        let state = Arc::new(ServerState {
            service,
            openapi: openapi::document(public_url.as_deref()),
        });

        Ok(SheetServer { listener, state })
    }
}

impl SheetServer {
    pub fn builder() -> SheetServerBuilder {
        SheetServerBuilder::new()
    }

    /// Serve until ctrl-c.
    pub async fn serve(self) -> Result<()> {
        let addr = self.listener.local_addr()?;
        info!(
            version = env!("CARGO_PKG_VERSION"),
            default_sheet = %self.state.service.default_table(),
            "Listening on http://{addr}"
        );

        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("shutting down");
        Ok(())
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown triggered"),
        Err(err) => {
            error!(%err, "unable to listen for shutdown signal");
            // Never resolve, the server keeps running until killed.
            std::future::pending::<()>().await
        }
    }
}
