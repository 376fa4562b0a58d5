//! Router, shared state and the HTTP server with graceful shutdown.
//!
//! Shutdown proceeds in three phases once the trigger fires:
//! 1. Drain: readiness flips so health reports 503 while requests are still
//!    served for `drain_grace`, letting load balancers route elsewhere.
//! 2. Close: the listener stops accepting.
//! 3. Wait: in-flight requests get up to `shutdown_timeout` to finish.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use docgate::{AssociationStore, DecisionEngine, DocumentStore, Gateway, Readiness};
use docgate_config::ServerConfig;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::{ServerError, ServerResult};
use crate::handler::{
    ApiError, create_document, delete_document, get_document, health, list_documents,
    method_not_allowed, route_not_found, update_document,
};

// ============================================================================
// Application State
// ============================================================================

/// Shared state for all handlers.
pub struct AppState<S, E> {
    gateway: Arc<Gateway<S, E>>,
    readiness: Readiness,
}

impl<S, E> Clone for AppState<S, E> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            readiness: self.readiness.clone(),
        }
    }
}

impl<S, E> AppState<S, E>
where
    S: DocumentStore + AssociationStore + 'static,
    E: DecisionEngine + 'static,
{
    pub fn new(gateway: Gateway<S, E>, readiness: Readiness) -> Self {
        Self {
            gateway: Arc::new(gateway),
            readiness,
        }
    }

    pub fn gateway(&self) -> &Gateway<S, E> {
        &self.gateway
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    /// Runs a gateway operation on the blocking pool.
    ///
    /// Gateway operations take store locks and may do I/O, so they never run
    /// on an async worker thread.
    pub(crate) async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Gateway<S, E>) -> docgate::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let gateway = Arc::clone(&self.gateway);
        match tokio::task::spawn_blocking(move || op(&gateway)).await {
            Ok(result) => Ok(result?),
            Err(e) => {
                error!(error = %e, "Gateway task failed");
                Err(ApiError::TaskFailed)
            }
        }
    }
}

/// Builds the document API router.
pub fn router<S, E>(state: AppState<S, E>, max_request_bytes: usize) -> Router
where
    S: DocumentStore + AssociationStore + 'static,
    E: DecisionEngine + 'static,
{
    Router::new()
        .route("/health", get(health::<S, E>))
        .route("/api/v1/health", get(health::<S, E>))
        .route(
            "/api/v1/documents",
            get(list_documents::<S, E>).post(create_document::<S, E>),
        )
        .route(
            "/api/v1/documents/",
            get(list_documents::<S, E>).post(create_document::<S, E>),
        )
        .route(
            "/api/v1/documents/{id}",
            get(get_document::<S, E>)
                .put(update_document::<S, E>)
                .delete(delete_document::<S, E>),
        )
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Server
// ============================================================================

/// The bound HTTP server.
pub struct Server {
    listener: TcpListener,
    app: Router,
    readiness: Readiness,
    drain_grace: Duration,
    shutdown_timeout: Duration,
}

impl Server {
    /// Binds the listener described by `config`.
    pub async fn bind<S, E>(config: &ServerConfig, state: AppState<S, E>) -> ServerResult<Self>
    where
        S: DocumentStore + AssociationStore + 'static,
        E: DecisionEngine + 'static,
    {
        let addr = config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::BindFailed { addr, source })?;

        info!(addr = %listener.local_addr()?, "docgate listening");

        Ok(Self {
            listener,
            readiness: state.readiness().clone(),
            app: router(state, config.max_request_bytes),
            drain_grace: config.drain_grace(),
            shutdown_timeout: config.shutdown_timeout(),
        })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until `trigger` completes, then drains and shuts down.
    pub async fn run_until<F>(self, trigger: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            listener,
            app,
            readiness,
            drain_grace,
            shutdown_timeout,
        } = self;

        let (closed_tx, closed_rx) = oneshot::channel::<()>();
        let drain = async move {
            trigger.await;
            readiness.mark_shutting_down();
            info!(grace_secs = drain_grace.as_secs(), "Shutdown requested, draining");
            tokio::time::sleep(drain_grace).await;
            info!("Listener closing");
            let _ = closed_tx.send(());
        };

        let serve = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(drain)
        .into_future();

        let deadline = async move {
            if closed_rx.await.is_ok() {
                tokio::time::sleep(shutdown_timeout).await;
            } else {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = serve => {
                result?;
                info!("All connections finished");
            }
            () = deadline => {
                warn!(
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Shutdown timeout elapsed with requests still in flight"
                );
            }
        }
        Ok(())
    }
}

/// Completes on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("SIGINT received"),
        () = terminate => info!("SIGTERM received"),
    }
}
