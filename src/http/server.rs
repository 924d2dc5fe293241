//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Wrap the frozen engine in an axum router (single fallback route)
//! - Wire up tower-http layers (request id, tracing, timeout, server header)
//! - Run the accept loop in a background task
//! - Drain on shutdown, bounded by `server.shutdown_timeout_secs`
//!
//! # Lifecycle
//! ```text
//! run(name, addr) → bind → serve(name, listener, shutdown_signal())
//!     serve loop spawned ───────────────┐
//!     wait for shutdown future          │ requests handled concurrently
//!     stop accepting ───────────────────┤
//!     wait ≤ timeout for in-flight ─────┘
//!     return (timeout logged, requests left running are abandoned)
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{self, HeaderValue};
use axum::http::Request;
use axum::response::Response;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::engine::Engine;
use crate::error::EngineError;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown_signal;

impl Engine {
    /// Bind `addr`, serve until SIGINT/SIGTERM, then shut down gracefully.
    pub async fn run(self, name: &str, addr: &str) -> Result<(), EngineError> {
        let socket: SocketAddr = addr.parse().map_err(|source| EngineError::Address {
            addr: addr.to_string(),
            source,
        })?;
        let listener = TcpListener::bind(socket)
            .await
            .map_err(|source| EngineError::Bind {
                addr: socket,
                source,
            })?;

        self.serve(name, listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `shutdown` resolves, then drain.
    ///
    /// New connections stop being accepted as soon as `shutdown` completes.
    /// In-flight requests get `shutdown_timeout` to finish; after that the
    /// call returns regardless.
    pub async fn serve<S>(
        self,
        name: &str,
        listener: TcpListener,
        shutdown: S,
    ) -> Result<(), EngineError>
    where
        S: Future<Output = ()> + Send,
    {
        let local_addr = listener.local_addr()?;
        let shutdown_timeout = self.config().shutdown_timeout();
        let in_flight = self.in_flight().clone();

        tracing::info!(
            service = name,
            routes = self.router().len(),
            groups = self.group_prefixes().len(),
            "Engine ready"
        );

        let app = self
            .into_router()
            .into_make_service_with_connect_info::<SocketAddr>();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        tracing::info!(service = name, address = %local_addr, "Server running");

        tokio::select! {
            result = &mut server => {
                result??;
                tracing::warn!(service = name, "Server stopped without a shutdown request");
                return Ok(());
            }
            _ = shutdown => {}
        }

        tracing::info!(
            service = name,
            in_flight = in_flight.active_count(),
            "Server shutting down"
        );
        let _ = stop_tx.send(());

        match tokio::time::timeout(shutdown_timeout, &mut server).await {
            Ok(result) => {
                result??;
                tracing::info!(service = name, "Server exiting");
            }
            Err(_) => {
                tracing::warn!(
                    service = name,
                    timeout = ?shutdown_timeout,
                    in_flight = in_flight.active_count(),
                    "Shutdown timed out waiting for in-flight requests"
                );
            }
        }

        Ok(())
    }

    /// Convert the engine into an axum router with the standard layers.
    ///
    /// Every path and method goes to [`Engine::handle`].
    pub fn into_router(self) -> axum::Router {
        let request_timeout = self.config().request_timeout();
        build_router(Arc::new(self), request_timeout)
    }
}

#[allow(deprecated)]
fn build_router(engine: Arc<Engine>, request_timeout: Duration) -> axum::Router {
    axum::Router::new()
        .fallback(dispatch)
        .with_state(engine)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::SERVER,
                    HeaderValue::from_static("giga"),
                ))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

async fn dispatch(State(engine): State<Arc<Engine>>, request: Request<Body>) -> Response {
    engine.handle(request).await
}
