//! Request dispatch engine.
//!
//! # Data Flow
//! ```text
//! Wiring (startup, single-threaded):
//!     Engine::new / with_config
//!     → group(prefix) / use_middleware(..) / get(..) / post(..)
//!     → Router tries + handler map filled in
//!
//! Serving (per request, concurrent):
//!     Request
//!     → buffer body (bounded by max_body_bytes)
//!     → collect middleware of every group whose prefix matches the path
//!     → Context seeded with that middleware
//!     → Router::handle (appends route handler or 404, starts the chain)
//!     → Response
//! ```
//!
//! # Design Decisions
//! - Every group whose prefix is a textual prefix of the path contributes,
//!   in group-creation order; the root group (prefix `""`) always matches
//! - The engine is moved into an `Arc` to serve, so the route table cannot
//!   change while requests are in flight

pub mod group;

use std::time::Instant;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

use crate::config::ServerConfig;
use crate::http::{Context, HandlerFunc};
use crate::lifecycle::InFlight;
use crate::observability::metrics;
use crate::routing::Router;

pub use group::RouterGroup;
use group::GroupEntry;

pub struct Engine {
    router: Router,
    /// All groups ever created; index 0 is the root group.
    groups: Vec<GroupEntry>,
    config: ServerConfig,
    in_flight: InFlight,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        Self {
            router: Router::new(),
            groups: vec![GroupEntry::new(String::new())],
            config,
            in_flight: InFlight::new(),
        }
    }

    /// The root group (empty prefix).
    pub fn root(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self, 0)
    }

    /// Create a top-level group.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let index = self.register_group(prefix.to_owned());
        RouterGroup::new(self, index)
    }

    /// Add middleware to the root group; it runs for every request.
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.root().use_middleware(middleware);
        self
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.root().get(pattern, handler);
        self
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.root().post(pattern, handler);
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Prefixes of all groups in creation order.
    pub fn group_prefixes(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.prefix.as_str()).collect()
    }

    /// Middleware applying to `path`, in group-creation then registration order.
    pub fn middlewares_for(&self, path: &str) -> Vec<HandlerFunc> {
        self.groups
            .iter()
            .filter(|g| path.starts_with(&g.prefix))
            .flat_map(|g| g.middlewares.iter().cloned())
            .collect()
    }

    /// Serve one request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let _guard = self.in_flight.track();
        let start = Instant::now();

        let (parts, body) = request.into_parts();
        let limit = self.config.max_body_bytes;

        let declared = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared.is_some_and(|len| len > limit) {
            tracing::warn!(path = %parts.uri.path(), limit, "Request body too large");
            return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response();
        }

        let body = match axum::body::to_bytes(body, limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %parts.uri.path(), error = %e, "Failed to read request body");
                return (StatusCode::BAD_REQUEST, "failed to read request body").into_response();
            }
        };

        let mut c = Context::new(parts, body, Vec::new());
        for middleware in self.middlewares_for(c.path()) {
            c.push_handler(middleware);
        }
        self.router.handle(&mut c).await;

        metrics::record_request(c.method().as_str(), c.full_path(), c.status_code(), start);
        tracing::debug!(
            method = %c.method(),
            path = %c.path(),
            route = c.full_path().unwrap_or("-"),
            status = c.status_code().as_u16(),
            "Request dispatched"
        );
        c.into_response()
    }

    fn register_group(&mut self, prefix: String) -> usize {
        tracing::debug!(prefix = %prefix, "Group registered");
        self.groups.push(GroupEntry::new(prefix));
        self.groups.len() - 1
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("router", &self.router)
            .field("groups", &self.group_prefixes())
            .field("config", &self.config)
            .finish()
    }
}
