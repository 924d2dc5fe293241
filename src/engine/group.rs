//! Route groups: prefix scopes that own middleware.

use axum::http::Method;
use futures_util::future::BoxFuture;

use crate::engine::Engine;
use crate::http::{Context, HandlerFunc};

/// Registration record for one group, kept by the engine.
pub(crate) struct GroupEntry {
    pub(crate) prefix: String,
    pub(crate) middlewares: Vec<HandlerFunc>,
}

impl GroupEntry {
    pub(crate) fn new(prefix: String) -> Self {
        Self {
            prefix,
            middlewares: Vec::new(),
        }
    }
}

/// Handle for registering routes and middleware under a prefix.
///
/// Borrowing the engine mutably keeps all wiring before [`Engine::run`],
/// which consumes the engine.
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    index: usize,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, index: usize) -> Self {
        Self { engine, index }
    }

    /// Full prefix of this group, including all ancestors.
    pub fn prefix(&self) -> &str {
        &self.engine.groups[self.index].prefix
    }

    /// Create a child group whose prefix is this prefix followed by `prefix`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let full = format!("{}{}", self.prefix(), prefix);
        let index = self.engine.register_group(full);
        RouterGroup::new(self.engine, index)
    }

    /// Append a middleware. Middleware run in registration order.
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.engine.groups[self.index]
            .middlewares
            .push(std::sync::Arc::new(middleware));
        self
    }

    /// Append an already boxed middleware.
    pub fn use_handler(&mut self, middleware: HandlerFunc) -> &mut Self {
        self.engine.groups[self.index].middlewares.push(middleware);
        self
    }

    /// Register `handler` for `method` at this prefix followed by `comp`.
    pub fn route<F>(&mut self, method: Method, comp: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.add_route(method, comp, std::sync::Arc::new(handler))
    }

    pub fn get<F>(&mut self, comp: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.route(Method::GET, comp, handler)
    }

    pub fn post<F>(&mut self, comp: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.route(Method::POST, comp, handler)
    }

    pub fn put<F>(&mut self, comp: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.route(Method::PUT, comp, handler)
    }

    pub fn delete<F>(&mut self, comp: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.route(Method::DELETE, comp, handler)
    }

    pub fn patch<F>(&mut self, comp: &str, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        self.route(Method::PATCH, comp, handler)
    }

    /// Register an already boxed handler.
    pub fn add_route(&mut self, method: Method, comp: &str, handler: HandlerFunc) -> &mut Self {
        let pattern = format!("{}{}", self.prefix(), comp);
        tracing::debug!(
            method = %method,
            pattern = %pattern,
            prefix = %self.prefix(),
            "Route registered"
        );
        self.engine.router.add_route(&method, &pattern, handler);
        self
    }
}
