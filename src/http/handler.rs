//! Handler function type shared by routes and middleware.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::http::Context;

/// A request handler or middleware.
///
/// Takes the per-request [`Context`] and completes when it is done with it.
/// Middleware call [`Context::next`] to run the rest of the chain.
pub type HandlerFunc = Arc<dyn for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync>;

/// Box a closure into a [`HandlerFunc`].
///
/// ```ignore
/// let hello = handler(|c| Box::pin(async move {
///     c.string(StatusCode::OK, "hello");
/// }));
/// ```
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
{
    Arc::new(f)
}
