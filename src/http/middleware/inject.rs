//! Dependency injection into the request context.
//!
//! Shared handles (service clients, pools) are built once at wiring time and
//! handed to handlers through the typed context store instead of globals.

use crate::http::{handler, HandlerFunc};

/// Store a clone of `value` in every request passing through, then continue.
///
/// Handlers read it back with `Context::require::<T>()`.
pub fn inject<T>(value: T) -> HandlerFunc
where
    T: Clone + Send + Sync + 'static,
{
    handler(move |c| {
        let value = value.clone();
        Box::pin(async move {
            c.set(value);
            c.next().await;
        })
    })
}
