//! Request timing middleware.

use std::time::Instant;

use crate::http::{handler, HandlerFunc};

/// Log status, URI and latency once the rest of the chain has run.
pub fn logger() -> HandlerFunc {
    handler(|c| {
        Box::pin(async move {
            let start = Instant::now();
            c.next().await;
            tracing::info!(
                status = c.status_code().as_u16(),
                method = %c.method(),
                uri = %c.uri(),
                route = c.full_path().unwrap_or("-"),
                elapsed = ?start.elapsed(),
                "Request completed"
            );
        })
    })
}
