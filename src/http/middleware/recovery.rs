//! Panic recovery middleware.
//!
//! A panic anywhere downstream is caught, logged, and answered with
//! `500 {"message": "Internal Server Error"}` instead of dropping the connection.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::http::StatusCode;
use futures_util::FutureExt;

use crate::http::{handler, HandlerFunc};

pub fn recovery() -> HandlerFunc {
    handler(|c| {
        Box::pin(async move {
            if let Err(panic) = AssertUnwindSafe(c.next()).catch_unwind().await {
                tracing::error!(
                    path = %c.path(),
                    panic = %panic_message(panic.as_ref()),
                    "Handler panicked"
                );
                c.fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
