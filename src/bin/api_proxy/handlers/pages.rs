use axum::http::StatusCode;
use futures_util::future::BoxFuture;
use serde_json::json;

use giga::Context;

pub fn index(c: &mut Context) -> BoxFuture<'_, ()> {
    Box::pin(async move {
        c.html(StatusCode::OK, "<h1>Index Page</h1>");
    })
}

pub fn asset(c: &mut Context) -> BoxFuture<'_, ()> {
    Box::pin(async move {
        let filepath = c.param("filepath").unwrap_or_default().to_owned();
        c.json(StatusCode::OK, &json!({ "filepath": filepath }));
    })
}
