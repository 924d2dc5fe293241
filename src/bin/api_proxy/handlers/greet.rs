use axum::http::StatusCode;
use futures_util::future::BoxFuture;

use giga::Context;

/// `/v1/hello?name=makabaka`
pub fn hello_query(c: &mut Context) -> BoxFuture<'_, ()> {
    Box::pin(async move {
        let name = c.query("name").unwrap_or_default().to_owned();
        greet(c, &name);
    })
}

/// `/hello/makabaka`
pub fn hello_param(c: &mut Context) -> BoxFuture<'_, ()> {
    Box::pin(async move {
        let name = c.param("name").unwrap_or_default().to_owned();
        greet(c, &name);
    })
}

fn greet(c: &mut Context, name: &str) {
    let body = format!("hello {name}, you're at {}\n", c.path());
    c.string(StatusCode::OK, body);
}
