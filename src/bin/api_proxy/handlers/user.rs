use std::time::Duration;

use axum::http::StatusCode;
use futures_util::future::BoxFuture;
use serde_json::Value;

use giga::{Context, H};

use crate::captcha::CaptchaClient;

const CAPTCHA_TIMEOUT: Duration = Duration::from_secs(5);

pub fn register(c: &mut Context) -> BoxFuture<'_, ()> {
    Box::pin(async move {
        let mut body = H::new();
        for field in ["username", "password", "age", "mobile"] {
            let value = c.post_form(field).unwrap_or_default();
            body.insert(field.to_owned(), Value::from(value));
        }
        c.json(StatusCode::OK, &body);
    })
}

pub fn login(c: &mut Context) -> BoxFuture<'_, ()> {
    Box::pin(async move {
        let mobile = c.post_form("mobile").unwrap_or_default().to_owned();
        let client = match c.require::<CaptchaClient>() {
            Ok(client) => client.clone(),
            Err(e) => {
                tracing::error!(error = %e, "Captcha client unavailable");
                c.fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
                return;
            }
        };

        match tokio::time::timeout(CAPTCHA_TIMEOUT, client.get_captcha(&mobile)).await {
            Ok(Ok(code)) => {
                let mut body = H::new();
                body.insert("code".into(), Value::from(code));
                c.json(StatusCode::OK, &body);
            }
            Ok(Err(e)) => c.fail(StatusCode::BAD_REQUEST, e.to_string()),
            Err(_) => {
                tracing::warn!(mobile = %mobile, "Captcha request timed out");
                c.fail(StatusCode::GATEWAY_TIMEOUT, "captcha service timed out");
            }
        }
    })
}
