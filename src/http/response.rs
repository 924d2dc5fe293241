//! Response state accumulated by handlers.
//!
//! # Responsibilities
//! - Record status, headers and body written through the [`Context`](crate::http::Context)
//! - Convert the recorded state into an axum response once the chain finishes
//!
//! # Design Decisions
//! - One body per request; a second write replaces the first and is logged
//! - Nothing written means `200 OK` with an empty body

use axum::body::{Body, Bytes};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::Response;

/// Ordered key/value payload for JSON responses.
pub type H = serde_json::Map<String, serde_json::Value>;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug)]
pub struct ResponseState {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl ResponseState {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn is_written(&self) -> bool {
        self.body.is_some()
    }

    /// Record status, content type and body in one step.
    pub fn write(&mut self, status: StatusCode, content_type: &'static str, body: Bytes) {
        if self.body.is_some() {
            tracing::warn!(status = %status, "Response body written twice, keeping the last write");
        }
        self.status = status;
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = Some(body);
    }

    pub fn into_response(self) -> Response {
        let mut response = Response::new(self.body.map(Body::from).unwrap_or_else(Body::empty));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for ResponseState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_defaults_to_ok_empty() {
        let response = ResponseState::new().into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_write_sets_status_and_content_type() {
        let mut state = ResponseState::new();
        state.write(StatusCode::CREATED, TEXT_HTML, Bytes::from("<p>x</p>"));
        assert!(state.is_written());

        let response = state.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_HTML);
    }

    #[test]
    fn test_second_write_wins() {
        let mut state = ResponseState::new();
        state.write(StatusCode::OK, TEXT_PLAIN, Bytes::from("a"));
        state.write(StatusCode::ACCEPTED, TEXT_PLAIN, Bytes::from("b"));
        assert_eq!(state.status(), StatusCode::ACCEPTED);
        assert_eq!(state.body(), Some(&Bytes::from("b")));
    }
}
