//! Per-request state and handler-chain driver.
//!
//! A [`Context`] is created for every request, seeded with the middleware
//! that matched the path, given the route handler by the router, and then
//! driven through [`Context::next`].
//!
//! # Chain execution
//! ```text
//! cursor: -1 → 0 (mw 0) → 1 (mw 1) → ... → n-1 (route handler)
//! ```
//! - `next()` advances the cursor by one and runs that handler
//! - A handler that returns without calling `next()` ends the chain
//! - Code after `next().await` runs once everything downstream has finished
//! - `next()` is one-shot per handler; `abort()` turns every later call into a no-op

use std::collections::HashMap;
use std::fmt::Display;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, Method, StatusCode, Uri};
use axum::response::Response;
use futures_util::future::BoxFuture;
use serde::Serialize;
use url::form_urlencoded;

use crate::error::ContextError;
use crate::http::request::{decoded_path, X_REQUEST_ID};
use crate::http::response::{ResponseState, APPLICATION_JSON, TEXT_HTML, TEXT_PLAIN};
use crate::http::HandlerFunc;
use crate::routing::router::Params;

pub struct Context {
    method: Method,
    uri: Uri,
    path: String,
    headers: HeaderMap,
    /// Request extensions plus values stored by middleware.
    extensions: Extensions,
    body: Bytes,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,

    params: Params,
    full_path: Option<String>,

    handlers: Vec<HandlerFunc>,
    /// Highest chain position started so far.
    index: isize,
    /// Position of the handler currently running.
    current: isize,
    aborted: bool,

    response: ResponseState,
}

impl Context {
    /// Build a context for a request whose body has already been read.
    pub fn new(parts: Parts, body: Bytes, handlers: Vec<HandlerFunc>) -> Self {
        let query = parts
            .uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let form = if is_form(&parts.headers) {
            form_urlencoded::parse(&body).into_owned().collect()
        } else {
            Vec::new()
        };

        Self {
            method: parts.method,
            path: decoded_path(&parts.uri),
            uri: parts.uri,
            headers: parts.headers,
            extensions: parts.extensions,
            body,
            query,
            form,
            params: Params::new(),
            full_path: None,
            handlers,
            index: -1,
            current: -1,
            aborted: false,
            response: ResponseState::new(),
        }
    }

    // ---- chain ------------------------------------------------------------

    /// Run the next handler in the chain.
    ///
    /// Completes after the rest of the chain has finished. Calling it a second
    /// time from the same handler, or after [`abort`](Self::abort), does nothing.
    pub fn next(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let caller = self.current;
            let target = caller + 1;
            if self.aborted || target <= self.index {
                return;
            }
            self.index = target;

            let Some(handler) = self.handlers.get(target as usize).cloned() else {
                return;
            };
            self.current = target;
            handler(&mut *self).await;
            self.current = caller;
        })
    }

    /// Stop the chain: no handler after the current one will run.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Abort and answer with `{"message": ...}`.
    pub fn fail(&mut self, status: StatusCode, message: impl Into<String>) {
        self.abort();
        let mut payload = crate::http::H::new();
        payload.insert("message".into(), message.into().into());
        self.json(status, &payload);
    }

    pub(crate) fn push_handler(&mut self, handler: HandlerFunc) {
        self.handlers.push(handler);
    }

    pub(crate) fn set_route(&mut self, full_path: String, params: Params) {
        self.full_path = Some(full_path);
        self.params = params;
    }

    /// Number of handlers in this request's chain.
    pub fn chain_len(&self) -> usize {
        self.handlers.len()
    }

    // ---- request ----------------------------------------------------------

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Percent-decoded path; the raw form stays available through [`uri`](Self::uri).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }

    /// Peer address, when served with connect info.
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Path parameter bound by `:name` or `*name` in the matched route.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// The matched route pattern, e.g. `/hello/:name`.
    pub fn full_path(&self) -> Option<&str> {
        self.full_path.as_deref()
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        lookup(&self.query, key)
    }

    /// Field of an `application/x-www-form-urlencoded` body.
    pub fn post_form(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }

    // ---- typed store ------------------------------------------------------

    /// Store a value for handlers further down the chain.
    pub fn set<T: Clone + Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(value);
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    /// Like [`get`](Self::get), but a missing value is an error.
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<&T, ContextError> {
        self.get::<T>().ok_or(ContextError::Missing {
            type_name: std::any::type_name::<T>(),
        })
    }

    // ---- response ---------------------------------------------------------

    pub fn status(&mut self, status: StatusCode) {
        self.response.set_status(status);
    }

    pub fn status_code(&self) -> StatusCode {
        self.response.status()
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response.set_header(name, value);
    }

    pub fn written(&self) -> bool {
        self.response.is_written()
    }

    pub fn body_written(&self) -> Option<&Bytes> {
        self.response.body()
    }

    pub fn string(&mut self, status: StatusCode, body: impl Display) {
        self.response
            .write(status, TEXT_PLAIN, Bytes::from(body.to_string()));
    }

    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => self.response.write(status, APPLICATION_JSON, Bytes::from(body)),
            Err(e) => {
                tracing::error!(path = %self.path, error = %e, "Failed to serialize JSON response");
                self.response.write(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    TEXT_PLAIN,
                    Bytes::from_static(b"Internal Server Error"),
                );
            }
        }
    }

    pub fn html(&mut self, status: StatusCode, body: impl Into<String>) {
        self.response
            .write(status, TEXT_HTML, Bytes::from(body.into()));
    }

    pub fn data(&mut self, status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) {
        self.response.write(status, content_type, body.into());
    }

    pub fn into_response(self) -> Response {
        self.response.into_response()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("chain_len", &self.handlers.len())
            .field("index", &self.index)
            .field("status", &self.response.status())
            .finish()
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handler;
    use axum::http::Request;
    use std::sync::{Arc, Mutex};

    type Trace = Arc<Mutex<Vec<String>>>;

    fn context_with(uri: &str, handlers: Vec<HandlerFunc>) -> Context {
        let (parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        Context::new(parts, Bytes::new(), handlers)
    }

    /// Records `name:before`, continues, then records `name:after`.
    fn wrap(trace: &Trace, name: &'static str) -> HandlerFunc {
        let trace = trace.clone();
        handler(move |c| {
            let trace = trace.clone();
            Box::pin(async move {
                trace.lock().unwrap().push(format!("{name}:before"));
                c.next().await;
                trace.lock().unwrap().push(format!("{name}:after"));
            })
        })
    }

    fn terminal(trace: &Trace, name: &'static str) -> HandlerFunc {
        let trace = trace.clone();
        handler(move |_| {
            let trace = trace.clone();
            Box::pin(async move {
                trace.lock().unwrap().push(name.to_string());
            })
        })
    }

    fn recorded(trace: &Trace) -> Vec<String> {
        trace.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_chain_runs_in_order_with_after_hooks() {
        let trace = Trace::default();
        let mut c = context_with(
            "/",
            vec![wrap(&trace, "a"), wrap(&trace, "b"), terminal(&trace, "h")],
        );
        c.next().await;
        assert_eq!(
            recorded(&trace),
            vec!["a:before", "b:before", "h", "b:after", "a:after"]
        );
    }

    #[tokio::test]
    async fn test_handler_not_calling_next_stops_chain() {
        let trace = Trace::default();
        let gate = handler(|c| {
            Box::pin(async move {
                c.string(StatusCode::UNAUTHORIZED, "denied");
            })
        });
        let mut c = context_with("/", vec![wrap(&trace, "a"), gate, terminal(&trace, "h")]);
        c.next().await;
        assert_eq!(recorded(&trace), vec!["a:before", "a:after"]);
        assert_eq!(c.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_next_is_one_shot() {
        let trace = Trace::default();
        let twice = handler(|c| {
            Box::pin(async move {
                c.next().await;
                c.next().await;
            })
        });
        let mut c = context_with(
            "/",
            vec![twice, terminal(&trace, "h1"), terminal(&trace, "h2")],
        );
        c.next().await;
        // h1 ends without continuing, so h2 never runs even though the
        // first middleware asked twice.
        assert_eq!(recorded(&trace), vec!["h1"]);
    }

    #[tokio::test]
    async fn test_abort_blocks_downstream() {
        let trace = Trace::default();
        let stop = handler(|c| {
            Box::pin(async move {
                c.fail(StatusCode::FORBIDDEN, "nope");
                c.next().await;
            })
        });
        let mut c = context_with("/", vec![stop, terminal(&trace, "h")]);
        c.next().await;
        assert!(recorded(&trace).is_empty());
        assert!(c.is_aborted());
        assert_eq!(c.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(c.body_written(), Some(&Bytes::from(r#"{"message":"nope"}"#)));
    }

    #[tokio::test]
    async fn test_empty_chain_is_noop() {
        let mut c = context_with("/", Vec::new());
        c.next().await;
        assert!(!c.written());
        assert_eq!(c.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_pushed_terminal_runs_after_middleware() {
        let trace = Trace::default();
        let mut c = context_with("/", vec![wrap(&trace, "a")]);
        c.push_handler(terminal(&trace, "h"));
        c.next().await;
        assert_eq!(recorded(&trace), vec!["a:before", "h", "a:after"]);
    }

    #[test]
    fn test_query_and_form() {
        let (parts, ()) = Request::builder()
            .method(Method::POST)
            .uri("/login?name=makabaka&lang=go%20lang")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(())
            .unwrap()
            .into_parts();
        let c = Context::new(parts, Bytes::from("username=geek&password=p%40ss"), Vec::new());

        assert_eq!(c.query("name"), Some("makabaka"));
        assert_eq!(c.query("lang"), Some("go lang"));
        assert_eq!(c.query("missing"), None);
        assert_eq!(c.post_form("username"), Some("geek"));
        assert_eq!(c.post_form("password"), Some("p@ss"));
    }

    #[test]
    fn test_path_is_percent_decoded() {
        let c = context_with("/caf%C3%A9/a%20b?x=1", Vec::new());
        assert_eq!(c.path(), "/café/a b");
        assert_eq!(c.uri().path(), "/caf%C3%A9/a%20b");
    }

    #[test]
    fn test_form_ignored_without_form_content_type() {
        let (parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let c = Context::new(parts, Bytes::from("a=b"), Vec::new());
        assert_eq!(c.post_form("a"), None);
        assert_eq!(c.body(), &Bytes::from("a=b"));
    }

    #[test]
    fn test_typed_store() {
        #[derive(Clone, Debug, PartialEq)]
        struct Client(&'static str);

        let mut c = context_with("/", Vec::new());
        assert_eq!(
            c.require::<Client>(),
            Err(ContextError::Missing {
                type_name: std::any::type_name::<Client>()
            })
        );
        c.set(Client("user"));
        assert_eq!(c.get::<Client>(), Some(&Client("user")));
        assert_eq!(c.require::<Client>(), Ok(&Client("user")));
    }

    #[test]
    fn test_missing_param_is_none() {
        let c = context_with("/", Vec::new());
        assert_eq!(c.param("name"), None);
        assert_eq!(c.full_path(), None);
    }

    #[test]
    fn test_writers() {
        let mut c = context_with("/", Vec::new());
        c.html(StatusCode::OK, "<h1>Index Page</h1>");
        assert_eq!(c.body_written(), Some(&Bytes::from("<h1>Index Page</h1>")));

        let mut payload = crate::http::H::new();
        payload.insert("filepath".into(), "css/style.css".into());
        payload.insert("a".into(), 1.into());
        c.json(StatusCode::OK, &payload);
        assert_eq!(
            c.body_written(),
            Some(&Bytes::from(r#"{"filepath":"css/style.css","a":1}"#))
        );

        let response = c.into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], APPLICATION_JSON);
    }
}
